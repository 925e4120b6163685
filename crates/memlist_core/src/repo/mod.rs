//! Repository layer: SQL lives here and nowhere else.
//!
//! # Invariants
//! - Writes enforce `Memory::validate()` before persistence.
//! - APIs return semantic errors (`NotFound`, `Duplicate`) in addition to DB
//!   transport errors.

pub mod flag_repo;
pub mod memory_repo;
