//! Domain model for the memory list.
//!
//! # Responsibility
//! - Define the persisted record shape shared by store, reconciler and UI.
//!
//! # Invariants
//! - Every memory is identified by a stable `MemoryId`.
//! - Memories are immutable once stored; removal is a hard delete.

pub mod memory;
