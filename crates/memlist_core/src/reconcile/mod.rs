//! Translation from grouped store results to renderable list snapshots.
//!
//! # Responsibility
//! - Stabilize section identity for a dynamic number of group labels.
//! - Produce snapshots and the diffs between consecutive snapshots.

pub mod diff;
pub mod reconciler;
pub mod section;
pub mod snapshot;
