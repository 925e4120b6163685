//! Core logic for memlist: a persisted, sectioned list of memory links.
//!
//! Data flows one way: seed → store → live query → reconciler → list
//! surface, and a selected row's URL goes to the detail viewer.

pub mod config;
pub mod controller;
pub mod db;
pub mod detail;
pub mod logging;
pub mod model;
pub mod reconcile;
pub mod repo;
pub mod seed;
pub mod store;

pub use config::{AppConfig, ConfigError, ListConfig};
pub use controller::{ListSurface, MemoryListController, RowContent, SelectionError};
pub use detail::{DetailViewer, Navigator};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::memory::{Memory, MemoryId, MemoryValidationError};
pub use reconcile::diff::{diff_items, diff_snapshots, ListDiff, SnapshotDiff};
pub use reconcile::reconciler::{
    OverflowPolicy, ReconcileError, ReconcileResult, SectionReconciler,
};
pub use reconcile::section::{Section, SectionLayout, SectionTitles};
pub use reconcile::snapshot::{ListItemId, Snapshot};
pub use repo::flag_repo::{FlagRepository, SqliteFlagRepository};
pub use repo::memory_repo::{
    GroupedQuery, GroupedResults, MemoryRepository, RepoError, RepoResult, ResultGroup,
    SqliteMemoryRepository,
};
pub use seed::{seed_if_needed, seed_with, SeedEntry, SeedOutcome, SEED_MEMORIES};
pub use store::{MemoryStore, QueryObserver, SharedObserver, SubscriptionId};

/// Minimal health-check probe.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
