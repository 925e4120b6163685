//! Memory list controller.
//!
//! # Responsibility
//! - Observe a live grouped query and turn each result into a snapshot.
//! - Hand snapshots plus their diff to the rendering surface.
//! - Resolve rows, section headers and selections lazily for the surface.
//!
//! # Invariants
//! - The surface receives a structurally valid snapshot or no call at all.
//! - `applied_snapshot()` is always the last snapshot handed to the surface.
//! - Row content is never substituted with placeholders; unresolvable rows
//!   stay unrendered, are logged as errors and trip a debug assertion unless
//!   disabled with [`MemoryListController::set_missing_row_assertions`].

use crate::model::memory::{Memory, MemoryId};
use crate::reconcile::diff::{diff_snapshots, SnapshotDiff};
use crate::reconcile::reconciler::{OverflowPolicy, ReconcileResult, SectionReconciler};
use crate::reconcile::section::{Section, SectionLayout};
use crate::reconcile::snapshot::{ListItemId, Snapshot};
use crate::repo::memory_repo::{GroupedResults, RepoError, ResultGroup};
use crate::store::{MemoryStore, QueryObserver};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;

/// On-screen list that can apply snapshots.
pub trait ListSurface {
    /// Replaces the displayed list with `snapshot`.
    ///
    /// `diff` describes the change from the previously applied snapshot.
    fn apply(&mut self, snapshot: &Snapshot, diff: &SnapshotDiff, animated: bool);
}

/// Display content for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowContent {
    pub id: MemoryId,
    pub title: String,
    pub kind: String,
    pub resource_url: Url,
}

impl From<Memory> for RowContent {
    fn from(value: Memory) -> Self {
        Self {
            id: value.id,
            title: value.title,
            kind: value.kind,
            resource_url: value.resource_url,
        }
    }
}

#[derive(Debug)]
pub enum SelectionError {
    /// No row at this position in the applied snapshot.
    OutOfRange { section_index: usize, row: usize },
    /// The row's record is gone from the store.
    MissingRecord(MemoryId),
    Repo(RepoError),
}

impl Display for SelectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { section_index, row } => {
                write!(f, "no row at section {section_index}, row {row}")
            }
            Self::MissingRecord(id) => write!(f, "selected memory no longer exists: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SelectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for SelectionError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Glue between a live query, the reconciler and one list surface.
pub struct MemoryListController<S: ListSurface> {
    reconciler: SectionReconciler,
    applied: Snapshot,
    surface: S,
    assert_missing_rows: bool,
}

impl<S: ListSurface> MemoryListController<S> {
    pub fn new(surface: S, layout: SectionLayout, overflow: OverflowPolicy) -> Self {
        Self::with_reconciler(surface, SectionReconciler::new(layout, overflow))
    }

    pub fn with_reconciler(surface: S, reconciler: SectionReconciler) -> Self {
        Self {
            reconciler,
            applied: Snapshot::new(),
            surface,
            assert_missing_rows: cfg!(debug_assertions),
        }
    }

    /// Turns the debug-build assertion on unresolvable rows on or off.
    pub fn set_missing_row_assertions(&mut self, enabled: bool) {
        self.assert_missing_rows = enabled;
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn reconciler(&self) -> &SectionReconciler {
        &self.reconciler
    }

    pub fn applied_snapshot(&self) -> &Snapshot {
        &self.applied
    }

    /// Reconciles `groups` and applies the result with animation.
    ///
    /// # Errors
    /// - Reconciliation errors; the surface is not called and the previous
    ///   snapshot stays applied.
    pub fn handle_results(&mut self, groups: &[ResultGroup]) -> ReconcileResult<()> {
        let snapshot = self.reconciler.reconcile(groups)?;
        let diff = diff_snapshots(&self.applied, &snapshot);
        debug!(
            "event=snapshot_apply module=controller status=ok sections={} items={} removed={} inserted={} moved={}",
            snapshot.section_count(),
            snapshot.len(),
            diff.items.removed.len(),
            diff.items.inserted.len(),
            diff.items.moved.len()
        );
        self.surface.apply(&snapshot, &diff, true);
        self.applied = snapshot;
        Ok(())
    }

    /// Current header label for `section`.
    pub fn section_header(&self, section: Section) -> Option<&str> {
        self.reconciler.section_title(section)
    }

    /// Header label for the section at `section_index` in the applied
    /// snapshot.
    pub fn section_header_at(&self, section_index: usize) -> Option<&str> {
        let (section, _) = self.applied.sections().get(section_index)?;
        self.section_header(*section)
    }

    /// Resolves display content for `item` from the store.
    ///
    /// Returns `None`, and logs `row_missing`, when the record cannot be
    /// resolved.
    ///
    /// # Panics
    /// - In debug builds, when the record is gone and missing-row assertions
    ///   are enabled.
    pub fn row_content(&self, store: &MemoryStore, item: ListItemId) -> Option<RowContent> {
        let id = item.memory_id();
        match store.get(id) {
            Ok(Some(memory)) => Some(memory.into()),
            Ok(None) => {
                error!(
                    "event=row_missing module=controller status=error memory_id={}",
                    id
                );
                debug_assert!(
                    !self.assert_missing_rows,
                    "row_missing: memory {id} is in the applied snapshot but not in the store"
                );
                None
            }
            Err(err) => {
                error!(
                    "event=row_fetch module=controller status=error memory_id={} error={}",
                    id, err
                );
                None
            }
        }
    }

    /// Resolves a row activation to the memory's resource URL.
    pub fn select(
        &self,
        store: &MemoryStore,
        section_index: usize,
        row: usize,
    ) -> Result<Url, SelectionError> {
        let item = self
            .applied
            .item_at(section_index, row)
            .ok_or(SelectionError::OutOfRange { section_index, row })?;
        let id = item.memory_id();
        let memory = store.get(id)?.ok_or(SelectionError::MissingRecord(id))?;
        debug!(
            "event=row_select module=controller status=ok memory_id={} section_index={} row={}",
            id, section_index, row
        );
        Ok(memory.resource_url)
    }
}

impl<S: ListSurface> QueryObserver for MemoryListController<S> {
    fn results_changed(&mut self, results: &GroupedResults) {
        if let Err(err) = self.handle_results(results) {
            error!(
                "event=snapshot_apply module=controller status=error error={}",
                err
            );
        }
    }
}
