//! Grouped query result → list snapshot.
//!
//! # Responsibility
//! - Map each result group, by position, onto a fixed section slot.
//! - Record the group's label as that section's header title.
//! - Wrap member ids into list item identities without reordering.
//!
//! # Invariants
//! - Output depends only on the input groups and the configured layout and
//!   overflow policy; reconciling the same input twice yields equal snapshots.
//! - Titles are updated before the snapshot is returned.
//! - A section never appears twice and never exceeds layout capacity.

use crate::reconcile::section::{Section, SectionLayout, SectionTitles};
use crate::reconcile::snapshot::{ListItemId, Snapshot};
use crate::repo::memory_repo::ResultGroup;
use log::warn;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// What to do with groups beyond the layout's section capacity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Leave excess groups out of the snapshot and log a warning.
    #[default]
    Drop,
    /// Fail the reconciliation; the caller applies nothing.
    Reject,
    /// Append excess groups' members to the last section.
    MergeIntoLast,
}

impl OverflowPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "drop" => Some(Self::Drop),
            "reject" => Some(Self::Reject),
            "merge_into_last" | "merge" => Some(Self::MergeIntoLast),
            _ => None,
        }
    }
}

pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// More groups than section slots under `OverflowPolicy::Reject`.
    SectionOverflow { groups: usize, capacity: usize },
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SectionOverflow { groups, capacity } => write!(
                f,
                "query produced {groups} groups but the list has only {capacity} section(s)"
            ),
        }
    }
}

impl Error for ReconcileError {}

/// Stateful reconciler owning the section title map.
#[derive(Debug, Clone)]
pub struct SectionReconciler {
    layout: SectionLayout,
    overflow: OverflowPolicy,
    titles: SectionTitles,
}

impl Default for SectionReconciler {
    fn default() -> Self {
        Self::new(SectionLayout::default(), OverflowPolicy::default())
    }
}

impl SectionReconciler {
    pub fn new(layout: SectionLayout, overflow: OverflowPolicy) -> Self {
        Self {
            layout,
            overflow,
            titles: SectionTitles::default(),
        }
    }

    pub fn layout(&self) -> SectionLayout {
        self.layout
    }

    pub fn overflow_policy(&self) -> OverflowPolicy {
        self.overflow
    }

    pub fn titles(&self) -> &SectionTitles {
        &self.titles
    }

    pub fn section_title(&self, section: Section) -> Option<&str> {
        self.titles.get(section)
    }

    /// Builds a fresh snapshot from a complete grouped result.
    ///
    /// # Errors
    /// - `SectionOverflow` only under `OverflowPolicy::Reject`; titles are left
    ///   untouched in that case.
    pub fn reconcile(&mut self, groups: &[ResultGroup]) -> ReconcileResult<Snapshot> {
        let capacity = self.layout.capacity();
        let overflow = groups.len().saturating_sub(capacity);

        if overflow > 0 && self.overflow == OverflowPolicy::Reject {
            return Err(ReconcileError::SectionOverflow {
                groups: groups.len(),
                capacity,
            });
        }

        let mut snapshot = Snapshot::new();
        for (position, group) in groups.iter().take(capacity).enumerate() {
            let Some(section) = self.layout.section_at(position) else {
                break;
            };
            self.titles.set(section, group.label.as_str());
            snapshot.append_section(section, to_items(group));
        }

        if overflow == 0 {
            return Ok(snapshot);
        }

        let excess = &groups[capacity..];
        match self.overflow {
            OverflowPolicy::Drop => {
                warn!(
                    "event=section_overflow module=reconcile status=dropped groups={} capacity={} dropped_groups={} dropped_items={}",
                    groups.len(),
                    capacity,
                    excess.len(),
                    excess.iter().map(|group| group.members.len()).sum::<usize>()
                );
            }
            OverflowPolicy::MergeIntoLast => {
                if let Some(last) = self.layout.sections().last().copied() {
                    snapshot.extend_section(last, excess.iter().flat_map(to_items));
                    let merged_label = match self.titles.get(last) {
                        Some(label) => format!("{label} +{}", excess.len()),
                        None => format!("+{}", excess.len()),
                    };
                    self.titles.set(last, merged_label);
                }
            }
            OverflowPolicy::Reject => {}
        }

        Ok(snapshot)
    }
}

fn to_items(group: &ResultGroup) -> Vec<ListItemId> {
    group.members.iter().copied().map(ListItemId::from).collect()
}
