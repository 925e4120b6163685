//! Renderable list snapshot.
//!
//! # Invariants
//! - A snapshot is a value; reconciliation builds a new one every time.
//! - Section order and item order are exactly the order they were appended.

use crate::model::memory::MemoryId;
use crate::reconcile::section::Section;
use serde::{Deserialize, Serialize};

/// Hashable row identity used for diffing between snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListItemId {
    Memory(MemoryId),
}

impl ListItemId {
    pub fn memory_id(self) -> MemoryId {
        match self {
            Self::Memory(id) => id,
        }
    }
}

impl From<MemoryId> for ListItemId {
    fn from(value: MemoryId) -> Self {
        Self::Memory(value)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    sections: Vec<(Section, Vec<ListItemId>)>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn append_section(&mut self, section: Section, items: Vec<ListItemId>) {
        self.sections.push((section, items));
    }

    /// Extends an already appended section; no-op when it is absent.
    pub(crate) fn extend_section(
        &mut self,
        section: Section,
        items: impl IntoIterator<Item = ListItemId>,
    ) {
        if let Some((_, existing)) = self.sections.iter_mut().find(|(s, _)| *s == section) {
            existing.extend(items);
        }
    }

    pub fn sections(&self) -> &[(Section, Vec<ListItemId>)] {
        &self.sections
    }

    pub fn section_identifiers(&self) -> Vec<Section> {
        self.sections.iter().map(|(section, _)| *section).collect()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn items_in(&self, section: Section) -> Option<&[ListItemId]> {
        self.sections
            .iter()
            .find(|(s, _)| *s == section)
            .map(|(_, items)| items.as_slice())
    }

    /// All items in display order.
    pub fn item_ids(&self) -> Vec<ListItemId> {
        self.sections
            .iter()
            .flat_map(|(_, items)| items.iter().copied())
            .collect()
    }

    pub fn item_at(&self, section_index: usize, row: usize) -> Option<ListItemId> {
        self.sections
            .get(section_index)
            .and_then(|(_, items)| items.get(row).copied())
    }

    /// Position `(section_index, row)` of an item.
    pub fn index_of(&self, item: ListItemId) -> Option<(usize, usize)> {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section_index, (_, items))| {
                items
                    .iter()
                    .position(|candidate| *candidate == item)
                    .map(|row| (section_index, row))
            })
    }

    /// Total item count.
    pub fn len(&self) -> usize {
        self.sections.iter().map(|(_, items)| items.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
