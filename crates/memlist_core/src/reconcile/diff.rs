//! Key-based diff between two ordered identity sequences.
//!
//! # Responsibility
//! - Derive removals, insertions and moves that turn `old` into `new`.
//!
//! # Invariants
//! - Inputs contain no duplicate identities.
//! - `moved` is minimal: items that keep their relative order (the longest
//!   increasing run of old positions) are never reported as moved.

use crate::reconcile::section::Section;
use crate::reconcile::snapshot::{ListItemId, Snapshot};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListDiff<T> {
    /// Items present only in `old`, in old order.
    pub removed: Vec<T>,
    /// Items present only in `new`, with their index in `new`.
    pub inserted: Vec<(usize, T)>,
    /// Items present in both whose relative position changed, in new order.
    pub moved: Vec<T>,
}

impl<T> Default for ListDiff<T> {
    fn default() -> Self {
        Self {
            removed: Vec::new(),
            inserted: Vec::new(),
            moved: Vec::new(),
        }
    }
}

impl<T> ListDiff<T> {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.inserted.is_empty() && self.moved.is_empty()
    }

    /// Number of edit operations.
    pub fn change_count(&self) -> usize {
        self.removed.len() + self.inserted.len() + self.moved.len()
    }
}

pub fn diff_items<T: Copy + Eq + Hash>(old: &[T], new: &[T]) -> ListDiff<T> {
    let old_positions: HashMap<T, usize> = old
        .iter()
        .enumerate()
        .map(|(index, item)| (*item, index))
        .collect();
    let new_members: HashSet<T> = new.iter().copied().collect();

    let removed = old
        .iter()
        .copied()
        .filter(|item| !new_members.contains(item))
        .collect();

    let mut inserted = Vec::new();
    let mut common: Vec<(T, usize)> = Vec::new();
    for (index, item) in new.iter().enumerate() {
        match old_positions.get(item) {
            Some(old_index) => common.push((*item, *old_index)),
            None => inserted.push((index, *item)),
        }
    }

    let old_order: Vec<usize> = common.iter().map(|(_, old_index)| *old_index).collect();
    let stable: HashSet<usize> = longest_increasing_subsequence(&old_order)
        .into_iter()
        .collect();
    let moved = common
        .iter()
        .enumerate()
        .filter(|(position, _)| !stable.contains(position))
        .map(|(_, (item, _))| *item)
        .collect();

    ListDiff {
        removed,
        inserted,
        moved,
    }
}

/// Section- and item-level changes between two applied snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapshotDiff {
    pub sections_removed: Vec<Section>,
    pub sections_inserted: Vec<Section>,
    /// Computed over the flattened display order.
    pub items: ListDiff<ListItemId>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.sections_removed.is_empty() && self.sections_inserted.is_empty() && self.items.is_empty()
    }
}

pub fn diff_snapshots(old: &Snapshot, new: &Snapshot) -> SnapshotDiff {
    let sections = diff_items(&old.section_identifiers(), &new.section_identifiers());
    SnapshotDiff {
        sections_removed: sections.removed,
        sections_inserted: sections
            .inserted
            .into_iter()
            .map(|(_, section)| section)
            .collect(),
        items: diff_items(&old.item_ids(), &new.item_ids()),
    }
}

/// Indices into `seq` forming one longest strictly increasing subsequence.
fn longest_increasing_subsequence(seq: &[usize]) -> Vec<usize> {
    // tails[k]: index of the smallest tail of an increasing run of length k+1
    let mut tails: Vec<usize> = Vec::new();
    let mut predecessor: Vec<Option<usize>> = vec![None; seq.len()];

    for (index, value) in seq.iter().enumerate() {
        let slot = tails.partition_point(|&tail| seq[tail] < *value);
        if slot > 0 {
            predecessor[index] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(index);
        } else {
            tails[slot] = index;
        }
    }

    let mut result = Vec::with_capacity(tails.len());
    let mut cursor = tails.last().copied();
    while let Some(index) = cursor {
        result.push(index);
        cursor = predecessor[index];
    }
    result.reverse();
    result
}

#[cfg(test)]
mod tests {
    use super::{diff_items, longest_increasing_subsequence};

    #[test]
    fn lis_picks_longest_run() {
        let seq = [3, 0, 1, 4, 2];
        let picked: Vec<usize> = longest_increasing_subsequence(&seq)
            .into_iter()
            .map(|index| seq[index])
            .collect();
        assert_eq!(picked.len(), 3);
        assert!(picked.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn identical_lists_have_no_changes() {
        let diff = diff_items(&[1, 2, 3], &[1, 2, 3]);
        assert!(diff.is_empty());
    }

    #[test]
    fn removal_and_insertion_are_reported_with_positions() {
        let diff = diff_items(&['a', 'b', 'c'], &['a', 'c', 'd']);
        assert_eq!(diff.removed, vec!['b']);
        assert_eq!(diff.inserted, vec![(2, 'd')]);
        assert!(diff.moved.is_empty());
    }

    #[test]
    fn moving_one_item_to_front_reports_single_move() {
        let diff = diff_items(&[1, 2, 3, 4], &[4, 1, 2, 3]);
        assert_eq!(diff.moved, vec![4]);
        assert!(diff.removed.is_empty());
        assert!(diff.inserted.is_empty());
    }

    #[test]
    fn reversal_moves_all_but_one() {
        let diff = diff_items(&[1, 2, 3], &[3, 2, 1]);
        assert_eq!(diff.change_count(), 2);
    }
}
