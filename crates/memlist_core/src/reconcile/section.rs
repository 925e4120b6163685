//! Section identities and their positional table.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Closed set of on-screen section slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Main,
    Secondary,
}

impl Section {
    /// Every slot, in positional order.
    pub const ALL: [Section; 2] = [Section::Main, Section::Secondary];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Secondary => "secondary",
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How many section slots a list exposes.
///
/// Group *i* of a query result lands in `sections()[i]`; there is no
/// name-based mapping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionLayout {
    /// Ungrouped list: only `Main`.
    Single,
    /// `Main` then `Secondary`.
    #[default]
    Grouped,
}

impl SectionLayout {
    pub fn sections(self) -> &'static [Section] {
        match self {
            Self::Single => &Section::ALL[..1],
            Self::Grouped => &Section::ALL,
        }
    }

    pub fn capacity(self) -> usize {
        self.sections().len()
    }

    /// Resolves a group position to its slot; `None` past capacity.
    pub fn section_at(self, position: usize) -> Option<Section> {
        self.sections().get(position).copied()
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "single" => Some(Self::Single),
            "grouped" => Some(Self::Grouped),
            _ => None,
        }
    }
}

/// Latest header label observed for each section.
///
/// Lives as long as the reconciler that owns it; overwritten on every
/// reconciliation and read lazily by header rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionTitles {
    titles: BTreeMap<Section, String>,
}

impl SectionTitles {
    pub fn get(&self, section: Section) -> Option<&str> {
        self.titles.get(&section).map(String::as_str)
    }

    pub(crate) fn set(&mut self, section: Section, label: impl Into<String>) {
        self.titles.insert(section, label.into());
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Section, &str)> {
        self.titles
            .iter()
            .map(|(section, label)| (*section, label.as_str()))
    }
}
