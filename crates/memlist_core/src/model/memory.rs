//! Memory domain model.
//!
//! # Responsibility
//! - Define the canonical record rendered by the memory list.
//! - Validate record shape before it reaches persistence.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused for another memory.
//! - `kind` is the grouping key of the list; it must not be blank.
//! - `resource_url` is always an `http`/`https` URL the detail viewer can load.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use url::Url;
use uuid::Uuid;

/// Stable, store-assigned identity of one memory.
///
/// Survives refetches, so it can key diffing and title lookups across
/// snapshots. It is never derived from a row position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryId(Uuid);

impl MemoryId {
    /// Generates a fresh random identity.
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses the hyphenated textual form used in storage and on the CLI.
    pub fn parse_str(value: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(value.trim()).map(Self)
    }
}

impl Display for MemoryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical persisted record: one titled link inside a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Memory {
    pub id: MemoryId,
    pub title: String,
    /// Category used as the section grouping key. Serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    pub resource_url: Url,
}

/// Shape violations detected by [`Memory::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoryValidationError {
    EmptyTitle,
    EmptyKind,
    UnsupportedUrlScheme(String),
}

impl Display for MemoryValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "memory title cannot be empty"),
            Self::EmptyKind => write!(f, "memory type cannot be empty"),
            Self::UnsupportedUrlScheme(scheme) => {
                write!(f, "unsupported resource url scheme `{scheme}`; expected http|https")
            }
        }
    }
}

impl Error for MemoryValidationError {}

impl Memory {
    /// Creates a memory with a generated stable ID.
    pub fn new(title: impl Into<String>, kind: impl Into<String>, resource_url: Url) -> Self {
        Self::with_id(MemoryId::new_v4(), title, kind, resource_url)
    }

    /// Creates a memory with a caller-provided stable ID.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(
        id: MemoryId,
        title: impl Into<String>,
        kind: impl Into<String>,
        resource_url: Url,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            kind: kind.into(),
            resource_url,
        }
    }

    /// Checks the record shape required by storage and rendering.
    ///
    /// # Errors
    /// - `EmptyTitle` / `EmptyKind` when the field is blank after trimming.
    /// - `UnsupportedUrlScheme` for anything other than `http`/`https`.
    pub fn validate(&self) -> Result<(), MemoryValidationError> {
        if self.title.trim().is_empty() {
            return Err(MemoryValidationError::EmptyTitle);
        }
        if self.kind.trim().is_empty() {
            return Err(MemoryValidationError::EmptyKind);
        }
        match self.resource_url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(MemoryValidationError::UnsupportedUrlScheme(other.to_string())),
        }
    }
}
