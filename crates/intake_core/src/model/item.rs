//! Item domain model.
//!
//! # Responsibility
//! - Define the user-defined trackable thing (a supplement, a habit).
//! - Provide construction and validation helpers.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - `name` is non-empty after trimming.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Id of the item seeded into an empty store.
pub const SEED_ITEM_ID: &str = "1";
/// Name of the item seeded into an empty store.
pub const SEED_ITEM_NAME: &str = "크레아틴";
/// Glyph used when the caller leaves the emoji blank.
pub const DEFAULT_EMOJI: &str = "💊";

/// Stable identifier of a tracked item.
///
/// Stored as an opaque string so ids written by earlier app versions
/// (`"1"`, millisecond timestamps) keep loading unchanged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wraps an existing id string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh time-ordered id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Validation errors for item fields and item collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyId,
    EmptyName(ItemId),
    DuplicateId(ItemId),
    NoItems,
}

impl Display for ItemValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyId => write!(f, "item id must not be empty"),
            Self::EmptyName(id) => write!(f, "item `{id}` has an empty name"),
            Self::DuplicateId(id) => write!(f, "item id is duplicated: {id}"),
            Self::NoItems => write!(f, "item collection must contain at least one item"),
        }
    }
}

impl Error for ItemValidationError {}

/// A user-defined trackable item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Display glyph rendered next to the name.
    pub emoji: String,
}

impl Item {
    pub fn with_id(id: ItemId, name: impl Into<String>, emoji: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            emoji: emoji.into(),
        }
    }

    /// The item every fresh ledger starts with.
    pub fn seed() -> Self {
        Self::with_id(ItemId::new(SEED_ITEM_ID), SEED_ITEM_NAME, DEFAULT_EMOJI)
    }

    /// Validates field-level invariants.
    pub fn validate(&self) -> Result<(), ItemValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ItemValidationError::EmptyName(self.id.clone()));
        }
        Ok(())
    }
}

/// Validates an ordered item collection: non-empty, valid items, unique ids.
pub fn validate_items(items: &[Item]) -> Result<(), ItemValidationError> {
    if items.is_empty() {
        return Err(ItemValidationError::NoItems);
    }
    let mut seen = std::collections::HashSet::with_capacity(items.len());
    for item in items {
        item.validate()?;
        if !seen.insert(&item.id) {
            return Err(ItemValidationError::DuplicateId(item.id.clone()));
        }
    }
    Ok(())
}
