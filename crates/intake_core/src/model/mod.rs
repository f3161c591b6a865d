//! Domain model for tracked items and their daily intake records.
//!
//! # Responsibility
//! - Define canonical data structures used by the ledger reducers.
//! - Keep persisted field names identical to the stored JSON blobs.
//!
//! # Invariants
//! - Every item is identified by a stable, non-empty `ItemId`.
//! - A record history holds at most one record per calendar date.

pub mod item;
pub mod record;
