//! Session-level orchestration over the pure ledger reducers.
//!
//! # Responsibility
//! - Hold the single in-memory ledger and the current selection.
//! - Write changed blobs through to the persistence port after each mutation.

pub mod ledger_service;
