//! Flutter bridge crate for the intake ledger.

pub mod api;
