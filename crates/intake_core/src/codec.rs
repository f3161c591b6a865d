//! JSON encoding of the two persisted ledger blobs.
//!
//! # Responsibility
//! - Serialize items as an array of `{id,name,emoji}`.
//! - Serialize records as `{ item_id: [ {date,taken,timestamp}, ... ] }`,
//!   lists most-recent-first.
//!
//! # Invariants
//! - `decode_ledger(encode_ledger(l)) == l` for every valid ledger.
//! - Decoding never bypasses `Ledger::try_from_parts` validation.

use crate::ledger::{Ledger, LedgerError};
use crate::model::item::{Item, ItemId};
use crate::model::record::RecordHistory;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RecordsMap = BTreeMap<ItemId, RecordHistory>;

#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    InvalidLedger(LedgerError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed ledger blob: {err}"),
            Self::InvalidLedger(err) => write!(f, "invalid ledger content: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::InvalidLedger(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<LedgerError> for CodecError {
    fn from(value: LedgerError) -> Self {
        Self::InvalidLedger(value)
    }
}

pub fn encode_items(items: &[Item]) -> Result<String, CodecError> {
    Ok(serde_json::to_string(items)?)
}

pub fn encode_records(records: &RecordsMap) -> Result<String, CodecError> {
    Ok(serde_json::to_string(records)?)
}

pub fn decode_items(blob: &str) -> Result<Vec<Item>, CodecError> {
    Ok(serde_json::from_str(blob)?)
}

pub fn decode_records(blob: &str) -> Result<RecordsMap, CodecError> {
    Ok(serde_json::from_str(blob)?)
}

/// Encodes a ledger as `(items_blob, records_blob)`.
pub fn encode_ledger(ledger: &Ledger) -> Result<(String, String), CodecError> {
    Ok((
        encode_items(ledger.items())?,
        encode_records(ledger.records())?,
    ))
}

/// Decodes both blobs into a validated ledger.
pub fn decode_ledger(items_blob: &str, records_blob: &str) -> Result<Ledger, CodecError> {
    let items = decode_items(items_blob)?;
    let records = decode_records(records_blob)?;
    Ok(Ledger::try_from_parts(items, records)?)
}
