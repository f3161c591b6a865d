//! Loading and saving the ledger through a `KvStore`.
//!
//! # Invariants
//! - `load_ledger` never fails: any read, parse or validation problem falls
//!   back to `Ledger::default()`.
//! - Record histories for unknown items are dropped on load.
//! - Only metadata (keys, counts, error text) is logged, never item names.

use crate::codec::{decode_items, decode_records, encode_items, encode_records, CodecError};
use crate::ledger::Ledger;
use crate::model::item::Item;
use crate::store::{KvStore, StoreError, ITEMS_KEY, RECORDS_KEY};
use log::{info, warn};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure while moving a ledger blob between memory and storage.
#[derive(Debug)]
pub enum PersistError {
    Store(StoreError),
    Codec(CodecError),
}

impl Display for PersistError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Store(err) => write!(f, "{err}"),
            Self::Codec(err) => write!(f, "{err}"),
        }
    }
}

impl Error for PersistError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Store(err) => Some(err),
            Self::Codec(err) => Some(err),
        }
    }
}

impl From<StoreError> for PersistError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

impl From<CodecError> for PersistError {
    fn from(value: CodecError) -> Self {
        Self::Codec(value)
    }
}

/// Reads both blobs and builds the session ledger.
///
/// Absent items blob yields the seed item; absent records blob yields no
/// records.
pub fn load_ledger(store: &impl KvStore) -> Ledger {
    match try_load_ledger(store) {
        Ok(ledger) => {
            info!(
                "event=ledger_load module=persist status=ok items={} histories={}",
                ledger.items().len(),
                ledger.records().len()
            );
            ledger
        }
        Err(err) => {
            warn!(
                "event=ledger_load module=persist status=fallback error={}",
                err
            );
            Ledger::default()
        }
    }
}

fn try_load_ledger(store: &impl KvStore) -> Result<Ledger, PersistError> {
    let items = match store.get(ITEMS_KEY)? {
        Some(blob) => decode_items(&blob)?,
        None => vec![Item::seed()],
    };
    let mut records = match store.get(RECORDS_KEY)? {
        Some(blob) => decode_records(&blob)?,
        None => BTreeMap::new(),
    };

    let before = records.len();
    records.retain(|id, _| items.iter().any(|item| &item.id == id));
    if records.len() != before {
        warn!(
            "event=ledger_load module=persist status=pruned orphaned_histories={}",
            before - records.len()
        );
    }

    Ledger::try_from_parts(items, records).map_err(|err| PersistError::Codec(err.into()))
}

/// Writes the items blob.
pub fn save_items(store: &impl KvStore, ledger: &Ledger) -> Result<(), PersistError> {
    let blob = encode_items(ledger.items())?;
    store.set(ITEMS_KEY, &blob)?;
    Ok(())
}

/// Writes the records blob.
pub fn save_records(store: &impl KvStore, ledger: &Ledger) -> Result<(), PersistError> {
    let blob = encode_records(ledger.records())?;
    store.set(RECORDS_KEY, &blob)?;
    Ok(())
}
