//! Persistence port for ledger blobs.
//!
//! # Responsibility
//! - Define the key-value contract the host storage must satisfy.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Values are opaque UTF-8 strings; the port never inspects them.
//! - `set` overwrites any previous value for the same key.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod memory;
mod sqlite_store;

pub use memory::MemoryKvStore;
pub use sqlite_store::SqliteKvStore;

/// Key holding the serialized item collection.
pub const ITEMS_KEY: &str = "@supplement_items";
/// Key holding the serialized item id -> record list mapping.
pub const RECORDS_KEY: &str = "@supplement_records";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage transport errors.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Failure reported by a non-SQLite backend.
    Backend(String),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "storage backend failure: {message}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Key-value get/set of serialized blobs supplied by the host.
pub trait KvStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        (**self).set(key, value)
    }
}
