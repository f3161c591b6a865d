//! Core domain logic for the intake tracker.
//! This crate is the single source of truth for ledger invariants.

pub mod clock;
pub mod codec;
pub mod db;
pub mod ledger;
pub mod logging;
pub mod model;
pub mod persist;
pub mod service;
pub mod store;

pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{decode_ledger, encode_ledger, CodecError};
pub use ledger::calendar::{DayMark, IntakeStatus, MarkStyle};
pub use ledger::stats::IntakeStats;
pub use ledger::{Ledger, LedgerError, LedgerResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemValidationError, DEFAULT_EMOJI};
pub use model::record::{DailyRecord, RecordHistory};
pub use persist::{load_ledger, save_items, save_records, PersistError};
pub use service::ledger_service::LedgerSession;
pub use store::{KvStore, MemoryKvStore, SqliteKvStore, StoreError, StoreResult};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
