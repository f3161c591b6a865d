//! Daily intake records and per-item record history.
//!
//! # Invariants
//! - A `RecordHistory` holds at most one record per calendar date.
//! - Iteration and serialization order is most-recent-first.
//! - Decoding a list with duplicate dates keeps the first occurrence.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day's taken/not-taken entry for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Calendar date, serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
    pub taken: bool,
    /// Instant of the last write to this record.
    pub timestamp: DateTime<Utc>,
}

impl DailyRecord {
    pub fn new(date: NaiveDate, taken: bool, timestamp: DateTime<Utc>) -> Self {
        Self {
            date,
            taken,
            timestamp,
        }
    }
}

/// Date-keyed record history for a single item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DailyRecord>", into = "Vec<DailyRecord>")]
pub struct RecordHistory {
    by_date: BTreeMap<NaiveDate, DailyRecord>,
}

impl RecordHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.by_date.get(&date)
    }

    /// Inserts `record`, replacing any record stored for the same date.
    pub fn upsert(&mut self, record: DailyRecord) {
        self.by_date.insert(record.date, record);
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Iterates records from the latest date to the earliest.
    pub fn iter_recent_first(&self) -> impl Iterator<Item = &DailyRecord> {
        self.by_date.values().rev()
    }

    pub fn taken_count(&self) -> usize {
        self.by_date.values().filter(|record| record.taken).count()
    }
}

impl From<Vec<DailyRecord>> for RecordHistory {
    fn from(records: Vec<DailyRecord>) -> Self {
        let mut by_date = BTreeMap::new();
        for record in records {
            by_date.entry(record.date).or_insert(record);
        }
        Self { by_date }
    }
}

impl From<RecordHistory> for Vec<DailyRecord> {
    fn from(history: RecordHistory) -> Self {
        history.by_date.into_values().rev().collect()
    }
}
