//! Intake ledger aggregate and its reducer-style operations.
//!
//! # Responsibility
//! - Own the item collection and per-item record histories.
//! - Apply user mutations as pure transforms returning a new `Ledger`.
//!
//! # Invariants
//! - `items` never drops below one entry.
//! - Item ids are unique.
//! - Every record history key names an existing item.
//! - Rejected operations leave the input ledger untouched.

pub mod calendar;
pub mod stats;

use crate::model::item::{validate_items, Item, ItemId, ItemValidationError, DEFAULT_EMOJI};
use crate::model::record::{DailyRecord, RecordHistory};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

use self::calendar::{build_calendar_marks, DayMark};
use self::stats::IntakeStats;

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors raised by ledger operations and ledger construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// `add_item` received a name that trims to empty.
    EmptyItemName,
    /// `delete_item` would leave the ledger without items.
    LastItem,
    /// The target item does not exist.
    UnknownItem(ItemId),
    /// Item collection violates its invariants.
    InvalidItems(ItemValidationError),
    /// A record history names an item that does not exist.
    OrphanedRecords(ItemId),
}

impl LedgerError {
    /// Whether this error is a rejected user action (shown as a blocking notice).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::EmptyItemName | Self::LastItem | Self::UnknownItem(_)
        )
    }

    /// Stable machine-readable code the host can map to its own strings.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyItemName => "empty_item_name",
            Self::LastItem => "last_item",
            Self::UnknownItem(_) => "unknown_item",
            Self::InvalidItems(_) => "invalid_items",
            Self::OrphanedRecords(_) => "orphaned_records",
        }
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyItemName => write!(f, "항목 이름을 입력해주세요."),
            Self::LastItem => write!(f, "최소 1개의 항목은 있어야 합니다."),
            Self::UnknownItem(id) => write!(f, "item not found: {id}"),
            Self::InvalidItems(err) => write!(f, "{err}"),
            Self::OrphanedRecords(id) => write!(f, "records reference unknown item: {id}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidItems(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ItemValidationError> for LedgerError {
    fn from(value: ItemValidationError) -> Self {
        Self::InvalidItems(value)
    }
}

/// Full in-memory aggregate of items and their daily records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ledger {
    items: Vec<Item>,
    records: BTreeMap<ItemId, RecordHistory>,
}

impl Default for Ledger {
    /// One seed item with no records.
    fn default() -> Self {
        Self {
            items: vec![Item::seed()],
            records: BTreeMap::new(),
        }
    }
}

impl Ledger {
    /// Builds a ledger from persisted parts, enforcing all aggregate invariants.
    pub fn try_from_parts(
        items: Vec<Item>,
        records: BTreeMap<ItemId, RecordHistory>,
    ) -> LedgerResult<Self> {
        validate_items(&items)?;
        if let Some(orphan) = records
            .keys()
            .find(|id| !items.iter().any(|item| &item.id == *id))
        {
            return Err(LedgerError::OrphanedRecords(orphan.clone()));
        }
        Ok(Self { items, records })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn records(&self) -> &BTreeMap<ItemId, RecordHistory> {
        &self.records
    }

    pub fn item(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| &item.id == id)
    }

    pub fn contains_item(&self, id: &ItemId) -> bool {
        self.item(id).is_some()
    }

    /// History for `id`; `None` when the item has never been toggled.
    pub fn history(&self, id: &ItemId) -> Option<&RecordHistory> {
        self.records.get(id)
    }

    /// Flips today's status for `item_id`.
    ///
    /// # Contract
    /// - Today is the UTC calendar date of `now`.
    /// - A missing record counts as not taken, so the first toggle sets `taken=true`.
    /// - The written record replaces any same-date record and carries `now`.
    pub fn toggle_today(&self, item_id: &ItemId, now: DateTime<Utc>) -> LedgerResult<Self> {
        if !self.contains_item(item_id) {
            return Err(LedgerError::UnknownItem(item_id.clone()));
        }

        let today = now.date_naive();
        let was_taken = self.is_taken_on(item_id, today);

        let mut next = self.clone();
        next.records
            .entry(item_id.clone())
            .or_default()
            .upsert(DailyRecord::new(today, !was_taken, now));
        Ok(next)
    }

    /// Appends a new item and returns its id.
    ///
    /// # Contract
    /// - `name` is trimmed; blank names are rejected.
    /// - Blank `emoji` falls back to `DEFAULT_EMOJI`.
    pub fn add_item(&self, name: &str, emoji: &str) -> LedgerResult<(Self, ItemId)> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::EmptyItemName);
        }
        let emoji = match emoji.trim() {
            "" => DEFAULT_EMOJI,
            value => value,
        };

        let mut id = ItemId::generate();
        while self.contains_item(&id) {
            id = ItemId::generate();
        }

        let mut next = self.clone();
        next.items.push(Item::with_id(id.clone(), name, emoji));
        Ok((next, id))
    }

    /// Removes an item together with its whole record history.
    pub fn delete_item(&self, item_id: &ItemId) -> LedgerResult<Self> {
        if self.items.len() <= 1 {
            return Err(LedgerError::LastItem);
        }
        if !self.contains_item(item_id) {
            return Err(LedgerError::UnknownItem(item_id.clone()));
        }

        let mut next = self.clone();
        next.items.retain(|item| &item.id != item_id);
        next.records.remove(item_id);
        Ok(next)
    }

    /// Whether `item_id` has a `taken=true` record on `date`.
    pub fn is_taken_on(&self, item_id: &ItemId, date: NaiveDate) -> bool {
        self.history(item_id)
            .and_then(|history| history.get(date))
            .is_some_and(|record| record.taken)
    }

    pub fn today_taken(&self, item_id: &ItemId, today: NaiveDate) -> bool {
        self.is_taken_on(item_id, today)
    }

    /// All-time statistics for `item_id`; zeroed when it has no records.
    pub fn stats_for(&self, item_id: &ItemId) -> IntakeStats {
        self.history(item_id)
            .map(IntakeStats::from_history)
            .unwrap_or_default()
    }

    /// Calendar markers for every recorded date plus `today`.
    pub fn calendar_marks(
        &self,
        item_id: &ItemId,
        today: NaiveDate,
    ) -> BTreeMap<NaiveDate, DayMark> {
        build_calendar_marks(self.history(item_id), today)
    }
}

#[cfg(test)]
mod tests {
    use super::{Ledger, LedgerError};
    use crate::model::item::{Item, ItemId, DEFAULT_EMOJI};
    use crate::model::record::RecordHistory;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;

    #[test]
    fn first_toggle_sets_taken_and_second_reverts() {
        let ledger = Ledger::default();
        let seed = ItemId::new("1");
        let now = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();

        let once = ledger.toggle_today(&seed, now).unwrap();
        assert!(once.today_taken(&seed, now.date_naive()));

        let twice = once.toggle_today(&seed, now).unwrap();
        assert!(!twice.today_taken(&seed, now.date_naive()));
        assert_eq!(twice.history(&seed).unwrap().len(), 1);
    }

    #[test]
    fn toggle_replaces_timestamp_and_keeps_other_dates() {
        let seed = ItemId::new("1");
        let day_one = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let day_two_morning = Utc.with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap();
        let day_two_evening = Utc.with_ymd_and_hms(2024, 3, 5, 21, 0, 0).unwrap();

        let ledger = Ledger::default()
            .toggle_today(&seed, day_one)
            .unwrap()
            .toggle_today(&seed, day_two_morning)
            .unwrap()
            .toggle_today(&seed, day_two_evening)
            .unwrap();

        let history = ledger.history(&seed).unwrap();
        assert_eq!(history.len(), 2);
        let latest = history.get(day_two_evening.date_naive()).unwrap();
        assert_eq!(latest.timestamp, day_two_evening);
        assert!(!latest.taken);
        assert!(history.get(day_one.date_naive()).unwrap().taken);
    }

    #[test]
    fn toggle_unknown_item_is_rejected() {
        let ledger = Ledger::default();
        let err = ledger
            .toggle_today(&ItemId::new("missing"), Utc::now())
            .unwrap_err();
        assert_eq!(err, LedgerError::UnknownItem(ItemId::new("missing")));
    }

    #[test]
    fn add_item_trims_name_and_defaults_emoji() {
        let ledger = Ledger::default();
        let (next, id) = ledger.add_item("  Omega 3 ", " ").unwrap();

        assert_eq!(next.items().len(), 2);
        let added = next.item(&id).unwrap();
        assert_eq!(added.name, "Omega 3");
        assert_eq!(added.emoji, DEFAULT_EMOJI);
        assert_eq!(next.items().last().unwrap().id, id);
    }

    #[test]
    fn add_item_rejects_blank_name_without_mutation() {
        let ledger = Ledger::default();
        let err = ledger.add_item("  ", "🧪").unwrap_err();
        assert_eq!(err, LedgerError::EmptyItemName);
        assert!(err.is_validation());
        assert_eq!(ledger, Ledger::default());
    }

    #[test]
    fn validation_notices_keep_app_wording_and_stable_codes() {
        assert_eq!(LedgerError::EmptyItemName.to_string(), "항목 이름을 입력해주세요.");
        assert_eq!(LedgerError::EmptyItemName.code(), "empty_item_name");
        assert_eq!(LedgerError::LastItem.to_string(), "최소 1개의 항목은 있어야 합니다.");
        assert_eq!(LedgerError::LastItem.code(), "last_item");
        assert_eq!(LedgerError::UnknownItem(ItemId::new("x")).code(), "unknown_item");
    }

    #[test]
    fn delete_item_enforces_floor_and_cascades_records() {
        let seed = ItemId::new("1");
        let ledger = Ledger::default();
        assert_eq!(ledger.delete_item(&seed).unwrap_err(), LedgerError::LastItem);

        let (ledger, other) = ledger.add_item("Vitamin D", "☀️").unwrap();
        let ledger = ledger.toggle_today(&seed, Utc::now()).unwrap();
        let ledger = ledger.delete_item(&seed).unwrap();

        assert_eq!(ledger.items().len(), 1);
        assert_eq!(ledger.items()[0].id, other);
        assert!(ledger.history(&seed).is_none());
    }

    #[test]
    fn try_from_parts_rejects_orphaned_records() {
        let mut records = BTreeMap::new();
        records.insert(ItemId::new("ghost"), RecordHistory::new());
        let err = Ledger::try_from_parts(vec![Item::seed()], records).unwrap_err();
        assert_eq!(err, LedgerError::OrphanedRecords(ItemId::new("ghost")));
    }
}
