//! Ledger session service.
//!
//! # Responsibility
//! - Provide the entry points the UI layer calls (toggle, add, delete, select).
//! - Expose derived views for the selected item.
//!
//! # Invariants
//! - The in-memory ledger is swapped before persistence is attempted.
//! - Persistence failures are logged and never roll back the swap.
//! - `selected` always names an item present in the ledger.

use crate::clock::Clock;
use crate::ledger::calendar::DayMark;
use crate::ledger::stats::IntakeStats;
use crate::ledger::{Ledger, LedgerError, LedgerResult};
use crate::model::item::{Item, ItemId};
use crate::persist::{load_ledger, save_items, save_records, PersistError};
use crate::store::KvStore;
use chrono::NaiveDate;
use log::{error, info};
use std::collections::BTreeMap;

/// Which blobs a mutation touched.
#[derive(Debug, Clone, Copy)]
enum Dirty {
    Items,
    Records,
    Both,
}

/// Owns the ledger for one UI session.
pub struct LedgerSession<S: KvStore, C: Clock> {
    store: S,
    clock: C,
    ledger: Ledger,
    selected: ItemId,
}

impl<S: KvStore, C: Clock> LedgerSession<S, C> {
    /// Loads the ledger from `store` and selects the first item.
    pub fn load(store: S, clock: C) -> Self {
        let ledger = load_ledger(&store);
        let selected = first_item_id(&ledger);
        Self {
            store,
            clock,
            ledger,
            selected,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn items(&self) -> &[Item] {
        self.ledger.items()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn selected_id(&self) -> &ItemId {
        &self.selected
    }

    pub fn selected_item(&self) -> &Item {
        // `selected` is kept in sync with the item list by every mutation.
        self.ledger
            .item(&self.selected)
            .unwrap_or(&self.ledger.items()[0])
    }

    pub fn select_item(&mut self, item_id: &ItemId) -> LedgerResult<()> {
        if !self.ledger.contains_item(item_id) {
            return Err(LedgerError::UnknownItem(item_id.clone()));
        }
        self.selected = item_id.clone();
        Ok(())
    }

    /// Flips today's status of `item_id` and persists the records blob.
    pub fn toggle_today(&mut self, item_id: &ItemId) -> LedgerResult<bool> {
        let now = self.clock.now();
        let next = self
            .ledger
            .toggle_today(item_id, now)
            .inspect_err(|err| log_rejected("toggle_today", err))?;
        let taken = next.today_taken(item_id, now.date_naive());
        self.commit(next, Dirty::Records);
        info!("event=intake_toggle module=service status=ok taken={taken}");
        Ok(taken)
    }

    /// Adds an item and persists the items blob.
    pub fn add_item(&mut self, name: &str, emoji: &str) -> LedgerResult<ItemId> {
        let (next, id) = self
            .ledger
            .add_item(name, emoji)
            .inspect_err(|err| log_rejected("add_item", err))?;
        self.commit(next, Dirty::Items);
        info!(
            "event=item_add module=service status=ok items={}",
            self.ledger.items().len()
        );
        Ok(id)
    }

    /// Deletes an item with its history and persists both blobs.
    ///
    /// Selection falls back to the first remaining item when the deleted
    /// item was selected.
    pub fn delete_item(&mut self, item_id: &ItemId) -> LedgerResult<()> {
        let next = self
            .ledger
            .delete_item(item_id)
            .inspect_err(|err| log_rejected("delete_item", err))?;
        self.commit(next, Dirty::Both);
        if &self.selected == item_id {
            self.selected = first_item_id(&self.ledger);
        }
        info!(
            "event=item_delete module=service status=ok items={}",
            self.ledger.items().len()
        );
        Ok(())
    }

    pub fn today_taken(&self) -> bool {
        self.ledger.today_taken(&self.selected, self.today())
    }

    pub fn stats(&self) -> IntakeStats {
        self.ledger.stats_for(&self.selected)
    }

    pub fn calendar_marks(&self) -> BTreeMap<NaiveDate, DayMark> {
        self.ledger.calendar_marks(&self.selected, self.today())
    }

    fn commit(&mut self, next: Ledger, dirty: Dirty) {
        self.ledger = next;
        let result = match dirty {
            Dirty::Items => save_items(&self.store, &self.ledger),
            Dirty::Records => save_records(&self.store, &self.ledger),
            Dirty::Both => save_items(&self.store, &self.ledger)
                .and_then(|()| save_records(&self.store, &self.ledger)),
        };
        if let Err(err) = result {
            log_persist_failure(dirty, &err);
        }
    }
}

fn first_item_id(ledger: &Ledger) -> ItemId {
    ledger.items()[0].id.clone()
}

fn log_rejected(operation: &str, err: &LedgerError) {
    info!("event={operation} module=service status=rejected reason={err}");
}

fn log_persist_failure(dirty: Dirty, err: &PersistError) {
    error!(
        "event=ledger_persist module=service status=error blobs={:?} error={}",
        dirty, err
    );
}

#[cfg(test)]
mod tests {
    use super::LedgerSession;
    use crate::clock::FixedClock;
    use crate::ledger::LedgerError;
    use crate::model::item::ItemId;
    use crate::store::{KvStore, MemoryKvStore, StoreError, StoreResult, ITEMS_KEY};
    use chrono::{TimeZone, Utc};

    struct ReadOnlyStore;

    impl KvStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Backend("read-only".to_string()))
        }
    }

    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).unwrap())
    }

    #[test]
    fn toggle_persists_and_reflects_today() {
        let store = MemoryKvStore::new();
        let mut session = LedgerSession::load(&store, clock());
        let seed = session.selected_id().clone();

        assert!(!session.today_taken());
        assert!(session.toggle_today(&seed).unwrap());
        assert!(session.today_taken());
        assert_eq!(session.stats().success_rate, 100);

        let reloaded = LedgerSession::load(&store, clock());
        assert!(reloaded.today_taken());
    }

    #[test]
    fn write_failure_keeps_in_memory_change() {
        let mut session = LedgerSession::load(ReadOnlyStore, clock());
        let id = session.add_item("Vitamin C", "🍊").unwrap();
        assert_eq!(session.items().len(), 2);
        assert!(session.toggle_today(&id).unwrap());
        assert!(session.ledger().today_taken(&id, session.today()));
    }

    #[test]
    fn rejected_add_leaves_store_untouched() {
        let store = MemoryKvStore::new();
        let mut session = LedgerSession::load(&store, clock());
        assert_eq!(session.add_item("  ", "🧪").unwrap_err(), LedgerError::EmptyItemName);
        assert_eq!(session.items().len(), 1);
        assert!(store.get(ITEMS_KEY).unwrap().is_none());
    }

    #[test]
    fn select_unknown_item_is_rejected() {
        let mut session = LedgerSession::load(MemoryKvStore::new(), clock());
        let err = session.select_item(&ItemId::new("nope")).unwrap_err();
        assert_eq!(err, LedgerError::UnknownItem(ItemId::new("nope")));
        assert_eq!(session.selected_id(), &ItemId::new("1"));
    }
}
