use chrono::{TimeZone, Utc};
use intake_core::db::migrations::latest_version;
use intake_core::db::{open_db, open_db_in_memory, DbError};
use intake_core::store::{ITEMS_KEY, RECORDS_KEY};
use intake_core::{FixedClock, KvStore, LedgerSession, SqliteKvStore, StoreError};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();
    assert_eq!(schema_version(&conn), latest_version());

    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1);
}

#[test]
fn newer_schema_version_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    match SqliteKvStore::open(&path) {
        Err(StoreError::Db(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        })) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("future schema should be rejected"),
    }
}

#[test]
fn get_set_upserts_values() {
    let store = SqliteKvStore::open_in_memory().unwrap();
    assert_eq!(store.get(ITEMS_KEY).unwrap(), None);

    store.set(ITEMS_KEY, "[1]").unwrap();
    store.set(ITEMS_KEY, "[2]").unwrap();
    assert_eq!(store.get(ITEMS_KEY).unwrap().as_deref(), Some("[2]"));

    let rows: i64 = store
        .connection()
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn session_state_survives_reopening_file_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite3");
    let clock = FixedClock::new(Utc.with_ymd_and_hms(2024, 10, 3, 7, 0, 0).unwrap());

    let added = {
        let mut session = LedgerSession::load(SqliteKvStore::open(&path).unwrap(), &clock);
        let added = session.add_item("Probiotic", "🦠").unwrap();
        session.toggle_today(&added).unwrap();
        added
    };

    let reopened = SqliteKvStore::open(&path).unwrap();
    assert!(reopened.get(RECORDS_KEY).unwrap().is_some());
    assert_eq!(schema_version(reopened.connection()), latest_version());

    let mut session = LedgerSession::load(reopened, &clock);
    assert_eq!(session.items().len(), 2);
    session.select_item(&added).unwrap();
    assert!(session.today_taken());
    assert_eq!(session.stats().success_rate, 100);
}

#[test]
fn open_db_is_idempotent_for_same_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("twice.sqlite3");
    drop(open_db(&path).unwrap());
    let conn = open_db(&path).unwrap();
    assert_eq!(schema_version(&conn), latest_version());
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}
