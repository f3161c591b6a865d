//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the ledger session to Dart via FRB as sync calls.
//! - Flatten core types into plain string/number envelopes.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - One session per process, created lazily on first use.
//! - Validation failures are reported in `message` with `ok = false`.

use intake_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    DayMark, IntakeStats, ItemId, KvStore, LedgerError, LedgerSession, MemoryKvStore, SqliteKvStore,
    SystemClock,
};
use log::error;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const LEDGER_DB_FILE_NAME: &str = "intake_ledger.sqlite3";
const LEDGER_DB_PATH_ENV: &str = "INTAKE_DB_PATH";

type SessionStore = Box<dyn KvStore + Send>;
type Session = LedgerSession<SessionStore, SystemClock>;

static LEDGER_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
// FFI statics must be `Sync`; calls still arrive from the single UI isolate.
static SESSION: OnceLock<Mutex<Session>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Item row for the selector tabs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

/// Statistics readout for the selected item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsView {
    pub taken_count: u32,
    pub not_taken_count: u32,
    pub total_days: u32,
    pub success_rate: u32,
}

/// One calendar cell marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMarkView {
    /// `YYYY-MM-DD`.
    pub date: String,
    /// `taken|not_taken`, absent for an unrecorded today.
    pub status: Option<String>,
    pub is_today: bool,
    pub dot_color: Option<String>,
    pub selected_color: Option<String>,
}

/// Everything the main screen renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSnapshot {
    pub items: Vec<ItemView>,
    pub selected_item_id: String,
    pub today: String,
    pub today_taken: bool,
    pub stats: StatsView,
    /// Sorted by date ascending.
    pub marks: Vec<CalendarMarkView>,
}

/// Response envelope for ledger actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerActionResponse {
    pub ok: bool,
    /// Item created or targeted by the action, when any.
    pub item_id: Option<String>,
    /// Human-readable outcome or blocking notice.
    pub message: String,
    /// Stable rejection code (`empty_item_name|last_item|unknown_item`), `None` on success.
    pub code: Option<String>,
    /// State after the action; unchanged state on rejection.
    pub snapshot: LedgerSnapshot,
}

/// Returns the current screen state.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_snapshot() -> LedgerSnapshot {
    with_session(|session| snapshot(session))
}

/// Changes the selected item tab.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_select(item_id: String) -> LedgerActionResponse {
    with_session(|session| {
        let id = ItemId::new(item_id);
        match session.select_item(&id) {
            Ok(()) => success(session, Some(id), "Item selected."),
            Err(err) => failure(session, Some(id), err),
        }
    })
}

/// Flips today's intake status for `item_id`.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_toggle_today(item_id: String) -> LedgerActionResponse {
    with_session(|session| {
        let id = ItemId::new(item_id);
        match session.toggle_today(&id) {
            Ok(true) => success(session, Some(id), "Marked as taken."),
            Ok(false) => success(session, Some(id), "Marked as not taken."),
            Err(err) => failure(session, Some(id), err),
        }
    })
}

/// Creates an item from the add dialog.
///
/// Blank `emoji` falls back to the default glyph.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_add_item(name: String, emoji: String) -> LedgerActionResponse {
    with_session(|session| match session.add_item(&name, &emoji) {
        Ok(id) => success(session, Some(id), "Item added."),
        Err(err) => failure(session, None, err),
    })
}

/// Deletes an item and all of its records.
#[flutter_rust_bridge::frb(sync)]
pub fn ledger_delete_item(item_id: String) -> LedgerActionResponse {
    with_session(|session| {
        let id = ItemId::new(item_id);
        match session.delete_item(&id) {
            Ok(()) => success(session, Some(id), "Item deleted."),
            Err(err) => failure(session, Some(id), err),
        }
    })
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> T {
    let session = SESSION.get_or_init(|| Mutex::new(open_session()));
    let mut guard = session.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

fn open_session() -> Session {
    let db_path = resolve_ledger_db_path();
    let store: SessionStore = match SqliteKvStore::open(&db_path) {
        Ok(store) => Box::new(store),
        Err(err) => {
            error!(
                "event=session_open module=ffi status=fallback store=memory error={}",
                err
            );
            Box::new(MemoryKvStore::new())
        }
    };
    LedgerSession::load(store, SystemClock)
}

fn resolve_ledger_db_path() -> PathBuf {
    LEDGER_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(LEDGER_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(LEDGER_DB_FILE_NAME)
        })
        .clone()
}

fn success(session: &Session, item_id: Option<ItemId>, message: &str) -> LedgerActionResponse {
    LedgerActionResponse {
        ok: true,
        item_id: item_id.map(|id| id.to_string()),
        message: message.to_string(),
        code: None,
        snapshot: snapshot(session),
    }
}

fn failure(
    session: &Session,
    item_id: Option<ItemId>,
    err: LedgerError,
) -> LedgerActionResponse {
    LedgerActionResponse {
        ok: false,
        item_id: item_id.map(|id| id.to_string()),
        message: err.to_string(),
        code: Some(err.code().to_string()),
        snapshot: snapshot(session),
    }
}

fn snapshot(session: &Session) -> LedgerSnapshot {
    LedgerSnapshot {
        items: session
            .items()
            .iter()
            .map(|item| ItemView {
                id: item.id.to_string(),
                name: item.name.clone(),
                emoji: item.emoji.clone(),
            })
            .collect(),
        selected_item_id: session.selected_id().to_string(),
        today: session.today().format("%Y-%m-%d").to_string(),
        today_taken: session.today_taken(),
        stats: to_stats_view(session.stats()),
        marks: session
            .calendar_marks()
            .into_iter()
            .map(|(date, mark)| to_mark_view(date.format("%Y-%m-%d").to_string(), mark))
            .collect(),
    }
}

fn to_stats_view(stats: IntakeStats) -> StatsView {
    StatsView {
        taken_count: stats.taken_count,
        not_taken_count: stats.not_taken_count,
        total_days: stats.total_days,
        success_rate: stats.success_rate,
    }
}

fn to_mark_view(date: String, mark: DayMark) -> CalendarMarkView {
    let style = mark.style();
    CalendarMarkView {
        date,
        status: mark.status.map(|status| status.as_str().to_string()),
        is_today: mark.is_today,
        dot_color: style.dot_color.map(str::to_string),
        selected_color: style.selected_color.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, init_logging, ledger_add_item, ledger_delete_item, ledger_select,
        ledger_snapshot, ledger_toggle_today, ping, resolve_ledger_db_path, LEDGER_DB_FILE_NAME,
        LEDGER_DB_PATH,
    };
    use std::sync::OnceLock;
    use std::time::{SystemTime, UNIX_EPOCH};

    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    /// Points the process session at a per-run temp database.
    ///
    /// Must run before the first session call of every test.
    fn use_temp_db() {
        let dir = TEST_DB_DIR.get_or_init(|| tempfile::tempdir().expect("create temp dir"));
        let path = dir.path().join(LEDGER_DB_FILE_NAME);
        LEDGER_DB_PATH.get_or_init(|| path.clone());
        assert_eq!(resolve_ledger_db_path(), path);
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn session_writes_to_per_run_temp_database() {
        use_temp_db();
        let added = ledger_add_item(unique_token("temp-db"), String::new());
        assert!(added.ok, "{}", added.message);

        let path = resolve_ledger_db_path();
        let dir = TEST_DB_DIR.get().expect("temp dir initialized");
        assert!(path.starts_with(dir.path()));
        assert!(path.exists());

        let deleted = ledger_delete_item(added.item_id.expect("item_id"));
        assert!(deleted.ok, "{}", deleted.message);
    }

    #[test]
    fn snapshot_always_has_a_selected_item_and_today_mark() {
        use_temp_db();
        let snapshot = ledger_snapshot();
        assert!(!snapshot.items.is_empty());
        assert!(snapshot
            .items
            .iter()
            .any(|item| item.id == snapshot.selected_item_id));
        assert!(snapshot
            .marks
            .iter()
            .any(|mark| mark.is_today && mark.date == snapshot.today));
    }

    #[test]
    fn add_blank_name_is_rejected_with_notice() {
        use_temp_db();
        let response = ledger_add_item("   ".to_string(), "🧪".to_string());
        assert!(!response.ok);
        assert_eq!(response.message, "항목 이름을 입력해주세요.");
        assert_eq!(response.code.as_deref(), Some("empty_item_name"));
        assert!(response.item_id.is_none());
        assert!(!response.snapshot.items.is_empty());
    }

    #[test]
    fn add_toggle_and_delete_round_trip() {
        use_temp_db();
        let name = unique_token("ffi-item");
        let added = ledger_add_item(name.clone(), String::new());
        assert!(added.ok, "{}", added.message);
        let item_id = added.item_id.expect("add should return item_id");
        let item = added
            .snapshot
            .items
            .iter()
            .find(|item| item.id == item_id)
            .expect("added item should be listed");
        assert_eq!(item.name, name);
        assert_eq!(item.emoji, "💊");

        let toggled = ledger_toggle_today(item_id.clone());
        assert!(toggled.ok, "{}", toggled.message);
        assert_eq!(toggled.message, "Marked as taken.");
        let toggled_back = ledger_toggle_today(item_id.clone());
        assert_eq!(toggled_back.message, "Marked as not taken.");

        let selected = ledger_select(item_id.clone());
        assert!(selected.ok, "{}", selected.message);

        let deleted = ledger_delete_item(item_id.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert_eq!(deleted.code, None);
        assert!(deleted.snapshot.items.iter().all(|item| item.id != item_id));
        assert_ne!(deleted.snapshot.selected_item_id, item_id);
    }

    #[test]
    fn unknown_item_actions_fail_softly() {
        use_temp_db();
        let missing = unique_token("missing");
        let toggled = ledger_toggle_today(missing.clone());
        assert!(!toggled.ok);
        assert!(toggled.message.contains("item not found"));
        assert_eq!(toggled.code.as_deref(), Some("unknown_item"));

        let selected = ledger_select(missing);
        assert!(!selected.ok);
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
