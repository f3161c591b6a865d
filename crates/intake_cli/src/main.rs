//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `intake_core` linkage.
//! - Print a deterministic demo readout against an in-memory store.

use chrono::{TimeZone, Utc};
use intake_core::{FixedClock, LedgerSession, MemoryKvStore};

fn main() {
    println!("intake_core ping={}", intake_core::ping());
    println!("intake_core version={}", intake_core::core_version());

    let Some(now) = Utc.with_ymd_and_hms(2024, 1, 2, 9, 0, 0).single() else {
        return;
    };
    let clock = FixedClock::new(now);
    let mut session = LedgerSession::load(MemoryKvStore::new(), &clock);
    let seed = session.selected_id().clone();
    if let Err(err) = session.toggle_today(&seed) {
        println!("demo toggle rejected: {err}");
        return;
    }

    let item = session.selected_item();
    let stats = session.stats();
    println!(
        "demo item={} {} today={} taken={} total_days={} success_rate={}%",
        item.emoji,
        item.name,
        session.today(),
        session.today_taken(),
        stats.total_days,
        stats.success_rate
    );
}
