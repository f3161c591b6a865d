//! All-time intake statistics per item.

use crate::model::record::RecordHistory;

/// Aggregate counts over every record of one item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntakeStats {
    pub taken_count: u32,
    pub not_taken_count: u32,
    pub total_days: u32,
    /// Rounded percentage in `0..=100`; `0` when `total_days == 0`.
    pub success_rate: u32,
}

impl IntakeStats {
    pub fn from_history(history: &RecordHistory) -> Self {
        let total_days = saturating_u32(history.len());
        let taken_count = saturating_u32(history.taken_count());
        Self {
            taken_count,
            not_taken_count: total_days - taken_count,
            total_days,
            success_rate: success_rate(taken_count, total_days),
        }
    }
}

/// `round(taken / total * 100)` evaluated in `f64`, as the app always has.
///
/// Ratios whose product lands just below `.5` (e.g. 57/200) round down.
pub fn success_rate(taken: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    let ratio = f64::from(taken.min(total)) / f64::from(total);
    (ratio * 100.0).round() as u32
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
