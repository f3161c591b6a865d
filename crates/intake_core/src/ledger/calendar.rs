//! Calendar markers derived from an item's record history.
//!
//! Today's marker is layered on top of any recorded status rather than
//! replacing it.

use crate::model::record::RecordHistory;
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub const TAKEN_DOT_COLOR: &str = "#4CAF50";
pub const NOT_TAKEN_DOT_COLOR: &str = "#F44336";
pub const TODAY_EMPTY_COLOR: &str = "#E0E0E0";
pub const TODAY_TAKEN_COLOR: &str = "#E8F5E9";
pub const TODAY_NOT_TAKEN_COLOR: &str = "#FFEBEE";

/// Recorded status of one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntakeStatus {
    Taken,
    NotTaken,
}

impl IntakeStatus {
    pub fn from_taken(taken: bool) -> Self {
        if taken {
            Self::Taken
        } else {
            Self::NotTaken
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Taken => "taken",
            Self::NotTaken => "not_taken",
        }
    }
}

/// Marker for one calendar cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayMark {
    /// `None` only for today when nothing was recorded yet.
    pub status: Option<IntakeStatus>,
    pub is_today: bool,
}

/// Visual palette resolved from a `DayMark`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkStyle {
    pub dot_color: Option<&'static str>,
    pub selected_color: Option<&'static str>,
}

impl DayMark {
    pub fn style(&self) -> MarkStyle {
        let dot_color = self.status.map(|status| match status {
            IntakeStatus::Taken => TAKEN_DOT_COLOR,
            IntakeStatus::NotTaken => NOT_TAKEN_DOT_COLOR,
        });
        let selected_color = self.is_today.then_some(match self.status {
            None => TODAY_EMPTY_COLOR,
            Some(IntakeStatus::Taken) => TODAY_TAKEN_COLOR,
            Some(IntakeStatus::NotTaken) => TODAY_NOT_TAKEN_COLOR,
        });
        MarkStyle {
            dot_color,
            selected_color,
        }
    }
}

pub(crate) fn build_calendar_marks(
    history: Option<&RecordHistory>,
    today: NaiveDate,
) -> BTreeMap<NaiveDate, DayMark> {
    let mut marks: BTreeMap<NaiveDate, DayMark> = history
        .into_iter()
        .flat_map(|history| history.iter_recent_first())
        .map(|record| {
            (
                record.date,
                DayMark {
                    status: Some(IntakeStatus::from_taken(record.taken)),
                    is_today: false,
                },
            )
        })
        .collect();

    marks
        .entry(today)
        .or_insert(DayMark {
            status: None,
            is_today: true,
        })
        .is_today = true;
    marks
}
