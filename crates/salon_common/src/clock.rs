//! Time model shared by every crate.
//!
//! Appointment times travel as 12-hour clock strings (`"9:00 AM"`); all interval
//! math happens on minutes since midnight. [`MinuteRange::overlaps`] is the only
//! conflict rule in the workspace.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClockError {
    #[error("Invalid time format: {0:?} (expected \"H:MM AM\" or \"H:MM PM\")")]
    InvalidTimeFormat(String),
}

/// Parses `"H:MM AM|PM"` into minutes since midnight.
///
/// The hour is `1`-`12` with one or two digits (`"09:00 AM"` is accepted),
/// the minute is exactly two digits. 12 AM is midnight, 12 PM is noon.
pub fn parse_clock_minutes(s: &str) -> Result<u32, ClockError> {
    let invalid = || ClockError::InvalidTimeFormat(s.to_string());

    let (clock, period) = s.trim().split_once(' ').ok_or_else(invalid)?;
    let (hour, minute) = clock.split_once(':').ok_or_else(invalid)?;

    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || !all_digits(minute) || minute.len() != 2 {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&hour) || minute > 59 {
        return Err(invalid());
    }

    let hour = match (period, hour) {
        ("AM", 12) => 0,
        ("AM", h) => h,
        ("PM", 12) => 12,
        ("PM", h) => h + 12,
        _ => return Err(invalid()),
    };
    Ok(hour * 60 + minute)
}

/// Formats minutes since midnight as `"H:MM AM|PM"` (no leading zero on the hour).
/// Values past midnight wrap around.
pub fn format_clock_minutes(minutes: u32) -> String {
    let minutes = minutes % MINUTES_PER_DAY;
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
        .map(|time| time.format("%-I:%M %p").to_string())
        .unwrap_or_default()
}

/// Canonical spelling of a clock string, e.g. `"09:00 AM"` -> `"9:00 AM"`.
pub fn canonicalize_clock(s: &str) -> Result<String, ClockError> {
    parse_clock_minutes(s).map(format_clock_minutes)
}

/// Half-open busy or requested interval `[start, end)` in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MinuteRange {
    pub start: u32,
    pub end: u32,
}

impl MinuteRange {
    /// The end saturates at `u32::MAX` instead of wrapping.
    pub fn new(start: u32, duration_minutes: u32) -> Self {
        Self {
            start,
            end: start.saturating_add(duration_minutes),
        }
    }

    /// Builds the range of a clock-string start time lasting `duration_minutes`.
    pub fn from_clock(time: &str, duration_minutes: u32) -> Result<Self, ClockError> {
        parse_clock_minutes(time).map(|start| Self::new(start, duration_minutes))
    }

    pub fn duration_minutes(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// `a.start < b.end && a.end > b.start`. Touching ranges do not overlap.
    pub fn overlaps(&self, other: &MinuteRange) -> bool {
        self.start < other.end && self.end > other.start
    }
}
