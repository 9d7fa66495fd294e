//! Candidate start times from business hours alone.
//!
//! The generator never looks at bookings; filtering is done in
//! [`crate::availability`].

use crate::hours::{BusinessHours, DayHours};
use chrono::NaiveDate;
use salon_common::format_clock_minutes;

pub const SLOT_STEP_MINUTES: u32 = 15;

/// Start minutes `t = start, start + 15, ...` with `t + duration <= end`.
///
/// Empty for a closed day, a zero duration, or a service longer than the day.
pub fn slot_minutes(day: DayHours, duration_minutes: u32) -> Vec<u32> {
    let DayHours::Open { start, end } = day else {
        return Vec::new();
    };
    if duration_minutes == 0 {
        return Vec::new();
    }
    (start..end)
        .step_by(SLOT_STEP_MINUTES as usize)
        .take_while(|t| t.saturating_add(duration_minutes) <= end)
        .collect()
}

/// Chronological candidate start times for `date` as clock strings.
pub fn generate_slots(hours: &BusinessHours, date: NaiveDate, duration_minutes: u32) -> Vec<String> {
    slot_minutes(hours.for_date(date), duration_minutes)
        .into_iter()
        .map(format_clock_minutes)
        .collect()
}
