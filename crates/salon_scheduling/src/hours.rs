//! Weekly business hours, validated and converted to minutes.

use crate::error::SchedulingError;
use chrono::{Datelike, NaiveDate, Weekday};
use salon_common::{parse_clock_minutes, MinuteRange};
use salon_config::DayHoursConfig;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Opening hours of one weekday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    /// `start < end`, both in minutes since midnight.
    Open { start: u32, end: u32 },
}

impl DayHours {
    pub fn window(&self) -> Option<MinuteRange> {
        match *self {
            DayHours::Closed => None,
            DayHours::Open { start, end } => Some(MinuteRange { start, end }),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, DayHours::Open { .. })
    }
}

/// Monday to Sunday. Days absent from the configuration are closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusinessHours {
    days: [DayHours; 7],
}

pub const WEEK: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

impl BusinessHours {
    pub fn new(days: [DayHours; 7]) -> Self {
        Self { days }
    }

    /// Builds the table from `weekday name -> hours` config entries.
    ///
    /// Weekday names are case-insensitive (`"tuesday"`, `"Tue"`).
    pub fn from_config(config: &BTreeMap<String, DayHoursConfig>) -> Result<Self, SchedulingError> {
        let mut days = [DayHours::Closed; 7];
        let mut seen = [false; 7];

        for (name, day) in config {
            let weekday = Weekday::from_str(name).map_err(|_| {
                SchedulingError::InvalidConfiguration(format!("unknown weekday {name:?}"))
            })?;
            let index = weekday.num_days_from_monday() as usize;
            if seen[index] {
                return Err(SchedulingError::InvalidConfiguration(format!(
                    "business hours for {weekday} are defined twice"
                )));
            }
            seen[index] = true;
            days[index] = Self::parse_day(name, day)?;
        }
        Ok(Self { days })
    }

    fn parse_day(name: &str, day: &DayHoursConfig) -> Result<DayHours, SchedulingError> {
        if !day.is_open {
            return Ok(DayHours::Closed);
        }
        let (Some(start), Some(end)) = (day.start.as_deref(), day.end.as_deref()) else {
            return Err(SchedulingError::InvalidConfiguration(format!(
                "{name} is open but has no start or end time"
            )));
        };
        let invalid = |e| SchedulingError::InvalidConfiguration(format!("{name}: {e}"));
        let start = parse_clock_minutes(start).map_err(invalid)?;
        let end = parse_clock_minutes(end).map_err(invalid)?;
        if start >= end {
            return Err(SchedulingError::InvalidConfiguration(format!(
                "{name} opens at or after it closes"
            )));
        }
        Ok(DayHours::Open { start, end })
    }

    pub fn for_weekday(&self, weekday: Weekday) -> DayHours {
        self.days[weekday.num_days_from_monday() as usize]
    }

    pub fn for_date(&self, date: NaiveDate) -> DayHours {
        self.for_weekday(date.weekday())
    }

    /// Monday first.
    pub fn weekly(&self) -> impl Iterator<Item = (Weekday, DayHours)> + '_ {
        WEEK.iter().map(move |&day| (day, self.for_weekday(day)))
    }
}
