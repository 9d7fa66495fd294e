// --- File: crates/salon_common/src/models.rs ---

// Records exchanged between the scheduling core and the datastore.

use crate::clock::{parse_clock_minutes, ClockError, MinuteRange};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Scheduled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Scheduled => "scheduled",
        }
    }
}

impl std::str::FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(AppointmentStatus::Scheduled),
            other => Err(format!("unknown appointment status: {other}")),
        }
    }
}

/// A booked appointment.
///
/// `id` is `None` until the datastore has persisted the record.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Option<String>,
    pub stylist_id: String,
    pub service_id: String,
    pub service_name: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "2030-01-08"))]
    pub date: NaiveDate,
    /// Canonical 12-hour clock string, e.g. "10:30 AM"
    pub time: String,
    pub duration_minutes: u32,
    pub customer_name: String,
    /// Ten digits, no separators
    pub customer_phone: String,
    pub status: AppointmentStatus,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// The interval during which the stylist is busy with this appointment.
    pub fn busy_interval(&self) -> BusyInterval {
        BusyInterval {
            stylist_id: self.stylist_id.clone(),
            time: self.time.clone(),
            duration_minutes: self.duration_minutes,
        }
    }
}

/// A stylist's declared unavailability ("time off") on one date.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedTime {
    pub id: Option<String>,
    pub stylist_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "2030-01-08"))]
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub reason: Option<String>,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = DateTime))]
    pub created_at: DateTime<Utc>,
}

impl BlockedTime {
    pub fn range(&self) -> Result<MinuteRange, ClockError> {
        let start = parse_clock_minutes(&self.start_time)?;
        let end = parse_clock_minutes(&self.end_time)?;
        Ok(MinuteRange {
            start,
            end: end.max(start),
        })
    }

    /// Same shape as an appointment's busy interval, without a service.
    pub fn busy_interval(&self) -> Result<BusyInterval, ClockError> {
        let range = self.range()?;
        Ok(BusyInterval {
            stylist_id: self.stylist_id.clone(),
            time: self.start_time.clone(),
            duration_minutes: range.duration_minutes(),
        })
    }
}

/// `[time, time + duration_minutes)` during which a stylist cannot take a booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyInterval {
    pub stylist_id: String,
    pub time: String,
    pub duration_minutes: u32,
}

impl BusyInterval {
    pub fn range(&self) -> Result<MinuteRange, ClockError> {
        MinuteRange::from_clock(&self.time, self.duration_minutes)
    }
}
