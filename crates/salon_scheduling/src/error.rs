// --- File: crates/salon_scheduling/src/error.rs ---
use chrono::NaiveDate;
use salon_common::{ClockError, SalonError, StoreError};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum SchedulingError {
    /// A stored or configured clock string is malformed. Indicates bad data upstream.
    #[error(transparent)]
    InvalidTimeFormat(#[from] ClockError),
    #[error("Invalid salon configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Unknown service: {0}")]
    UnknownService(String),
    #[error("Unknown stylist: {0}")]
    UnknownStylist(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("{time} on {date} is not a bookable start time for this service")]
    OutsideBusinessHours { date: NaiveDate, time: String },
    #[error("No stylist is available on {date} at {time}. Please pick another time.")]
    NoStylistAvailable { date: NaiveDate, time: String },
    #[error("The {time} slot on {date} is no longer available. Please choose a new time.")]
    SlotNoLongerAvailable {
        stylist_id: String,
        date: NaiveDate,
        time: String,
    },
    #[error("Storage error: {0}")]
    Storage(StoreError),
}

impl SchedulingError {
    /// Stable short name used in rejection logs.
    pub fn reason(&self) -> &'static str {
        match self {
            SchedulingError::InvalidTimeFormat(_) => "invalid_time_format",
            SchedulingError::InvalidConfiguration(_) => "invalid_configuration",
            SchedulingError::UnknownService(_) => "unknown_service",
            SchedulingError::UnknownStylist(_) => "unknown_stylist",
            SchedulingError::InvalidRequest(_) => "invalid_request",
            SchedulingError::OutsideBusinessHours { .. } => "outside_business_hours",
            SchedulingError::NoStylistAvailable { .. } => "no_stylist_available",
            SchedulingError::SlotNoLongerAvailable { .. } => "slot_no_longer_available",
            SchedulingError::Storage(_) => "storage_error",
        }
    }
}

impl From<StoreError> for SchedulingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict {
                stylist_id,
                date,
                time,
            } => SchedulingError::SlotNoLongerAvailable {
                stylist_id,
                date,
                time,
            },
            other => SchedulingError::Storage(other),
        }
    }
}

impl From<SchedulingError> for SalonError {
    fn from(err: SchedulingError) -> Self {
        let message = err.to_string();
        match err {
            SchedulingError::InvalidTimeFormat(_) => {
                error!("Data integrity fault: {}", message);
                SalonError::InternalError("Stored schedule data is invalid".to_string())
            }
            SchedulingError::InvalidConfiguration(_) => SalonError::ConfigError(message),
            SchedulingError::UnknownService(_) | SchedulingError::UnknownStylist(_) => {
                SalonError::NotFoundError(message)
            }
            SchedulingError::InvalidRequest(_) | SchedulingError::OutsideBusinessHours { .. } => {
                SalonError::ValidationError(message)
            }
            SchedulingError::NoStylistAvailable { .. } => {
                salon_common::conflict("no_stylist_available", message)
            }
            SchedulingError::SlotNoLongerAvailable { .. } => {
                salon_common::conflict("slot_no_longer_available", message)
            }
            SchedulingError::Storage(_) => SalonError::DatabaseError(message),
        }
    }
}
