// --- File: crates/salon_common/src/services.rs ---
//! Datastore contract.
//!
//! The scheduling core never talks to a database directly. It reads busy
//! intervals and writes appointments through [`BookingStore`], which keeps the
//! core testable with an in-memory implementation.

use crate::models::{Appointment, BlockedTime, BusyInterval};
use chrono::NaiveDate;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// Errors reported by a datastore.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The conditional write found an overlapping busy interval; nothing was written.
    #[error("Busy interval conflict for stylist {stylist_id} on {date} at {time}")]
    Conflict {
        stylist_id: String,
        date: NaiveDate,
        time: String,
    },
    /// Read or write failure in the backing store.
    #[error("Storage backend error: {0}")]
    Backend(String),
    /// A stored record could not be interpreted (e.g. malformed clock string).
    #[error("Invalid stored record: {0}")]
    InvalidRecord(String),
}

/// Read/write access to appointments and blocked times.
pub trait BookingStore: Send + Sync {
    /// All busy intervals (appointments and blocked times) on `date`,
    /// optionally restricted to one stylist.
    fn list_busy_intervals(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, StoreError>;

    /// Persists an appointment and returns its id.
    ///
    /// Must be all-or-nothing, and must fail with [`StoreError::Conflict`] if
    /// the appointment overlaps a busy interval of the same stylist on the
    /// same date at the moment of writing.
    fn create_appointment(&self, appointment: Appointment) -> BoxFuture<'_, String, StoreError>;

    /// Appointments on `date`, optionally restricted to one stylist, ordered by start time.
    fn list_appointments(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> BoxFuture<'_, Vec<Appointment>, StoreError>;

    /// Persists a blocked time and returns its id.
    fn create_blocked_time(&self, block: BlockedTime) -> BoxFuture<'_, String, StoreError>;

    /// All blocked times of a stylist, ordered by date then start time.
    fn list_blocked_times(&self, stylist_id: &str) -> BoxFuture<'_, Vec<BlockedTime>, StoreError>;
}
