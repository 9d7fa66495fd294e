//! In-memory implementation of the booking store

use chrono::NaiveDate;
use salon_common::models::{Appointment, BlockedTime, BusyInterval};
use salon_common::{BookingStore, BoxFuture, MinuteRange, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};
use uuid::Uuid;

#[derive(Debug, Default)]
struct Records {
    appointments: Vec<Appointment>,
    blocked_times: Vec<BlockedTime>,
}

impl Records {
    fn busy_ranges(&self, date: NaiveDate, stylist_id: &str) -> Result<Vec<MinuteRange>, StoreError> {
        let appointments = self
            .appointments
            .iter()
            .filter(|a| a.date == date && a.stylist_id == stylist_id)
            .map(|a| a.busy_interval().range());
        let blocks = self
            .blocked_times
            .iter()
            .filter(|b| b.date == date && b.stylist_id == stylist_id)
            .map(BlockedTime::range);

        appointments
            .chain(blocks)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))
    }
}

/// Process-local store. Data is lost on restart.
///
/// The overlap check and the insert of [`BookingStore::create_appointment`]
/// run under one write guard.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for InMemoryBookingStore {
    fn list_busy_intervals(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, StoreError> {
        let stylist_id = stylist_id.map(str::to_string);
        Box::pin(async move {
            let records = self.records.read().await;
            let wanted = |id: &str| stylist_id.as_deref().map_or(true, |s| s == id);

            let mut intervals: Vec<BusyInterval> = records
                .appointments
                .iter()
                .filter(|a| a.date == date && wanted(&a.stylist_id))
                .map(Appointment::busy_interval)
                .collect();
            for block in records
                .blocked_times
                .iter()
                .filter(|b| b.date == date && wanted(&b.stylist_id))
            {
                intervals.push(
                    block
                        .busy_interval()
                        .map_err(|e| StoreError::InvalidRecord(e.to_string()))?,
                );
            }
            Ok(intervals)
        })
    }

    fn create_appointment(&self, appointment: Appointment) -> BoxFuture<'_, String, StoreError> {
        Box::pin(async move {
            let requested = appointment
                .busy_interval()
                .range()
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

            let mut records = self.records.write().await;
            let busy = records.busy_ranges(appointment.date, &appointment.stylist_id)?;
            if busy.iter().any(|range| range.overlaps(&requested)) {
                warn!(
                    "Rejected overlapping appointment for {} on {} at {}",
                    appointment.stylist_id, appointment.date, appointment.time
                );
                return Err(StoreError::Conflict {
                    stylist_id: appointment.stylist_id,
                    date: appointment.date,
                    time: appointment.time,
                });
            }

            let id = appointment
                .id
                .clone()
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            records.appointments.push(Appointment {
                id: Some(id.clone()),
                ..appointment
            });
            debug!("Appointment {} stored in memory", id);
            Ok(id)
        })
    }

    fn list_appointments(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let stylist_id = stylist_id.map(str::to_string);
        Box::pin(async move {
            let records = self.records.read().await;
            let mut appointments: Vec<Appointment> = records
                .appointments
                .iter()
                .filter(|a| a.date == date)
                .filter(|a| stylist_id.as_deref().map_or(true, |s| s == a.stylist_id))
                .cloned()
                .collect();
            // Every stored appointment passed range() on insert
            appointments.sort_by_key(|a| {
                (
                    a.busy_interval().range().map(|r| r.start).unwrap_or_default(),
                    a.stylist_id.clone(),
                )
            });
            Ok(appointments)
        })
    }

    fn create_blocked_time(&self, block: BlockedTime) -> BoxFuture<'_, String, StoreError> {
        Box::pin(async move {
            block
                .range()
                .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
            let id = block.id.clone().unwrap_or_else(|| Uuid::new_v4().to_string());
            let mut records = self.records.write().await;
            records.blocked_times.push(BlockedTime {
                id: Some(id.clone()),
                ..block
            });
            debug!("Blocked time {} stored in memory", id);
            Ok(id)
        })
    }

    fn list_blocked_times(&self, stylist_id: &str) -> BoxFuture<'_, Vec<BlockedTime>, StoreError> {
        let stylist_id = stylist_id.to_string();
        Box::pin(async move {
            let records = self.records.read().await;
            let mut blocks: Vec<BlockedTime> = records
                .blocked_times
                .iter()
                .filter(|b| b.stylist_id == stylist_id)
                .cloned()
                .collect();
            blocks.sort_by_key(|b| (b.date, b.range().map(|r| r.start).unwrap_or_default()));
            Ok(blocks)
        })
    }
}

impl InMemoryBookingStore {
    /// Number of appointments per stylist across all dates.
    pub async fn appointment_counts(&self) -> HashMap<String, usize> {
        let records = self.records.read().await;
        let mut counts = HashMap::new();
        for appointment in &records.appointments {
            *counts.entry(appointment.stylist_id.clone()).or_insert(0) += 1;
        }
        counts
    }
}
