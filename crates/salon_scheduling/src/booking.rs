//! Booking service: the async layer between the HTTP handlers, the pure
//! scheduling core and the [`BookingStore`].
//!
//! A booking runs read-validate-write. The availability of the target stylist
//! is re-read and re-checked inside a stylist-scoped lock right before the
//! write, and the store's conditional insert rejects anything that still slips
//! through (another process writing to the same database, for example).

use crate::availability::{
    assign_stylist, filter_slots_any, filter_slots_for_stylist, BusySchedule,
};
use crate::catalog::{ServiceOffering, Stylist};
use crate::error::SchedulingError;
use crate::hours::DayHours;
use crate::presentation::AvailabilityStatus;
use crate::salon::Salon;
use crate::slots::generate_slots;
use chrono::{NaiveDate, Timelike, Utc};
use salon_common::clock::{canonicalize_clock, MINUTES_PER_DAY};
use salon_common::models::{Appointment, AppointmentStatus, BlockedTime};
use salon_common::{parse_clock_minutes, BookingStore, MinuteRange};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, error, info, warn};

/// A customer's booking submission.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub service_id: String,
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "2030-01-08"))]
    pub date: NaiveDate,
    /// 12-hour clock string, e.g. "10:30 AM"
    pub time: String,
    /// `None` lets the salon pick the first free stylist.
    #[serde(default)]
    pub stylist_id: Option<String>,
    pub customer_name: String,
    /// Any formatting; must contain exactly ten digits.
    pub customer_phone: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockTimeRequest {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date, example = "2030-01-08"))]
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableTimes {
    #[cfg_attr(feature = "openapi", schema(value_type = String, format = Date))]
    pub date: NaiveDate,
    pub service_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stylist_id: Option<String>,
    /// Chronological start times.
    pub times: Vec<String>,
    pub status: AvailabilityStatus,
}

/// Progress of one booking attempt. `Confirmed` and `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStage {
    Draft,
    SlotsComputed,
    TimeChosen,
    StylistResolving,
    Validating,
    Confirmed,
    Rejected(&'static str),
}

impl fmt::Display for BookingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookingStage::Draft => write!(f, "draft"),
            BookingStage::SlotsComputed => write!(f, "slots_computed"),
            BookingStage::TimeChosen => write!(f, "time_chosen"),
            BookingStage::StylistResolving => write!(f, "stylist_resolving"),
            BookingStage::Validating => write!(f, "validating"),
            BookingStage::Confirmed => write!(f, "confirmed"),
            BookingStage::Rejected(reason) => write!(f, "rejected({reason})"),
        }
    }
}

impl BookingStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStage::Confirmed | BookingStage::Rejected(_))
    }
}

struct BookingAttempt {
    label: String,
    stage: BookingStage,
}

impl BookingAttempt {
    fn new(request: &BookingRequest) -> Self {
        let label = format!("{} {} {}", request.service_id, request.date, request.time);
        debug!("Booking [{}]: {}", label, BookingStage::Draft);
        Self {
            label,
            stage: BookingStage::Draft,
        }
    }

    fn advance(&mut self, next: BookingStage) {
        debug!("Booking [{}]: {} -> {}", self.label, self.stage, next);
        self.stage = next;
    }
}

/// Strips formatting and requires exactly ten digits.
pub fn normalize_phone(raw: &str) -> Result<String, SchedulingError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.len() != 10 {
        return Err(SchedulingError::InvalidRequest(
            "phone number must have 10 digits".to_string(),
        ));
    }
    Ok(digits)
}

/// One async mutex per stylist, created on first use.
#[derive(Debug, Default)]
pub struct StylistLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl StylistLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, stylist_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            locks.entry(stylist_id.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[derive(Clone)]
pub struct SchedulingService {
    salon: Arc<Salon>,
    store: Arc<dyn BookingStore>,
    locks: Arc<StylistLocks>,
}

impl SchedulingService {
    pub fn new(salon: Arc<Salon>, store: Arc<dyn BookingStore>) -> Self {
        Self {
            salon,
            store,
            locks: Arc::new(StylistLocks::new()),
        }
    }

    pub fn salon(&self) -> &Salon {
        &self.salon
    }

    fn service(&self, service_id: &str) -> Result<&ServiceOffering, SchedulingError> {
        self.salon
            .catalog()
            .get(service_id)
            .ok_or_else(|| SchedulingError::UnknownService(service_id.to_string()))
    }

    fn stylist(&self, stylist_id: &str) -> Result<&Stylist, SchedulingError> {
        self.salon
            .roster()
            .get(stylist_id)
            .ok_or_else(|| SchedulingError::UnknownStylist(stylist_id.to_string()))
    }

    async fn busy_schedule(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> Result<BusySchedule, SchedulingError> {
        let intervals = self
            .store
            .list_busy_intervals(date, stylist_id)
            .await
            .inspect_err(|e| error!("Failed to read busy intervals for {}: {}", date, e))?;
        debug!("Loaded {} busy intervals for {}", intervals.len(), date);
        BusySchedule::from_intervals(&intervals)
    }

    /// Start times on `date` at which the service can be booked, with any
    /// stylist or with `stylist_id` only.
    pub async fn available_times(
        &self,
        date: NaiveDate,
        service_id: &str,
        stylist_id: Option<&str>,
    ) -> Result<AvailableTimes, SchedulingError> {
        let duration = self.service(service_id)?.duration_minutes;
        if let Some(id) = stylist_id {
            self.stylist(id)?;
        }

        let mut result = AvailableTimes {
            date,
            service_id: service_id.to_string(),
            stylist_id: stylist_id.map(str::to_string),
            times: Vec::new(),
            status: AvailabilityStatus::closed(),
        };
        let DayHours::Open { start, end } = self.salon.hours().for_date(date) else {
            debug!("Salon closed on {}", date);
            return Ok(result);
        };

        let slots = generate_slots(self.salon.hours(), date, duration);
        let schedule = self.busy_schedule(date, stylist_id).await?;
        result.times = match stylist_id {
            Some(id) => filter_slots_for_stylist(&slots, duration, id, &schedule)?,
            None => filter_slots_any(&slots, duration, self.salon.roster(), &schedule)?,
        };
        result.status = AvailabilityStatus::open(start, end, slots.len(), result.times.len());
        Ok(result)
    }

    async fn first_free_stylist(
        &self,
        date: NaiveDate,
        time: &str,
        requested: &MinuteRange,
    ) -> Result<Stylist, SchedulingError> {
        let schedule = self.busy_schedule(date, None).await?;
        assign_stylist(self.salon.roster(), &schedule, requested)
            .cloned()
            .ok_or_else(|| SchedulingError::NoStylistAvailable {
                date,
                time: time.to_string(),
            })
    }

    /// First stylist in roster order who is free at `time` for `duration_minutes`.
    pub async fn assign_stylist(
        &self,
        date: NaiveDate,
        time: &str,
        duration_minutes: u32,
    ) -> Result<Stylist, SchedulingError> {
        if duration_minutes == 0 || duration_minutes > MINUTES_PER_DAY {
            return Err(SchedulingError::InvalidRequest(format!(
                "duration must be between 1 and {MINUTES_PER_DAY} minutes, got {duration_minutes}"
            )));
        }
        let requested = MinuteRange::from_clock(time, duration_minutes)
            .map_err(|e| SchedulingError::InvalidRequest(e.to_string()))?;
        self.first_free_stylist(date, time, &requested).await
    }

    /// Validates, assigns a stylist if none was chosen, re-checks and persists.
    pub async fn book(&self, request: BookingRequest) -> Result<Appointment, SchedulingError> {
        let mut attempt = BookingAttempt::new(&request);
        match self.run_booking(&mut attempt, request).await {
            Ok(appointment) => {
                attempt.advance(BookingStage::Confirmed);
                info!(
                    "Booked {} with {} on {} at {} (id {})",
                    appointment.service_name,
                    appointment.stylist_id,
                    appointment.date,
                    appointment.time,
                    appointment.id.as_deref().unwrap_or_default()
                );
                Ok(appointment)
            }
            Err(SchedulingError::Storage(e)) => {
                error!("Booking [{}] failed in storage: {}", attempt.label, e);
                Err(SchedulingError::Storage(e))
            }
            Err(e) => {
                attempt.advance(BookingStage::Rejected(e.reason()));
                warn!("Booking [{}] rejected: {}", attempt.label, e);
                Err(e)
            }
        }
    }

    async fn run_booking(
        &self,
        attempt: &mut BookingAttempt,
        request: BookingRequest,
    ) -> Result<Appointment, SchedulingError> {
        let service = self.service(&request.service_id)?.clone();
        let explicit = match request
            .stylist_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        {
            Some(id) => Some(self.stylist(id)?.clone()),
            None => None,
        };
        let customer_name = request.customer_name.trim().to_string();
        if customer_name.is_empty() {
            return Err(SchedulingError::InvalidRequest(
                "customer name is required".to_string(),
            ));
        }
        let customer_phone = normalize_phone(&request.customer_phone)?;
        let date = request.date;

        let slots = generate_slots(self.salon.hours(), date, service.duration_minutes);
        attempt.advance(BookingStage::SlotsComputed);

        let time = canonicalize_clock(&request.time).map_err(|_| {
            SchedulingError::InvalidRequest(format!("{:?} is not a valid time", request.time))
        })?;
        if !slots.contains(&time) {
            return Err(SchedulingError::OutsideBusinessHours { date, time });
        }
        let requested = MinuteRange::from_clock(&time, service.duration_minutes)?;
        self.ensure_not_past(date, requested.start)?;
        attempt.advance(BookingStage::TimeChosen);

        attempt.advance(BookingStage::StylistResolving);
        let stylist = match explicit {
            Some(stylist) => stylist,
            None => self.first_free_stylist(date, &time, &requested).await?,
        };
        debug!("Booking [{}]: stylist {}", attempt.label, stylist.id);

        attempt.advance(BookingStage::Validating);
        let _guard = self.locks.acquire(&stylist.id).await;
        let schedule = self.busy_schedule(date, Some(&stylist.id)).await?;
        if !schedule.is_free(&stylist.id, &requested) {
            return Err(SchedulingError::SlotNoLongerAvailable {
                stylist_id: stylist.id,
                date,
                time,
            });
        }

        let mut appointment = Appointment {
            id: None,
            stylist_id: stylist.id,
            service_id: service.id,
            service_name: service.name,
            date,
            time,
            duration_minutes: service.duration_minutes,
            customer_name,
            customer_phone,
            status: AppointmentStatus::Scheduled,
            created_at: Utc::now(),
        };
        let id = self.store.create_appointment(appointment.clone()).await?;
        appointment.id = Some(id);
        Ok(appointment)
    }

    fn ensure_not_past(&self, date: NaiveDate, start_minute: u32) -> Result<(), SchedulingError> {
        let now = Utc::now().with_timezone(&self.salon.time_zone());
        let today = now.date_naive();
        let passed =
            date < today || (date == today && start_minute <= now.hour() * 60 + now.minute());
        if passed {
            return Err(SchedulingError::InvalidRequest(format!(
                "{} at {} has already passed",
                date,
                salon_common::format_clock_minutes(start_minute)
            )));
        }
        Ok(())
    }

    /// Marks a stylist unavailable on `request.date` between the two times.
    pub async fn block_time(
        &self,
        stylist_id: &str,
        request: BlockTimeRequest,
    ) -> Result<BlockedTime, SchedulingError> {
        let stylist = self.stylist(stylist_id)?;
        let clock = |value: &str| {
            canonicalize_clock(value).map_err(|_| {
                SchedulingError::InvalidRequest(format!("{value:?} is not a valid time"))
            })
        };
        let start_time = clock(&request.start_time)?;
        let end_time = clock(&request.end_time)?;
        if parse_clock_minutes(&start_time)? >= parse_clock_minutes(&end_time)? {
            return Err(SchedulingError::InvalidRequest(
                "blocked time must end after it starts".to_string(),
            ));
        }

        let mut block = BlockedTime {
            id: None,
            stylist_id: stylist.id.clone(),
            date: request.date,
            start_time,
            end_time,
            reason: request
                .reason
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty()),
            created_at: Utc::now(),
        };
        let id = self
            .store
            .create_blocked_time(block.clone())
            .await
            .inspect_err(|e| error!("Failed to store blocked time: {}", e))?;
        info!(
            "Blocked {} on {} from {} to {}",
            block.stylist_id, block.date, block.start_time, block.end_time
        );
        block.id = Some(id);
        Ok(block)
    }

    pub async fn blocked_times(
        &self,
        stylist_id: &str,
    ) -> Result<Vec<BlockedTime>, SchedulingError> {
        self.stylist(stylist_id)?;
        Ok(self.store.list_blocked_times(stylist_id).await?)
    }

    /// Appointments on `date`, optionally for one stylist, by start time.
    pub async fn appointments(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        if let Some(id) = stylist_id {
            self.stylist(id)?;
        }
        Ok(self.store.list_appointments(date, stylist_id).await?)
    }
}
