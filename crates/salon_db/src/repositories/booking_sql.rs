//! SQL implementation of the booking store
//!
//! Dates are stored as `YYYY-MM-DD` text and every interval also as integer
//! `start_minute` / `end_minute` columns so that the overlap test can run
//! inside the database.
//!
//! Appointment inserts for one stylist and day are serialized by the engine:
//! SQLite allows a single writer, and on PostgreSQL the insert transaction
//! first takes a transaction-scoped advisory lock on `stylist_id/date`. Under
//! READ COMMITTED the conditional insert then sees every earlier commit.

use crate::client::{DbBackend, DbClient};
use crate::error::DbError;
use chrono::{DateTime, NaiveDate, Utc};
use salon_common::models::{Appointment, AppointmentStatus, BlockedTime, BusyInterval};
use salon_common::{format_clock_minutes, BookingStore, BoxFuture, MinuteRange, StoreError};
use sqlx::any::AnyRow;
use sqlx::Row;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const CREATE_APPOINTMENTS: &str = r#"
    CREATE TABLE IF NOT EXISTS appointments (
        id TEXT PRIMARY KEY,
        stylist_id TEXT NOT NULL,
        service_id TEXT NOT NULL,
        service_name TEXT NOT NULL,
        appointment_date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        start_minute BIGINT NOT NULL,
        end_minute BIGINT NOT NULL,
        duration_minutes BIGINT NOT NULL,
        customer_name TEXT NOT NULL,
        customer_phone TEXT NOT NULL,
        status TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_APPOINTMENTS_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_appointments_stylist_date
    ON appointments (stylist_id, appointment_date)
"#;

const CREATE_BLOCKED_TIMES: &str = r#"
    CREATE TABLE IF NOT EXISTS blocked_times (
        id TEXT PRIMARY KEY,
        stylist_id TEXT NOT NULL,
        block_date TEXT NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        start_minute BIGINT NOT NULL,
        end_minute BIGINT NOT NULL,
        reason TEXT,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_BLOCKED_TIMES_INDEX: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_blocked_times_stylist_date
    ON blocked_times (stylist_id, block_date)
"#;

// Inserts only if no appointment or block of the same stylist on the same
// date satisfies `start_minute < new_end AND end_minute > new_start`.
const INSERT_APPOINTMENT_IF_FREE: &str = r#"
    INSERT INTO appointments (
        id, stylist_id, service_id, service_name, appointment_date, start_time,
        start_minute, end_minute, duration_minutes, customer_name, customer_phone,
        status, created_at
    )
    SELECT $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13
    WHERE NOT EXISTS (
        SELECT 1 FROM appointments
        WHERE stylist_id = $14 AND appointment_date = $15
          AND start_minute < $16 AND end_minute > $17
    )
    AND NOT EXISTS (
        SELECT 1 FROM blocked_times
        WHERE stylist_id = $18 AND block_date = $19
          AND start_minute < $20 AND end_minute > $21
    )
"#;

// Held until commit or rollback. Cast to text because the Any driver has no
// mapping for `void`.
const LOCK_STYLIST_DAY: &str = "SELECT pg_advisory_xact_lock(hashtext($1))::text AS locked";

const APPOINTMENT_COLUMNS: &str = "id, stylist_id, service_id, service_name, appointment_date, \
     start_time, start_minute, duration_minutes, customer_name, customer_phone, status, created_at";

// The Any driver cannot decode NULL, so a missing reason reads back as ''.
const BLOCKED_TIME_COLUMNS: &str =
    "id, stylist_id, block_date, start_time, end_time, COALESCE(reason, '') AS reason, created_at";

/// SQL implementation of [`BookingStore`]
#[derive(Debug, Clone)]
pub struct SqlBookingStore {
    db_client: DbClient,
}

impl SqlBookingStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    /// Creates the `appointments` and `blocked_times` tables if they don't exist.
    pub async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing booking schema");
        for statement in [
            CREATE_APPOINTMENTS,
            CREATE_APPOINTMENTS_INDEX,
            CREATE_BLOCKED_TIMES,
            CREATE_BLOCKED_TIMES_INDEX,
        ] {
            self.db_client.execute(statement).await?;
        }
        info!("Booking schema initialized successfully");
        Ok(())
    }

    async fn fetch_busy_intervals(
        &self,
        date: NaiveDate,
        stylist_id: Option<String>,
    ) -> Result<Vec<BusyInterval>, StoreError> {
        let date = date.format(DATE_FORMAT).to_string();
        let stylist_filter = if stylist_id.is_some() {
            " AND stylist_id = $2"
        } else {
            ""
        };

        let appointment_sql = format!(
            "SELECT stylist_id, start_minute, end_minute FROM appointments \
             WHERE appointment_date = $1{stylist_filter}"
        );
        let block_sql = format!(
            "SELECT stylist_id, start_minute, end_minute FROM blocked_times \
             WHERE block_date = $1{stylist_filter}"
        );

        let mut intervals = Vec::new();
        for sql in [&appointment_sql, &block_sql] {
            let mut query = sqlx::query(sql).bind(date.clone());
            if let Some(stylist_id) = &stylist_id {
                query = query.bind(stylist_id.clone());
            }
            let rows = query
                .fetch_all(self.db_client.pool())
                .await
                .map_err(|e| {
                    error!("Failed to load busy intervals: {}", e);
                    DbError::QueryError(e.to_string())
                })?;
            for row in rows {
                intervals.push(busy_interval_from_row(&row)?);
            }
        }
        Ok(intervals)
    }

    async fn insert_appointment(&self, appointment: Appointment) -> Result<String, StoreError> {
        let range = MinuteRange::from_clock(&appointment.time, appointment.duration_minutes)
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        let id = appointment
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let date = appointment.date.format(DATE_FORMAT).to_string();
        let start = i64::from(range.start);
        let end = i64::from(range.end);

        let mut tx = self.db_client.begin().await?;
        if self.db_client.backend() == DbBackend::Postgres {
            sqlx::query(LOCK_STYLIST_DAY)
                .bind(format!("{}/{}", appointment.stylist_id, date))
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to lock {} on {}: {}", appointment.stylist_id, date, e);
                    DbError::TransactionError(e.to_string())
                })?;
        }
        let result = sqlx::query(INSERT_APPOINTMENT_IF_FREE)
            .bind(id.clone())
            .bind(appointment.stylist_id.clone())
            .bind(appointment.service_id.clone())
            .bind(appointment.service_name.clone())
            .bind(date.clone())
            .bind(appointment.time.clone())
            .bind(start)
            .bind(end)
            .bind(i64::from(appointment.duration_minutes))
            .bind(appointment.customer_name.clone())
            .bind(appointment.customer_phone.clone())
            .bind(appointment.status.as_str().to_string())
            .bind(appointment.created_at.to_rfc3339())
            .bind(appointment.stylist_id.clone())
            .bind(date.clone())
            .bind(end)
            .bind(start)
            .bind(appointment.stylist_id.clone())
            .bind(date)
            .bind(end)
            .bind(start)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                error!("Failed to insert appointment: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| DbError::TransactionError(e.to_string()))?;
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

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionError(e.to_string()))?;
        info!("Appointment {} stored", id);
        Ok(id)
    }

    async fn fetch_appointments(
        &self,
        date: NaiveDate,
        stylist_id: Option<String>,
    ) -> Result<Vec<Appointment>, StoreError> {
        let stylist_filter = if stylist_id.is_some() {
            " AND stylist_id = $2"
        } else {
            ""
        };
        let sql = format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments \
             WHERE appointment_date = $1{stylist_filter} ORDER BY start_minute, stylist_id"
        );

        let mut query = sqlx::query(&sql).bind(date.format(DATE_FORMAT).to_string());
        if let Some(stylist_id) = stylist_id {
            query = query.bind(stylist_id);
        }
        let rows = query
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to load appointments: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(appointment_from_row).collect()
    }

    async fn insert_blocked_time(&self, block: BlockedTime) -> Result<String, StoreError> {
        let range = block
            .range()
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;
        let id = block
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let query = r#"
            INSERT INTO blocked_times (
                id, stylist_id, block_date, start_time, end_time,
                start_minute, end_minute, reason, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#;
        sqlx::query(query)
            .bind(id.clone())
            .bind(block.stylist_id.clone())
            .bind(block.date.format(DATE_FORMAT).to_string())
            .bind(block.start_time.clone())
            .bind(block.end_time.clone())
            .bind(i64::from(range.start))
            .bind(i64::from(range.end))
            .bind(block.reason.clone().unwrap_or_default())
            .bind(block.created_at.to_rfc3339())
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert blocked time: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        info!("Blocked time {} stored for {}", id, block.stylist_id);
        Ok(id)
    }

    async fn fetch_blocked_times(&self, stylist_id: String) -> Result<Vec<BlockedTime>, StoreError> {
        let sql = format!(
            "SELECT {BLOCKED_TIME_COLUMNS} FROM blocked_times \
             WHERE stylist_id = $1 ORDER BY block_date, start_minute"
        );
        let rows = sqlx::query(&sql)
            .bind(stylist_id)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to load blocked times: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(blocked_time_from_row).collect()
    }
}

fn column<T>(row: &AnyRow, name: &str) -> Result<T, StoreError>
where
    T: for<'r> sqlx::Decode<'r, sqlx::Any> + sqlx::Type<sqlx::Any>,
{
    row.try_get(name)
        .map_err(|e| StoreError::InvalidRecord(format!("column {name}: {e}")))
}

fn minute_column(row: &AnyRow, name: &str) -> Result<u32, StoreError> {
    let value: i64 = column(row, name)?;
    u32::try_from(value)
        .map_err(|_| StoreError::InvalidRecord(format!("column {name} out of range: {value}")))
}

fn date_column(row: &AnyRow, name: &str) -> Result<NaiveDate, StoreError> {
    let value: String = column(row, name)?;
    NaiveDate::parse_from_str(&value, DATE_FORMAT)
        .map_err(|e| StoreError::InvalidRecord(format!("column {name}: {e}")))
}

fn timestamp_column(row: &AnyRow, name: &str) -> Result<DateTime<Utc>, StoreError> {
    let value: String = column(row, name)?;
    DateTime::parse_from_rfc3339(&value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::InvalidRecord(format!("column {name}: {e}")))
}

fn busy_interval_from_row(row: &AnyRow) -> Result<BusyInterval, StoreError> {
    let start = minute_column(row, "start_minute")?;
    let end = minute_column(row, "end_minute")?;
    Ok(BusyInterval {
        stylist_id: column(row, "stylist_id")?,
        time: format_clock_minutes(start),
        duration_minutes: end.saturating_sub(start),
    })
}

fn appointment_from_row(row: &AnyRow) -> Result<Appointment, StoreError> {
    let status: String = column(row, "status")?;
    Ok(Appointment {
        id: Some(column(row, "id")?),
        stylist_id: column(row, "stylist_id")?,
        service_id: column(row, "service_id")?,
        service_name: column(row, "service_name")?,
        date: date_column(row, "appointment_date")?,
        time: column(row, "start_time")?,
        duration_minutes: minute_column(row, "duration_minutes")?,
        customer_name: column(row, "customer_name")?,
        customer_phone: column(row, "customer_phone")?,
        status: status.parse::<AppointmentStatus>().map_err(StoreError::InvalidRecord)?,
        created_at: timestamp_column(row, "created_at")?,
    })
}

fn blocked_time_from_row(row: &AnyRow) -> Result<BlockedTime, StoreError> {
    let reason: String = column(row, "reason")?;
    Ok(BlockedTime {
        id: Some(column(row, "id")?),
        stylist_id: column(row, "stylist_id")?,
        date: date_column(row, "block_date")?,
        start_time: column(row, "start_time")?,
        end_time: column(row, "end_time")?,
        reason: Some(reason).filter(|r| !r.is_empty()),
        created_at: timestamp_column(row, "created_at")?,
    })
}

impl BookingStore for SqlBookingStore {
    fn list_busy_intervals(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> BoxFuture<'_, Vec<BusyInterval>, StoreError> {
        let stylist_id = stylist_id.map(str::to_string);
        Box::pin(async move { self.fetch_busy_intervals(date, stylist_id).await })
    }

    fn create_appointment(&self, appointment: Appointment) -> BoxFuture<'_, String, StoreError> {
        Box::pin(async move { self.insert_appointment(appointment).await })
    }

    fn list_appointments(
        &self,
        date: NaiveDate,
        stylist_id: Option<&str>,
    ) -> BoxFuture<'_, Vec<Appointment>, StoreError> {
        let stylist_id = stylist_id.map(str::to_string);
        Box::pin(async move { self.fetch_appointments(date, stylist_id).await })
    }

    fn create_blocked_time(&self, block: BlockedTime) -> BoxFuture<'_, String, StoreError> {
        Box::pin(async move { self.insert_blocked_time(block).await })
    }

    fn list_blocked_times(&self, stylist_id: &str) -> BoxFuture<'_, Vec<BlockedTime>, StoreError> {
        let stylist_id = stylist_id.to_string();
        Box::pin(async move { self.fetch_blocked_times(stylist_id).await })
    }
}
