//! Collaborator seam for the availability engine.
//!
//! The engine only ever reads: weekly working windows, per-date blocks, and
//! per-date appointments. Everything that writes those tables (clinic
//! configuration, booking, cancellation) lives elsewhere; this trait is the
//! entire surface the engine depends on.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Method;
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::SchedulingError;
use crate::models::{AppointmentStatus, BookedAppointment, DateBlock, WorkingWindow};
use crate::time::clock_to_minutes;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScheduleStore: Send + Sync {
    /// Active recurring windows for a day of week (0 = Sunday .. 6 = Saturday).
    async fn list_active_working_windows(
        &self,
        day_of_week: i32,
    ) -> Result<Vec<WorkingWindow>, SchedulingError>;

    /// Active blocks for a calendar date, full-day and partial alike.
    async fn list_active_date_blocks(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DateBlock>, SchedulingError>;

    /// Every appointment on the books for a date, regardless of status.
    /// Status filtering is the engine's decision, not the store's.
    async fn list_appointments(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<BookedAppointment>, SchedulingError>;
}

// ==============================================================================
// POSTGREST-BACKED STORE
// ==============================================================================

#[derive(Debug, Deserialize)]
struct WorkingWindowRow {
    id: Uuid,
    day_of_week: i32,
    start_time: String,
    end_time: String,
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct DateBlockRow {
    id: Uuid,
    block_date: NaiveDate,
    start_time: Option<String>,
    end_time: Option<String>,
    is_active: bool,
}

#[derive(Debug, Deserialize)]
struct AppointmentRow {
    id: Uuid,
    appointment_date: NaiveDate,
    start_time: String,
    service_type: String,
    status: AppointmentStatus,
}

pub struct SupabaseScheduleStore {
    supabase: SupabaseClient,
}

impl SupabaseScheduleStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Parse a row's clock string, wrapping parse failures as store errors.
    /// Bad row data is a backend problem and must surface as one, never as a
    /// caller mistake or as silently missing availability.
    fn row_minutes(table: &str, id: Uuid, clock: &str) -> Result<i32, SchedulingError> {
        clock_to_minutes(clock)
            .map_err(|e| SchedulingError::Store(format!("{} row {}: {}", table, id, e)))
    }
}

#[async_trait]
impl ScheduleStore for SupabaseScheduleStore {
    async fn list_active_working_windows(
        &self,
        day_of_week: i32,
    ) -> Result<Vec<WorkingWindow>, SchedulingError> {
        let path = format!(
            "/rest/v1/working_hours?day_of_week=eq.{}&is_active=eq.true&order=start_time.asc",
            day_of_week
        );

        let rows: Vec<WorkingWindowRow> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?;

        debug!("Fetched {} working windows for day {}", rows.len(), day_of_week);

        rows.into_iter()
            .map(|row| {
                Ok(WorkingWindow {
                    start_minutes: Self::row_minutes("working_hours", row.id, &row.start_time)?,
                    end_minutes: Self::row_minutes("working_hours", row.id, &row.end_time)?,
                    id: row.id,
                    day_of_week: row.day_of_week,
                    is_active: row.is_active,
                })
            })
            .collect()
    }

    async fn list_active_date_blocks(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<DateBlock>, SchedulingError> {
        let path = format!(
            "/rest/v1/schedule_blocks?block_date=eq.{}&is_active=eq.true",
            date
        );

        let rows: Vec<DateBlockRow> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?;

        debug!("Fetched {} schedule blocks for {}", rows.len(), date);

        rows.into_iter()
            .map(|row| {
                let start_minutes = row
                    .start_time
                    .as_deref()
                    .map(|t| Self::row_minutes("schedule_blocks", row.id, t))
                    .transpose()?;
                let end_minutes = row
                    .end_time
                    .as_deref()
                    .map(|t| Self::row_minutes("schedule_blocks", row.id, t))
                    .transpose()?;

                Ok(DateBlock {
                    id: row.id,
                    block_date: row.block_date,
                    start_minutes,
                    end_minutes,
                    is_active: row.is_active,
                })
            })
            .collect()
    }

    async fn list_appointments(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<BookedAppointment>, SchedulingError> {
        let path = format!(
            "/rest/v1/appointments?appointment_date=eq.{}&order=start_time.asc",
            date
        );

        let rows: Vec<AppointmentRow> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| SchedulingError::Store(e.to_string()))?;

        debug!("Fetched {} appointments for {}", rows.len(), date);

        rows.into_iter()
            .map(|row| {
                Ok(BookedAppointment {
                    start_minutes: Self::row_minutes("appointments", row.id, &row.start_time)?,
                    id: row.id,
                    appointment_date: row.appointment_date,
                    service_type: row.service_type,
                    status: row.status,
                })
            })
            .collect()
    }
}
