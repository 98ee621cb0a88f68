// libs/scheduling-cell/src/models.rs
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ==============================================================================
// CORE SCHEDULING MODELS
// ==============================================================================

/// A recurring weekly working-hour window for the clinic.
///
/// Times are minutes since midnight; `day_of_week` uses 0 = Sunday through
/// 6 = Saturday. A day may carry more than one window (split morning and
/// afternoon shifts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingWindow {
    pub id: Uuid,
    pub day_of_week: i32,
    pub start_minutes: i32,
    pub end_minutes: i32,
    pub is_active: bool,
}

/// An ad-hoc exception removing availability on a specific calendar date.
///
/// A block with both bounds present blacks out only that time range. A block
/// with either bound missing blacks out the entire day - this mirrors the
/// clinic's existing data, where holidays are stored without times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateBlock {
    pub id: Uuid,
    pub block_date: NaiveDate,
    pub start_minutes: Option<i32>,
    pub end_minutes: Option<i32>,
    pub is_active: bool,
}

impl DateBlock {
    /// True when this block removes the whole day.
    pub fn is_full_day(&self) -> bool {
        self.start_minutes.is_none() || self.end_minutes.is_none()
    }
}

/// An appointment already on the books for some date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedAppointment {
    pub id: Uuid,
    pub appointment_date: NaiveDate,
    pub start_minutes: i32,
    pub service_type: String,
    pub status: AppointmentStatus,
}

impl BookedAppointment {
    /// Whether this appointment still occupies its slot. Cancelled
    /// appointments free their capacity for new bookings.
    pub fn blocks_capacity(&self) -> bool {
        !matches!(self.status, AppointmentStatus::Cancelled)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}
