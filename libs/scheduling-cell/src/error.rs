use thiserror::Error;

use shared_models::AppError;

/// Errors surfaced by the scheduling cell.
///
/// A store failure is deliberately distinct from an empty result: "no slots
/// today" is a legitimate answer, a failed read is not, and the two must not
/// look the same to callers.
#[derive(Error, Debug)]
pub enum SchedulingError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Schedule store error: {0}")]
    Store(String),
}

impl From<SchedulingError> for AppError {
    fn from(err: SchedulingError) -> Self {
        match err {
            SchedulingError::InvalidDate(msg) => AppError::BadRequest(msg),
            SchedulingError::InvalidTime(msg) => AppError::BadRequest(msg),
            SchedulingError::Store(msg) => AppError::ExternalService(msg),
        }
    }
}
