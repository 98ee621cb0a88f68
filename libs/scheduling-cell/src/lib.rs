pub mod catalog;
pub mod error;
pub mod handlers;
pub mod models;
pub mod router;
pub mod services;
pub mod store;
pub mod time;

pub use error::SchedulingError;
pub use models::*;
pub use services::AvailabilityService;
pub use store::{ScheduleStore, SupabaseScheduleStore};
