// libs/scheduling-cell/src/router.rs
use std::sync::Arc;

use axum::{routing::get, Router};

use shared_config::AppConfig;

use crate::handlers;

/// Public scheduler routes. These back the clinic's booking page and require
/// no authentication - they only read availability, never mutate it.
pub fn schedule_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/availability/{date}", get(handlers::get_availability))
        .route("/is-blocked/{date}", get(handlers::is_date_blocked))
        .route("/services", get(handlers::list_service_types))
        .with_state(state)
}
