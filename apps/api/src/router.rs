use std::sync::Arc;

use axum::{routing::get, Router};

use scheduling_cell::router::schedule_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Vet Clinic API is running!" }))
        .nest("/schedule", schedule_routes(state.clone()))
}
