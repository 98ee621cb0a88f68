// libs/scheduling-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::AppError;

use crate::catalog::SERVICE_CATALOG;
use crate::services::AvailabilityService;
use crate::store::SupabaseScheduleStore;

// ==============================================================================
// QUERY PARAMETER STRUCTS
// ==============================================================================

/// Query parameters for the public availability endpoint. Wire names are
/// camelCase because the booking page already sends them that way.
#[derive(Debug, Deserialize)]
pub struct AvailabilityQueryParams {
    #[serde(rename = "serviceType")]
    pub service_type: Option<String>,
    #[serde(rename = "editingAppointment")]
    pub editing_appointment: Option<String>,
}

// ==============================================================================
// PUBLIC SCHEDULER HANDLERS
// ==============================================================================

/// Bookable slots for a date, as a JSON array of "HH:MM" strings.
///
/// An empty array is a real answer ("fully booked / closed"); store failures
/// surface as 502 so the booking page can tell the two apart.
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<Arc<AppConfig>>,
    Path(date): Path<String>,
    Query(params): Query<AvailabilityQueryParams>,
) -> Result<Json<Vec<String>>, AppError> {
    let date = parse_date(&date)?;
    let editing_appointment = parse_editing_appointment(params.editing_appointment.as_deref())?;

    // The booking page sends serviceType= (empty) when nothing is selected.
    let service_type = params
        .service_type
        .as_deref()
        .filter(|s| !s.is_empty());

    let service = AvailabilityService::new(SupabaseScheduleStore::new(&state));
    let slots = service
        .available_slots(date, service_type, editing_appointment)
        .await?;

    Ok(Json(slots))
}

/// Whether a date has no bookable capacity at all (full-day block, or no
/// working hours configured for that day of week).
#[axum::debug_handler]
pub async fn is_date_blocked(
    State(state): State<Arc<AppConfig>>,
    Path(date): Path<String>,
) -> Result<Json<Value>, AppError> {
    let date = parse_date(&date)?;

    let service = AvailabilityService::new(SupabaseScheduleStore::new(&state));
    let is_blocked = service.is_date_fully_blocked(date).await?;

    Ok(Json(json!({ "isBlocked": is_blocked })))
}

/// The static service catalog, for the booking page's service picker.
#[axum::debug_handler]
pub async fn list_service_types() -> Json<Value> {
    Json(json!({ "services": SERVICE_CATALOG }))
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("Invalid date '{}', expected YYYY-MM-DD", raw)))
}

fn parse_editing_appointment(raw: Option<&str>) -> Result<Option<Uuid>, AppError> {
    match raw {
        None | Some("") => Ok(None),
        Some(id) => Uuid::parse_str(id)
            .map(Some)
            .map_err(|_| AppError::BadRequest(format!("Invalid appointment id '{}'", id))),
    }
}
