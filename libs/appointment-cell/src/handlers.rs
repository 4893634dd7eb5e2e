use axum::{
    extract::{Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, warn};

use shared_models::{is_success_flag, upstream_message, AppError, JsonBody};
use shared_upstream::AppState;

use crate::models::{AvailabilityQuery, CreateAppointmentRequest};

/// Upstream slot list, unchanged, once `data_time`/`template_id` defaults are filled in.
#[axum::debug_handler]
pub async fn get_available_time(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;

    let body = state
        .bull36
        .get_available_time(&user, &query.to_params())
        .await
        .map_err(|e| AppError::external("Failed to fetch available time", e))?;

    if !is_success_flag(&body) {
        warn!("Bull36 rejected availability lookup for '{}'", user.key);
        return Err(AppError::BadRequest(upstream_message(
            &body,
            "Failed to fetch available time",
        )));
    }

    Ok(Json(body))
}

#[axum::debug_handler]
pub async fn create_appointment(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let params = request.to_params().map_err(|missing| {
        AppError::BadRequest(format!("Missing required fields: {}", missing.join(", ")))
    })?;

    let user = state.active_user().await?;

    let body = state
        .bull36
        .create_appointment(&user, &params)
        .await
        .map_err(|e| AppError::external("Failed to create appointment", e))?;

    if !is_success_flag(&body) {
        warn!("Bull36 rejected appointment for '{}'", user.key);
        return Err(AppError::BadRequest(upstream_message(
            &body,
            "Failed to create appointment",
        )));
    }

    info!("Appointment created via '{}'", user.key);

    Ok(Json(json!({
        "success": true,
        "message": upstream_message(&body, "Appointment created successfully"),
        "data": body.get("data").cloned().unwrap_or(Value::Null)
    })))
}
