use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_models::AppError;
use shared_upstream::AppState;

use crate::models::TemplateError;
use crate::services::TemplateService;

fn template_error(err: TemplateError, context: &str) -> AppError {
    match err {
        TemplateError::Upstream(e) => AppError::external(context, e),
        TemplateError::Rejected(message) => AppError::external(context, message),
        not_found @ (TemplateError::DoctorNotFound | TemplateError::TreatmentNotFound) => {
            AppError::NotFound(not_found.to_string())
        }
    }
}

// ==============================================================================
// DOCTORS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_doctors(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;
    let doctors = TemplateService::new(&state)
        .doctors(&user)
        .await
        .map_err(|e| template_error(e, "Failed to fetch doctors"))?;

    Ok(Json(json!({
        "success": true,
        "total": doctors.len(),
        "data": doctors
    })))
}

#[axum::debug_handler]
pub async fn get_doctor(
    State(state): State<AppState>,
    Path(doctor_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;
    let doctor = TemplateService::new(&state)
        .doctor(&user, &doctor_id)
        .await
        .map_err(|e| template_error(e, "Failed to fetch doctor"))?;

    Ok(Json(json!({
        "success": true,
        "data": doctor
    })))
}

// ==============================================================================
// TREATMENTS
// ==============================================================================

#[axum::debug_handler]
pub async fn list_treatments(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;
    let treatments = TemplateService::new(&state)
        .treatments(&user)
        .await
        .map_err(|e| template_error(e, "Failed to fetch treatments"))?;

    Ok(Json(json!({
        "success": true,
        "total": treatments.len(),
        "data": treatments
    })))
}

#[axum::debug_handler]
pub async fn get_treatment(
    State(state): State<AppState>,
    Path(treatment_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;
    let treatment = TemplateService::new(&state)
        .treatment(&user, &treatment_id)
        .await
        .map_err(|e| template_error(e, "Failed to fetch treatment"))?;

    Ok(Json(json!({
        "success": true,
        "data": treatment
    })))
}

// ==============================================================================
// CLINICS & RAW TEMPLATE
// ==============================================================================

#[axum::debug_handler]
pub async fn list_clinics(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;
    let clinics = TemplateService::new(&state)
        .clinics(&user)
        .await
        .map_err(|e| template_error(e, "Failed to fetch clinics"))?;

    Ok(Json(json!({
        "success": true,
        "total": clinics.len(),
        "data": clinics
    })))
}

/// Upstream reply as-is, whatever its `success` flag says.
#[axum::debug_handler]
pub async fn get_template(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let user = state.active_user().await?;
    let body = TemplateService::new(&state)
        .fetch_raw(&user)
        .await
        .map_err(|e| AppError::external("Failed to fetch template", e))?;

    Ok(Json(body))
}
