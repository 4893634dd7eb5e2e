use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_models::{is_success_flag, upstream_message, AppError, JsonBody};
use shared_utils::decode::text_id;

use crate::models::{otp_text, SendOtpRequest, VerifyOtpRequest};
use crate::router::OtpState;

/// Looks for `key` at the top level of a Bull36 reply, then under `data`.
fn reply_field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get(key)
        .filter(|v| !v.is_null())
        .or_else(|| body.get("data").and_then(|d| d.get(key)))
}

/// The code itself is kept server-side and never echoed to the browser.
#[axum::debug_handler]
pub async fn send_otp(
    State(state): State<OtpState>,
    JsonBody(request): JsonBody<SendOtpRequest>,
) -> Result<Json<Value>, AppError> {
    let phone = request
        .phone
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Phone number is required".to_string()))?;

    let user = state.app.active_user().await?;
    debug!("Requesting OTP for {} as '{}'", phone, user.key);

    let body = state
        .app
        .bull36
        .send_otp(&user, &phone)
        .await
        .map_err(|e| AppError::external("Failed to send OTP", e))?;

    if !is_success_flag(&body) {
        warn!("Bull36 refused to send OTP to {}", phone);
        return Err(AppError::BadRequest(upstream_message(&body, "Failed to send OTP")));
    }

    let code = reply_field(&body, "otp").and_then(otp_text).ok_or_else(|| {
        AppError::external("Failed to send OTP", "Bull36 reply did not include an OTP")
    })?;

    let customer_id = reply_field(&body, "cust_id")
        .or_else(|| reply_field(&body, "customer_id"))
        .and_then(text_id);

    state.store.issue(&phone, &code, customer_id.clone()).await;

    Ok(Json(json!({
        "success": true,
        "message": upstream_message(&body, "OTP sent successfully"),
        "customerId": customer_id,
        "expiresIn": state.app.config.otp_ttl_secs
    })))
}

#[axum::debug_handler]
pub async fn verify_otp(
    State(state): State<OtpState>,
    JsonBody(request): JsonBody<VerifyOtpRequest>,
) -> Result<Json<Value>, AppError> {
    let phone = request.phone.filter(|p| !p.trim().is_empty());
    let code = request.otp.as_ref().and_then(otp_text);

    let (phone, code) = phone
        .zip(code)
        .ok_or_else(|| AppError::BadRequest("Phone number and OTP are required".to_string()))?;

    let verified = state.store.verify(&phone, &code).await?;

    Ok(Json(json!({
        "success": true,
        "message": "OTP verified successfully",
        "customerId": verified.customer_id,
        "verifiedAt": verified.verified_at.to_rfc3339()
    })))
}
