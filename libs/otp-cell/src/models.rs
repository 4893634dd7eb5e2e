use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use shared_models::AppError;

#[derive(Debug, Deserialize)]
pub struct SendOtpRequest {
    pub phone: Option<String>,
}

/// `otp` may arrive as a JSON string or number; it is compared as text.
#[derive(Debug, Deserialize)]
pub struct VerifyOtpRequest {
    pub phone: Option<String>,
    pub otp: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedOtp {
    pub customer_id: String,
    pub verified_at: DateTime<Utc>,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum OtpError {
    #[error("OTP not found")]
    NotFound,

    #[error("OTP expired")]
    Expired,

    #[error("Incorrect OTP")]
    Mismatch,

    #[error("OTP digest error: {0}")]
    Digest(String),
}

impl From<OtpError> for AppError {
    fn from(err: OtpError) -> Self {
        match err {
            OtpError::Digest(_) => AppError::Internal(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Text form of an OTP value; numbers keep their decimal rendering, so `7` and
/// `"007"` stay different codes.
pub fn otp_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
