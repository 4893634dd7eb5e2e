use std::sync::Arc;

use axum::{routing::post, Router};

use shared_upstream::AppState;

use crate::handlers;
use crate::services::store::OtpStore;

/// Router state: the shared upstream state plus this cell's pending codes.
#[derive(Clone)]
pub struct OtpState {
    pub app: AppState,
    pub store: Arc<OtpStore>,
}

impl OtpState {
    pub fn new(app: AppState, store: Arc<OtpStore>) -> Self {
        Self { app, store }
    }
}

pub fn otp_routes(state: OtpState) -> Router {
    Router::new()
        .route("/send_otp", post(handlers::send_otp))
        .route("/verify_otp", post(handlers::verify_otp))
        .with_state(state)
}
