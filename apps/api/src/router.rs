use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::catch_panic::CatchPanicLayer;

use account_cell::account_routes;
use appointment_cell::appointment_routes;
use doctor_cell::router::doctor_routes;
use otp_cell::{otp_routes, OtpState, OtpStore};
use shared_models::AppError;
use shared_upstream::AppState;

pub fn create_router(state: AppState, otp_store: Arc<OtpStore>) -> Router {
    let bull36_routes = Router::new()
        .merge(otp_routes(OtpState::new(state.clone(), otp_store)))
        .merge(appointment_routes(state.clone()));

    let api_routes = Router::new()
        .merge(account_routes(state.clone()))
        .merge(doctor_routes(state.clone()))
        .nest("/bull36", bull36_routes);

    Router::new()
        .route("/", get(service_info))
        .with_state(state)
        .nest("/api", api_routes)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
}

async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "message": "Bull36 proxy API is running",
        "currentUser": state.registry.selected_key().await,
        "baseUrl": state.bull36.base_url()
    }))
}

async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    AppError::Internal("Internal server error".to_string()).into_response()
}
