use axum::{
    routing::{get, post},
    Router,
};

use shared_upstream::AppState;

use crate::handlers;

pub fn appointment_routes(state: AppState) -> Router {
    Router::new()
        .route("/get_available_time", get(handlers::get_available_time))
        .route("/create_appointment", post(handlers::create_appointment))
        .with_state(state)
}
