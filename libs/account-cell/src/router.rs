use axum::{
    routing::{get, post},
    Router,
};

use shared_upstream::AppState;

use crate::handlers;

pub fn account_routes(state: AppState) -> Router {
    Router::new()
        .route("/switch-user", post(handlers::switch_user))
        .route("/current-user", get(handlers::get_current_user))
        .route("/config", get(handlers::get_config))
        .with_state(state)
}
