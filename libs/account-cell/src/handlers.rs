use axum::{extract::State, Json};
use serde_json::{json, Value};
use tracing::info;

use shared_models::{AppError, JsonBody};
use shared_upstream::AppState;

use crate::models::SwitchUserRequest;

/// Switching accounts ends whatever customer session the browser holds, so the
/// response always carries `logout: true`.
#[axum::debug_handler]
pub async fn switch_user(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<SwitchUserRequest>,
) -> Result<Json<Value>, AppError> {
    let user_key = request
        .user_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .ok_or_else(|| AppError::BadRequest("userKey is required".to_string()))?;

    if !state.registry.switch_user(&user_key).await {
        return Err(AppError::BadRequest(format!(
            "Invalid user key: {}. Available users: {}",
            user_key,
            state.registry.keys().join(", ")
        )));
    }

    info!("Active upstream user is now '{}'", user_key);

    Ok(Json(json!({
        "success": true,
        "message": format!("Switched to user: {}", user_key),
        "currentUser": state.registry.current_user().await,
        "logout": true
    })))
}

#[axum::debug_handler]
pub async fn get_current_user(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "currentUser": state.registry.current_user().await,
        "availableUsers": state.registry.keys()
    }))
}

/// Exposes the full configuration, tokens included.
#[axum::debug_handler]
pub async fn get_config(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "config": &*state.config,
        "currentUser": state.registry.selected_key().await
    }))
}
