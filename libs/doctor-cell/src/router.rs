use axum::{routing::get, Router};

use shared_upstream::AppState;

use crate::handlers;

/// Read-only views over the Bull36 template: doctors, treatments and clinics.
pub fn doctor_routes(state: AppState) -> Router {
    Router::new()
        .route("/doctors", get(handlers::list_doctors))
        .route("/doctors/{doctor_id}", get(handlers::get_doctor))
        .route("/treatments", get(handlers::list_treatments))
        .route("/treatments/{treatment_id}", get(handlers::get_treatment))
        .route("/clinics", get(handlers::list_clinics))
        .route("/get_template", get(handlers::get_template))
        .with_state(state)
}
