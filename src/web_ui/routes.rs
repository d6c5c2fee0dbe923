//! Web UI route handlers.

mod analysis_handlers;
mod auth_handlers;
mod batch_handlers;
mod spoilage_handlers;
pub(super) mod utils;
mod vehicle_handlers;

use axum::{
    response::{IntoResponse, Redirect, Response},
    routing::get,
    Router,
};
use std::sync::Arc;

use crate::api::AppState;

/// Create the web UI router
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(index))
        .route("/login", get(auth_handlers::login_page).post(auth_handlers::login_submit))
        .route("/logout", get(auth_handlers::logout))
        .route("/batches", get(batch_handlers::batches_list))
        .route("/batches/:batch_id", get(batch_handlers::batch_detail))
        .route(
            "/analysis/new",
            get(analysis_handlers::analysis_form).post(analysis_handlers::analysis_submit),
        )
        .route("/spoilage", get(spoilage_handlers::spoilage_list))
        .route(
            "/vehicles",
            get(vehicle_handlers::vehicles_page).post(vehicle_handlers::add_vehicle),
        )
}

/// Home page
async fn index() -> Response {
    Redirect::to("/batches").into_response()
}
