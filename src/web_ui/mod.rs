//! Web UI Module
//!
//! Server-rendered pages for batches, nutritional analyses, spoilage
//! inspections and the vehicle fleet. Every page except login goes through
//! the session guard (`RequestContext`).

mod routes;
mod templates;

use axum::Router;
use std::sync::Arc;

use crate::api::AppState;

/// Create the web UI router.
/// Mount this with `.merge(web_ui::router())` in main.rs
pub fn router() -> Router<Arc<AppState>> {
    routes::create_router()
}
