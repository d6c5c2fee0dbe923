pub mod auth;
pub mod session;
pub mod spoilage;

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::ids::IdGenerator;
pub use auth::AuthManager;
pub use session::{Flash, RequestContext, SessionStore, SessionUser};

/// Application state shared across handlers
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub auth: AuthManager,
    pub sessions: Arc<SessionStore>,
    pub ids: IdGenerator,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: &AppConfig) -> Self {
        Self {
            auth: AuthManager::new(db.clone()),
            sessions: Arc::new(SessionStore::new(config.session_ttl)),
            ids: IdGenerator::new(),
            db,
        }
    }
}

/// JSON endpoints
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/spoilage/details", get(spoilage::spoilage_details))
        .route("/health", get(health))
}

/// Health check
pub async fn health() -> &'static str {
    "OK"
}
