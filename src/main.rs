mod api;
mod config;
mod dates;
mod db;
mod error;
mod ids;
mod inventory;
mod normalize;
mod web_ui;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::AppConfig;

/// Build the full application router
fn app(state: Arc<AppState>) -> Router {
    Router::new()
        // JSON endpoints (spoilage details, health)
        .merge(api::router())
        // Server-rendered pages
        .merge(web_ui::router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agri_inventory=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env();

    // Initialize database
    let db = db::init_database(&config.database_url, config.max_connections)
        .await
        .expect("Failed to initialize database");
    let db = Arc::new(db);

    let state = Arc::new(AppState::new(db.clone(), &config));

    // Ensure the bootstrap account exists so the UI can be reached
    let admin = state
        .auth
        .ensure_admin_user(&config.admin_username, &config.admin_password)
        .await
        .expect("Failed to create admin user");

    if config.seed_demo_data {
        db::seed_demo_data(&db, admin.id)
            .await
            .expect("Failed to seed demo data");
    }

    let app = app(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind listen address");
    tracing::info!("Agri inventory server starting on http://{}", config.bind_addr);
    tracing::info!("Log in as '{}' to get started", config.admin_username);

    axum::serve(listener, app).await.expect("Server error");
}
