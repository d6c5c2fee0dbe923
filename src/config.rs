//! Server configuration, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Longest accepted session lifetime (one year)
const MAX_SESSION_TTL_HOURS: u64 = 24 * 366;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// SeaORM connection URL
    pub database_url: String,
    pub max_connections: u32,
    /// How long a login session stays valid
    pub session_ttl: Duration,
    /// Account ensured at startup so the UI is reachable on a fresh database
    pub admin_username: String,
    pub admin_password: String,
    /// Insert sample batches, crops and vehicles into an empty database
    pub seed_demo_data: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            database_url: Self::default_database_url(),
            max_connections: 5,
            session_ttl: Duration::from_secs(24 * 60 * 60), // 24 hours
            admin_username: "admin".to_string(),
            admin_password: "admin".to_string(),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// Build config from `AGRI_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup("AGRI_BIND_ADDR") {
            match addr.parse() {
                Ok(addr) => config.bind_addr = addr,
                Err(_) => tracing::warn!("Ignoring invalid AGRI_BIND_ADDR: {}", addr),
            }
        }

        if let Some(url) = lookup("AGRI_DATABASE_URL").filter(|u| !u.trim().is_empty()) {
            config.database_url = url;
        }

        if let Some(value) = lookup("AGRI_DB_MAX_CONNECTIONS") {
            match value.parse::<u32>() {
                Ok(n) if n > 0 => config.max_connections = n,
                _ => tracing::warn!("Ignoring invalid AGRI_DB_MAX_CONNECTIONS: {}", value),
            }
        }

        if let Some(value) = lookup("AGRI_SESSION_TTL_HOURS") {
            match value.parse::<u64>() {
                Ok(hours) if hours > 0 && hours <= MAX_SESSION_TTL_HOURS => {
                    config.session_ttl = Duration::from_secs(hours * 60 * 60)
                }
                _ => tracing::warn!(
                    "Ignoring invalid AGRI_SESSION_TTL_HOURS: {} (must be 1..={})",
                    value,
                    MAX_SESSION_TTL_HOURS
                ),
            }
        }

        if let Some(username) = lookup("AGRI_ADMIN_USERNAME").filter(|u| !u.trim().is_empty()) {
            config.admin_username = username;
        }
        if let Some(password) = lookup("AGRI_ADMIN_PASSWORD").filter(|p| !p.is_empty()) {
            config.admin_password = password;
        }

        if let Some(value) = lookup("AGRI_SEED_DEMO") {
            config.seed_demo_data = matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }

        config
    }

    fn default_database_url() -> String {
        let path: PathBuf = std::env::temp_dir().join("agri-inventory").join("inventory.db");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).ok();
        }
        format!("sqlite:{}?mode=rwc", path.display())
    }
}
