use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Message shown to users whenever the database fails; the real error is logged.
pub const DATABASE_ERROR_MESSAGE: &str = "A database error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Cannot delete vehicle {vehicle_id}: it is assigned to {shipments} shipment(s)")]
    VehicleInUse { vehicle_id: String, shipments: u64 },

    #[error("Invalid username or password")]
    AuthFailed,

    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl ServerError {
    /// Text that is safe to show to an end user.
    ///
    /// Database failures are logged in full and replaced by a generic message.
    pub fn user_message(&self) -> String {
        match self {
            ServerError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                DATABASE_ERROR_MESSAGE.to_string()
            }
            _ => self.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::VehicleInUse { .. } => StatusCode::CONFLICT,
            ServerError::AuthFailed => StatusCode::FORBIDDEN,
            ServerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Map constraint violations to a conflict, leave everything else as a database error
    pub fn from_write(err: DbErr, conflict_message: &str) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                tracing::warn!("Unique constraint violation: {}", detail);
                ServerError::Conflict(conflict_message.to_string())
            }
            _ => ServerError::Database(err),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(serde_json::json!({ "error": self.user_message() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
