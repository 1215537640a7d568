use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

/// Error types for pet operations
#[derive(Debug, thiserror::Error)]
pub enum PetError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Pet not found")]
    NotFound,

    #[error("You are not the owner of this pet")]
    NotOwner,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<sqlx::Error> for PetError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => PetError::NotFound,
            other => PetError::Database(other.to_string()),
        }
    }
}

impl IntoResponse for PetError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            PetError::Database(msg) => {
                error!("Database error in pets: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal error".to_string(),
                )
            }
            PetError::NotFound => {
                debug!("Pet not found");
                (StatusCode::NOT_FOUND, "Pet not found".to_string())
            }
            PetError::NotOwner => {
                warn!("Ownership check failed for pet mutation");
                (
                    StatusCode::FORBIDDEN,
                    "You are not the owner of this pet".to_string(),
                )
            }
            PetError::Validation(msg) => {
                debug!("Validation error: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
        };

        let body = Json(json!({
            "message": message,
        }));

        (status, body).into_response()
    }
}
