use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use encore_registry::RegistryError;
use encore_store::CatalogError;
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    AuthenticationError(String),
    AuthorizationError(String),
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    /// Distinct from Conflict so the client prompts re-selection instead of
    /// retrying the same request.
    HoldExpiredError(String),
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::AuthenticationError(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AuthorizationError(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::HoldExpiredError(msg) => (StatusCode::GONE, msg),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::EventNotFound(_) | RegistryError::SeatNotFound(_) => {
                AppError::NotFoundError(err.to_string())
            }
            RegistryError::Conflict { .. } | RegistryError::EventExists(_) => {
                AppError::ConflictError(err.to_string())
            }
            RegistryError::HoldExpired { .. } => AppError::HoldExpiredError(err.to_string()),
            RegistryError::EmptySeatSet => AppError::ValidationError(err.to_string()),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            CatalogError::InvalidLayout(_) => AppError::ValidationError(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}
