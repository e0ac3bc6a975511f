use crate::services::user_service::UserServiceError;
use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors surfaced by the HTTP layer.
///
/// Every variant renders as `{"detail": "..."}`. Persistence failures only
/// expose a generic message; the underlying error is logged by the service.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Service(#[from] UserServiceError),

    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    #[error("Invalid path parameter: {0}")]
    Path(#[from] PathRejection),

    #[error("Service unavailable")]
    Unavailable,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Service(UserServiceError::UserNotFound) => StatusCode::NOT_FOUND,
            AppError::Service(UserServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Service(UserServiceError::Persistence { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Json(_) | AppError::Path(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            AppError::Service(UserServiceError::UserNotFound) => "User not found".to_string(),
            AppError::Service(UserServiceError::Validation(msg)) => msg.clone(),
            AppError::Service(UserServiceError::Persistence { action, .. }) => {
                action.failure_message().to_string()
            }
            AppError::Json(rejection) => rejection.body_text(),
            AppError::Path(rejection) => rejection.body_text(),
            AppError::Unavailable => "Database unavailable".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = json!({ "detail": self.detail() });
        (self.status(), Json(body)).into_response()
    }
}
