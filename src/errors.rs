use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::repository::RepositoryError;
use crate::services::clock::TimeError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Time(#[from] TimeError),

    #[error("not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Repository(RepositoryError::NotFound(_)) => StatusCode::NOT_FOUND,
            AppError::Repository(RepositoryError::SpaceInUse) => StatusCode::CONFLICT,
            AppError::Repository(RepositoryError::Backend(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) | AppError::Time(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        };

        let body = serde_json::json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}
