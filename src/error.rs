use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
    #[error("{0} is required")]
    MissingDate(&'static str),
    #[error("{0} must be a valid calendar date")]
    InvalidDate(&'static str),
    #[error("start_date must be on or before end_date")]
    InvalidRange,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::Config(_) | AppError::Io(_) | AppError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::MissingDate(_) | AppError::InvalidDate(_) | AppError::InvalidRange => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
