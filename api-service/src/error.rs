use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use user_shared::error::ApiError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Api(err) => {
                let status = err.status();
                if status.is_server_error() {
                    tracing::error!("Internal server error: {}", err);
                } else {
                    tracing::warn!("Bad request error: {}", err);
                }
                tracing::info!("Returning error response: status={}", status);
                (status, Json(err.response())).into_response()
            }
            AppError::NotFound(path) => {
                tracing::warn!("Not found error: {}", path);
                (StatusCode::NOT_FOUND, Json(json!({ "error": "Not Found" }))).into_response()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
