use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::database::StoreError;
use crate::provider::ProviderError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("payment provider error: {0}")]
    Upstream(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Error half of the shared response envelope.
#[derive(Serialize)]
struct ErrorEnvelope {
    success: bool,
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(msg) => {
                tracing::warn!("bad request: {}", msg);
                StatusCode::BAD_REQUEST
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("unauthorized: {}", msg);
                StatusCode::UNAUTHORIZED
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("not found: {}", msg);
                StatusCode::NOT_FOUND
            }
            ApiError::Conflict(msg) => {
                tracing::warn!("conflict: {}", msg);
                StatusCode::CONFLICT
            }
            ApiError::Upstream(msg) => {
                tracing::error!("provider error: {}", msg);
                StatusCode::BAD_GATEWAY
            }
            ApiError::Database(msg) => {
                tracing::error!("database error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorEnvelope {
            success: false,
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Database(err.to_string())
    }
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        ApiError::Upstream(err.to_string())
    }
}

// Extractor rejections (unparseable body, missing field, bad path
// parameter) surface through the same envelope as handler errors.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}
