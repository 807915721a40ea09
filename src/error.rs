use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::cart::report::ReportError;

/// A single failed field check, surfaced to the caller as-is.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldViolation>),

    /// Domain conflicts (duplicate subscription, self-subscription) are
    /// returned as 400 with a message, matching the API contract.
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(&'static str),

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("database error: {0}")]
    Database(diesel::result::Error),

    #[error("database connection failed: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("report generation failed: {0}")]
    Report(#[from] ReportError),
}

impl From<diesel::result::Error> for ApiError {
    fn from(e: diesel::result::Error) -> Self {
        match e {
            diesel::result::Error::NotFound => ApiError::NotFound("Not found"),
            other => ApiError::Database(other),
        }
    }
}

#[derive(Serialize)]
struct ValidationBody {
    errors: Vec<FieldViolation>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(violations) => (
                StatusCode::BAD_REQUEST,
                Json(ValidationBody { errors: violations }),
            )
                .into_response(),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                Json(crate::api::ErrorResponse { error: message }),
            )
                .into_response(),
            ApiError::Unauthorized(message) => (
                StatusCode::UNAUTHORIZED,
                Json(crate::api::ErrorResponse {
                    error: message.to_string(),
                }),
            )
                .into_response(),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                Json(crate::api::ErrorResponse {
                    error: message.to_string(),
                }),
            )
                .into_response(),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                Json(crate::api::ErrorResponse {
                    error: message.to_string(),
                }),
            )
                .into_response(),
            ApiError::Database(e) => {
                tracing::error!("database error: {}", e);
                server_error()
            }
            ApiError::Pool(e) => {
                tracing::error!("failed to get database connection: {}", e);
                server_error()
            }
            ApiError::Report(e) => {
                tracing::error!("failed to generate report: {}", e);
                server_error()
            }
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(crate::api::ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
        .into_response()
}
