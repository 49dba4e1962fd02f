//! Error types for the Bookstore server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every server-side failure; internal detail never leaves the process.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Record count {0} exceeds the representable range")]
    Overflow(u64),

    #[error("Store error: {0}")]
    Store(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is reported to the client as a 5xx
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::Overflow(_) | AppError::Store(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::Store(Box::new(err))
    }
}

/// Error response body for rejected requests
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u16,
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    // Handlers report failures with their operation context before returning,
    // so nothing is logged here.
    fn into_response(self) -> Response {
        let status = self.status_code();
        match self {
            AppError::InvalidArgument(message) => {
                let body = Json(ErrorResponse {
                    code: status.as_u16(),
                    error: "InvalidArgument".to_string(),
                    message,
                });
                (status, body).into_response()
            }
            AppError::Overflow(_) | AppError::Store(_) | AppError::Internal(_) => {
                (status, GENERIC_ERROR_MESSAGE).into_response()
            }
        }
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
