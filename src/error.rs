//! Error types for the PDF export server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::browser::BrowserError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Failed to generate PDF")]
    Render(#[from] BrowserError),

    /// Body could not be read at all (e.g. over the size limit)
    #[error("Request body rejected: {0}")]
    Body(JsonRejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// Message reported in `details`: the underlying fault, or a generic marker
fn failure_details(err: &BrowserError) -> String {
    match err.cause() {
        Some(_) => err.to_string(),
        None => "Unknown error".to_string(),
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::MissingUrl => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new("URL is required"))
            }
            AppError::Render(e) => {
                tracing::error!("PDF Generation Error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Failed to generate PDF", failure_details(&e)),
                )
            }
            AppError::Body(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection);
                return rejection.into_response();
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Failed to generate PDF", msg),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
