//! PDF export endpoint
//!
//! `POST /api/generate-pdf` with `{ "url": "..." }` renders the page in a
//! fresh headless browser and answers with the PDF as an attachment.
//!
//! A missing `url`, a blank one, or one that isn't a string is rejected with
//! 400 before any browser is launched.

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::Response,
    routing::post,
    Json, Router,
};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Largest accepted request body
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";
pub const PDF_DISPOSITION: &str = "attachment; filename=document.pdf";

/// Render request body
#[derive(Debug, Deserialize)]
pub struct GeneratePdfRequest {
    pub url: Option<String>,
}

/// Create the PDF router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_pdf))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

/// Pull a usable URL out of the body.
///
/// Malformed JSON or a non-string `url` count as a missing URL; only a body
/// that could not be read (e.g. too large) is rejected as such.
fn requested_url(
    body: std::result::Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> Result<String> {
    let request = match body {
        Ok(Json(request)) => Some(request),
        Err(rejection @ JsonRejection::BytesRejection(_)) => {
            return Err(AppError::Body(rejection))
        }
        Err(rejection) => {
            tracing::debug!("Unparseable render request: {}", rejection);
            None
        }
    };

    request
        .and_then(|request| request.url)
        .filter(|url| !url.trim().is_empty())
        .ok_or(AppError::MissingUrl)
}

/// Render a URL to PDF
async fn generate_pdf(
    State(state): State<AppState>,
    body: std::result::Result<Json<GeneratePdfRequest>, JsonRejection>,
) -> Result<Response> {
    let url = requested_url(body)?;

    let pdf = state.exporter().export(&url).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, PDF_CONTENT_TYPE)
        .header(header::CONTENT_DISPOSITION, PDF_DISPOSITION)
        .body(Body::from(pdf))
        .map_err(|e| AppError::Internal(e.to_string()))
}
