//! HTTP service facade.
//!
//! Two endpoints:
//! - `POST /ocr` - multipart upload (field `file`), answers with the
//!   document's recognised text as JSON
//! - `GET /health` - readiness plus whether hardware-accelerated
//!   recognition is active
//!
//! This is the only layer that speaks transport. The pipeline's error kinds
//! are mapped here: an unsupported extension is the caller's mistake and
//! becomes 400; everything else (decode, rasterisation, recognition) is a
//! processing failure and becomes 500, with the underlying cause text in
//! the body.

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ProcessOptions;
use crate::engine::TextRecognizer;
use crate::error::DocrError;
use crate::output::DocumentResult;
use crate::process::process_document;

/// Uploads above this size are rejected before buffering completes.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Shared service state: the engine handle and pipeline options, fixed at
/// startup.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn TextRecognizer>,
    pub options: ProcessOptions,
}

impl AppState {
    pub fn new(engine: Arc<dyn TextRecognizer>, options: ProcessOptions) -> Self {
        Self { engine, options }
    }
}

/// Build the service router.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/ocr", post(ocr))
        .route("/health", get(health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// ── Error mapping ────────────────────────────────────────────────────────

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

/// Transport-level failure of an `/ocr` request.
pub enum ApiError {
    /// The request itself was malformed (bad multipart, missing file part).
    BadRequest(String),
    /// The pipeline rejected or failed on the upload.
    Pipeline(DocrError),
}

impl From<DocrError> for ApiError {
    fn from(e: DocrError) -> Self {
        ApiError::Pipeline(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Pipeline(e) if e.is_unsupported_format() => {
                (StatusCode::BAD_REQUEST, "UNSUPPORTED_FORMAT", e.to_string())
            }
            ApiError::Pipeline(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "PROCESSING_FAILED",
                e.to_string(),
            ),
        };

        (status, Json(ErrorResponse { error: message, code })).into_response()
    }
}

// ── Handlers ─────────────────────────────────────────────────────────────

/// POST /ocr
///
/// Accepts one file in the `file` multipart field and returns the full
/// [`DocumentResult`]. Other fields are ignored.
async fn ocr(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<DocumentResult>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("file part is missing a filename".into()))?;

        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?
            .to_vec();

        let document =
            process_document(&filename, content, &state.engine, &state.options).await?;
        return Ok(Json(document));
    }

    Err(ApiError::BadRequest(
        "missing multipart field 'file'".into(),
    ))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    accelerated: bool,
}

/// GET /health
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ready = state.engine.is_available().await;
    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        accelerated: state.engine.is_accelerated(),
    })
}
