use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use fontpack::{
    convert_batch, ConvertError, ConvertOptions, FontConverter, TargetFormat, UploadBatch,
    UploadedFont,
};
use serde::{Deserialize, Serialize};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

/// Font files can be large; the axum default of 2 MiB is far too small for a
/// batch of CJK fonts.
const MAX_UPLOAD_BYTES: usize = 64 * 1024 * 1024;

/// Download filename the browser sees for the result archive.
const ARCHIVE_FILENAME: &str = "converted_fonts.zip";

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable error message describing what went wrong
    pub error: String,
}

/// Shared per-process state: the injected converter capability and the
/// pipeline knobs. Each request builds its own batch; nothing here is
/// mutable.
#[derive(Clone)]
pub struct AppState {
    converter: Arc<dyn FontConverter>,
    options: ConvertOptions,
}

impl AppState {
    pub fn new(converter: Arc<dyn FontConverter>, options: ConvertOptions) -> Self {
        AppState { converter, options }
    }
}

/// Application-specific error types for the API
#[derive(Debug)]
pub enum AppError {
    /// The request itself was malformed (bad multipart, missing fields)
    BadRequest(String),
    /// Pipeline errors, mapped to 4xx or 5xx by their taxonomy
    Convert(ConvertError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_msg) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Convert(e) => {
                let status = if e.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, e.to_string())
            }
        };

        let error_response = ErrorResponse { error: error_msg };

        (status, Json(error_response)).into_response()
    }
}

impl From<ConvertError> for AppError {
    fn from(err: ConvertError) -> Self {
        AppError::Convert(err)
    }
}

/// Build the application router with all routes configured
pub fn app(state: AppState) -> Router {
    Router::new()
        // Upload UI
        .route("/", get(upload_page))
        // Conversion and service endpoints
        .route("/api/convert", post(convert_fonts))
        .route("/api/formats", get(supported_formats))
        .route("/api/health", get(health_check))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the embedded upload page.
pub async fn upload_page() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

/// Health check endpoint for monitoring and load balancing
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "fontpack API",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// List the supported target format labels, for the UI's format select.
pub async fn supported_formats() -> impl IntoResponse {
    let formats: Vec<String> = TargetFormat::ALL.iter().map(|f| f.to_string()).collect();
    Json(formats)
}

/// Convert an uploaded batch of font files and return them as one ZIP.
///
/// Expects a multipart form with repeated `files` fields and one `format`
/// text field. The whole batch aborts on the first file that fails; no
/// partial archive is ever returned.
pub async fn convert_fonts(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut files = Vec::new();
    let mut format = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "files" | "files[]" => {
                let name = field.file_name().unwrap_or("font").to_string();
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read file data: {e}"))
                })?;
                files.push(UploadedFont::new(name, data.to_vec()));
            }
            "format" => {
                format = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read format field: {e}"))
                })?);
            }
            _ => {}
        }
    }

    let format = format
        .ok_or_else(|| AppError::BadRequest("No target format provided".to_string()))?;
    let target: TargetFormat = format.parse()?;

    let batch = UploadBatch::new(files, target);
    let archive = convert_batch(state.converter.as_ref(), batch, &state.options)
        .await
        .inspect_err(|e| {
            if !e.is_client_error() {
                warn!(error = %e, "batch conversion failed");
            }
        })?;

    let zip_bytes = archive.into_zip_bytes().map_err(AppError::Convert)?;

    Ok((
        StatusCode::OK,
        [
            ("Content-Type", "application/zip".to_string()),
            (
                "Content-Disposition",
                format!("attachment; filename=\"{ARCHIVE_FILENAME}\""),
            ),
        ],
        zip_bytes,
    )
        .into_response())
}
