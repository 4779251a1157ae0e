//! HTTP server for statement uploads.
//!
//! # API Endpoints
//!
//! | Method | Path               | Description                          |
//! |--------|--------------------|--------------------------------------|
//! | GET    | `/health`          | Health check                         |
//! | POST   | `/api/statements`  | Upload a statement for extraction    |
//! | GET    | `/api/logs`        | SSE stream for upload logs           |

use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, Method, StatusCode},
    response::{sse::Event, IntoResponse, Json, Response, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use super::logs::{log_error, log_info, log_success, log_warning, LOG_BROADCASTER};
use super::types::{error_response, StatementResponse};
use crate::config::ExtractorConfig;
use crate::error::{ExtractError, ExtractResult, ServerError, ServerResult};
use crate::extract::{ExtractionReport, StatementExtractor};
use crate::reader::SpreadsheetKind;

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<StatementExtractor>,
    /// Directory for temporary upload copies
    pub upload_dir: PathBuf,
}

impl AppState {
    pub fn new(config: ExtractorConfig) -> Self {
        Self {
            extractor: Arc::new(StatementExtractor::new(config)),
            upload_dir: std::env::temp_dir(),
        }
    }

    pub fn with_upload_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.upload_dir = dir.into();
        self
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Extract(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            ServerError::Extract(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(error_response(&self.to_string()))).into_response()
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/statements", post(upload_statement))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .with_state(state)
}

/// Start the HTTP server
pub async fn start_server(port: u16, config: ExtractorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let app = router(AppState::new(config));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "ledgerlift server listening");
    tracing::info!("POST /api/statements - upload a statement");
    tracing::info!("GET  /api/logs       - SSE log stream");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "ledgerlift",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "statements": "POST /api/statements",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| match result {
        Ok(entry) => {
            let json = serde_json::to_string(&entry).ok()?;
            Some(Ok(Event::default().data(json)))
        }
        Err(_) => None,
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

/// Upload endpoint
async fn upload_statement(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ServerResult<Json<StatementResponse>> {
    let mut file_data: Option<Vec<u8>> = None;
    let mut file_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() == Some("file") {
            file_name = field.file_name().map(|s| s.to_string());
            file_data = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?
                    .to_vec(),
            );
        }
    }

    let bytes = file_data.ok_or_else(|| ServerError::BadRequest("No file provided".into()))?;
    let file_name = file_name.unwrap_or_default();

    process_upload(&state, &file_name, bytes).await.map(Json)
}

/// Validate, persist and extract one uploaded statement.
///
/// The upload is written to a temporary file carrying its original
/// extension; the file is removed when extraction returns, whatever the
/// outcome.
pub async fn process_upload(
    state: &AppState,
    file_name: &str,
    bytes: Vec<u8>,
) -> ServerResult<StatementResponse> {
    let kind = SpreadsheetKind::from_path(Path::new(file_name))?;
    if bytes.is_empty() {
        return Err(ServerError::BadRequest("Uploaded file is empty".into()));
    }

    let job_id = Uuid::new_v4().to_string();
    log_info(&job_id, format!("received {} ({} bytes)", file_name, bytes.len()));

    let extractor = Arc::clone(&state.extractor);
    let upload_dir = state.upload_dir.clone();
    let outcome = tokio::task::spawn_blocking(move || -> ExtractResult<ExtractionReport> {
        let mut temp = tempfile::Builder::new()
            .prefix("ledgerlift-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile_in(&upload_dir)?;
        temp.write_all(&bytes)?;
        temp.flush()?;
        extractor.extract_report(temp.path())
    })
    .await
    .map_err(|e| ServerError::Internal(format!("extraction task failed: {}", e)))?;

    match outcome {
        Ok(report) => {
            log_success(
                &job_id,
                format!(
                    "{} transactions extracted, {} rows skipped",
                    report.records.len(),
                    report.skipped.len()
                ),
            );
            Ok(StatementResponse::ready(
                job_id,
                file_name.to_string(),
                report.records,
                report.skipped,
            ))
        }
        Err(ExtractError::NoHeaderFound(diagnostic)) => {
            log_warning(&job_id, format!("no header row: {}", diagnostic));
            Ok(StatementResponse::no_header(job_id, file_name.to_string(), diagnostic))
        }
        Err(e) => {
            log_error(&job_id, e.to_string());
            Err(e.into())
        }
    }
}
