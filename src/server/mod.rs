//! HTTP front-end: a JSON API plus a minimal web form, both thin adapters
//! over [`TranscriptPipeline`].
//!
//! Routes:
//! - `GET /` — HTML form posting to the JSON API
//! - `GET /health` — liveness probe
//! - `POST /transcript` — generate and return the document as JSON
//! - `POST /transcript/download` — generate, persist to the scratch
//!   directory, and return the file with an attachment disposition
//!
//! Failures map to status codes: invalid URL and unavailable language are
//! 400, punctuation-model unavailability is 503, everything else is 500.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tempfile::TempDir;
use tokio::net::TcpListener;
use uuid::Uuid;

use crate::config::Config;
use crate::pipeline::{TranscriptPipeline, TranscriptRequest};
use crate::{output, Result, TranscriptError};

mod page;

pub struct ServerState {
    pipeline: TranscriptPipeline,
    scratch_dir: TempDir,
}

impl ServerState {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_pipeline(TranscriptPipeline::new(config, None)?)
    }

    pub fn with_pipeline(pipeline: TranscriptPipeline) -> Result<Self> {
        let scratch_dir = TempDir::new()?;
        Ok(Self {
            pipeline,
            scratch_dir,
        })
    }
}

/// Transcript generation request as accepted by the API.
#[derive(Debug, Deserialize)]
pub struct ApiTranscriptRequest {
    pub video_url: String,

    #[serde(default = "default_language")]
    pub language: String,

    pub filename: Option<String>,

    /// The web form defaults to punctuated output, so the API does too.
    #[serde(default = "default_punctuate")]
    pub punctuate: bool,
}

fn default_language() -> String {
    "en".to_string()
}

fn default_punctuate() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct ApiTranscriptResponse {
    pub success: bool,
    pub video_id: String,
    pub filename: String,
    pub transcript: String,
    pub message: String,
    pub generated_at: DateTime<Utc>,
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = config.server.bind.parse()?;
    let state = Arc::new(ServerState::new(&config)?);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/transcript", post(create_transcript))
        .route("/transcript/download", post(download_transcript))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(page::INDEX_PAGE)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn create_transcript(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ApiTranscriptRequest>,
) -> Response {
    match generate(&state, &request).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => error_response(&e),
    }
}

async fn download_transcript(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ApiTranscriptRequest>,
) -> Response {
    let generated = match generate(&state, &request).await {
        Ok(generated) => generated,
        Err(e) => return error_response(&e),
    };

    // Persist under a unique stem so concurrent downloads of the same video
    // cannot clobber each other in the shared scratch directory.
    let stem = format!(
        "{}_{}",
        generated.filename.trim_end_matches(".md"),
        &Uuid::new_v4().to_string()[..8]
    );
    let path = match output::save_document(
        &generated.transcript,
        state.scratch_dir.path(),
        &stem,
    )
    .await
    {
        Ok(path) => path,
        Err(e) => return error_response(&e),
    };

    let content = match fs_err::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            return error_response(&TranscriptError::PersistFailed(e.to_string()).into())
        }
    };

    let disposition = format!(
        "attachment; filename=\"{}\"",
        urlencoding::encode(&generated.filename)
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/markdown; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        content,
    )
        .into_response()
}

async fn generate(
    state: &ServerState,
    request: &ApiTranscriptRequest,
) -> Result<ApiTranscriptResponse> {
    let pipeline_request = TranscriptRequest {
        url: request.video_url.clone(),
        language: request.language.clone(),
        punctuate: request.punctuate,
        filename: request.filename.clone(),
    };

    let document = state.pipeline.generate(&pipeline_request).await?;
    let stem = output::resolve_filename(
        request.filename.as_deref(),
        document.title.as_deref(),
        &document.video_id,
    );

    Ok(ApiTranscriptResponse {
        success: true,
        video_id: document.video_id,
        filename: format!("{}.md", stem),
        transcript: document.body,
        message: "Transcript generated successfully".to_string(),
        generated_at: Utc::now(),
    })
}

fn error_response(err: &anyhow::Error) -> Response {
    let status = error_status(err);
    tracing::error!("Request failed ({}): {:#}", status, err);

    (
        status,
        Json(serde_json::json!({ "success": false, "error": err.to_string() })),
    )
        .into_response()
}

fn error_status(err: &anyhow::Error) -> StatusCode {
    match err.downcast_ref::<TranscriptError>() {
        Some(TranscriptError::InvalidUrl(_)) | Some(TranscriptError::LanguageUnavailable(_)) => {
            StatusCode::BAD_REQUEST
        }
        Some(TranscriptError::PunctuationFailed(_)) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
