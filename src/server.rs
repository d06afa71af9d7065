use crate::classifier::DigitClassifier;
use crate::classifiers;
use crate::config::Config;
use crate::error::PipelineError;
use crate::pipeline::{self, DigitDetection, Preset, ProcessingProfile};
use crate::session::CaptureSession;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Multipart, State},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;

/// Image formats the upload decoder accepts
const SUPPORTED_FORMATS: &[&str] = &[
    "image/png",
    "image/jpeg",
    "image/gif",
    "image/bmp",
    "image/webp",
    "image/tiff",
];

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<dyn DigitClassifier>,
    pub session: Arc<CaptureSession>,
    pub config: Arc<Config>,
}

/// Recognition response
#[derive(Serialize)]
pub struct RecognizeResponse {
    pub text: String,
    pub detections: Vec<DigitDetection>,
    pub processing_time_ms: u64,
    pub profile: String,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Server info response
#[derive(Serialize)]
pub struct InfoResponse {
    pub version: String,
    pub classifier: String,
    pub classifier_description: String,
    pub default_profile: String,
    pub profile: ProcessingProfile,
    pub supported_formats: Vec<String>,
    pub max_file_size_bytes: usize,
}

/// Run the HTTP server
pub async fn run(config: Config) -> anyhow::Result<()> {
    // Fail fast: a server without a classifier would conflate "no digits
    // found" with "could not classify"
    let classifier = classifiers::create_classifier(&config)?;

    let addr = format!("{}:{}", config.host, config.port);
    let max_file_size = config.max_file_size;

    let state = AppState {
        classifier,
        session: Arc::new(CaptureSession::new()),
        config: Arc::new(config),
    };

    let app = Router::new()
        .route("/recognize", post(handle_recognize))
        .route("/health", get(handle_health))
        .route("/info", get(handle_info))
        .layer(DefaultBodyLimit::max(max_file_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Handle recognition requests
async fn handle_recognize(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<RecognizeResponse>, PipelineError> {
    let start = Instant::now();

    let mut file_data: Option<Bytes> = None;
    let mut content_type: Option<String> = None;
    let mut preset: Option<Preset> = None;

    // Parse multipart form
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| PipelineError::InvalidRequest(format!("Failed to parse multipart: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "file" => {
                content_type = field.content_type().map(|s| s.to_string());
                file_data = Some(field.bytes().await.map_err(|e| {
                    PipelineError::InvalidRequest(format!("Failed to read file data: {}", e))
                })?);
            }
            "profile" => {
                let value = field.text().await.map_err(|e| {
                    PipelineError::InvalidRequest(format!("Invalid profile field: {}", e))
                })?;
                preset = Some(Preset::from_str(&value).ok_or_else(|| {
                    PipelineError::InvalidRequest(format!("Unknown profile \"{}\"", value))
                })?);
            }
            _ => {
                // Ignore unknown fields
            }
        }
    }

    // Validate file was provided
    let data = file_data.ok_or(PipelineError::MissingFile)?;

    // Check file size
    if data.len() > state.config.max_file_size {
        return Err(PipelineError::ImageTooLarge {
            size: data.len(),
            max: state.config.max_file_size,
        });
    }

    let mime = content_type.unwrap_or_else(|| "application/octet-stream".to_string());
    if !SUPPORTED_FORMATS.contains(&mime.as_str()) && !mime.starts_with("image/") {
        tracing::warn!("Received file with content type: {}", mime);
    }

    // A per-request preset replaces the server default; the CLI overrides
    // only shape the default profile
    let profile = match preset {
        Some(p) => p.profile(),
        None => state.config.profile,
    };
    let profile_name = preset.unwrap_or(state.config.preset).as_str();

    let image = image::load_from_memory(&data)
        .map_err(|e| PipelineError::InvalidRequest(format!("Failed to decode image: {}", e)))?;
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();

    // One frame in flight per capture session; the guard resets the session
    // to Idle when the result has been assembled
    let _guard = state.session.try_begin()?;

    let readout = pipeline::recognize_frame(
        rgba.as_raw(),
        width,
        height,
        &profile,
        state.classifier.as_ref(),
    )?;

    let processing_time_ms = start.elapsed().as_millis() as u64;

    tracing::info!(
        "Recognition completed in {}ms: \"{}\" ({} detection(s))",
        processing_time_ms,
        readout.text,
        readout.detections.len()
    );

    Ok(Json(RecognizeResponse {
        text: readout.text,
        detections: readout.detections,
        processing_time_ms,
        profile: profile_name.to_string(),
    }))
}

/// Handle health check requests
async fn handle_health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Handle info requests
async fn handle_info(State(state): State<AppState>) -> impl IntoResponse {
    Json(InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        classifier: state.classifier.name().to_string(),
        classifier_description: state.classifier.description().to_string(),
        default_profile: state.config.preset.as_str().to_string(),
        profile: state.config.profile,
        supported_formats: SUPPORTED_FORMATS.iter().map(|s| s.to_string()).collect(),
        max_file_size_bytes: state.config.max_file_size,
    })
}
