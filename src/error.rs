use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to initialize classifier: {0}")]
    InitializationError(String),

    #[error("No classifier backend available: {0}")]
    ClassifierUnavailable(String),

    #[error("Invalid frame: {0}")]
    InvalidInput(String),

    #[error("Failed to process frame: {0}")]
    ProcessingError(String),

    #[error("A frame is already being processed for this session")]
    SessionBusy,

    #[error("Image too large: {size} bytes (max: {max} bytes)")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Missing file in request")]
    MissingFile,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            PipelineError::InitializationError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INIT_ERROR")
            }
            PipelineError::ClassifierUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "CLASSIFIER_UNAVAILABLE")
            }
            PipelineError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "INVALID_INPUT"),
            PipelineError::ProcessingError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "PROCESSING_ERROR")
            }
            PipelineError::SessionBusy => (StatusCode::CONFLICT, "SESSION_BUSY"),
            PipelineError::ImageTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "IMAGE_TOO_LARGE"),
            PipelineError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            PipelineError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
            PipelineError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}
