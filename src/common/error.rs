use crate::common::response::ApiError;
use crate::infrastructure::storage::StorageError;
use crate::transcode::{InspectError, ToolError};
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

/// Everything that can end an upload request early.
///
/// Client-caused failures carry the message shown to the caller. Server-side
/// failures keep their source for the log and answer with a fixed message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Upload exceeds the size limit")]
    PayloadTooLarge,

    #[error("staging failed: {0}")]
    Staging(#[source] std::io::Error),

    #[error("remux failed: {0}")]
    Transcode(#[from] ToolError),

    #[error("inspection failed: {0}")]
    Inspection(#[from] InspectError),

    #[error("object upload failed: {0}")]
    Upload(#[from] StorageError),

    #[error("metadata store failed: {0:#}")]
    Metadata(#[source] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Staging(_)
            | AppError::Transcode(_)
            | AppError::Inspection(_)
            | AppError::Upload(_)
            | AppError::Metadata(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::Unauthorized(msg) | AppError::NotFound(msg) => {
                msg.clone()
            }
            AppError::PayloadTooLarge => self.to_string(),
            AppError::Staging(_) => "Upload processing error".to_string(),
            AppError::Transcode(_) => "Couldn't process video".to_string(),
            AppError::Inspection(_) => "Couldn't inspect video".to_string(),
            AppError::Upload(_) => "File storage error".to_string(),
            AppError::Metadata(_) => "Couldn't update video".to_string(),
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::Validation(format!("Couldn't parse form: {}", err.body_text()))
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, status = status.as_u16(), "request rejected");
        }
        ApiError(self.public_message(), status).into_response()
    }
}
