use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub const NO_FILE_SELECTED_MESSAGE: &str = "Please select a file first.";
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";

/// Why a single upload attempt ended without a parsed resume.
/// `Display` is the message shown to the user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum UploadError {
    /// Submit was pressed with nothing selected. No request is made.
    #[error("{}", NO_FILE_SELECTED_MESSAGE)]
    NoFileSelected,

    #[error("An upload is already in progress.")]
    AlreadyInFlight,

    /// Network failure or non-2xx answer from the parsing API.
    #[error("{}", .message.as_deref().unwrap_or(UNKNOWN_ERROR_MESSAGE))]
    Transport {
        status: Option<u16>,
        message: Option<String>,
    },

    /// Anything else, e.g. a 2xx body that does not have the expected shape.
    /// The detail is for logs only.
    #[error("{}", UNKNOWN_ERROR_MESSAGE)]
    Unknown(String),
}

impl UploadError {
    pub fn user_message(&self) -> String {
        self.to_string()
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(e: reqwest::Error) -> Self {
        UploadError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: None,
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        match e {
            UploadError::NoFileSelected => AppError::Validation(e.user_message()),
            UploadError::AlreadyInFlight => AppError::Conflict(e.user_message()),
            UploadError::Transport { .. } | UploadError::Unknown(_) => {
                AppError::Upstream(e.user_message())
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::PayloadTooLarge(msg) => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg.clone()),
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
