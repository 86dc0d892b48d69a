use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not logged in")]
    AuthMissing,

    #[error("Need refresh token")]
    TokenExpired,

    #[error("Spotify API returned {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("{0}")]
    Validation(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Every failure leaves the relay as a `400` with a `{status, message}` body.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "request failed");

        let body = Json(json!({
            "status": "Failed",
            "message": self.to_string(),
        }));

        (StatusCode::BAD_REQUEST, body).into_response()
    }
}
