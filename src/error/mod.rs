// Error types for the oddscache gateway
// Author: kelexine (https://github.com/kelexine)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OddsError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Odds API error ({status}): {message}")]
    UpstreamApi { status: u16, message: String },

    #[error("Unexpected upstream content type: {0}")]
    UnexpectedContentType(String),

    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parsing error: {0}")]
    ConfigParsing(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

// Convert OddsError to HTTP responses for Axum
impl IntoResponse for OddsError {
    fn into_response(self) -> Response {
        let (status, error_type) = match &self {
            OddsError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request_error"),
            OddsError::TooManyRequests(_) => (StatusCode::TOO_MANY_REQUESTS, "rate_limit_error"),
            OddsError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "service_unavailable")
            }
            OddsError::UpstreamApi { .. }
            | OddsError::UnexpectedContentType(_)
            | OddsError::Http(_) => (StatusCode::BAD_GATEWAY, "upstream_error"),
            OddsError::Config(_) | OddsError::ConfigParsing(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "configuration_error")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "api_error"),
        };

        let body = json!({
            "type": "error",
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, OddsError>;
