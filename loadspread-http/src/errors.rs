//! HTTP error types

use crate::types::HttpMethodError;

/// Error type for HTTP operations
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to read response body from {url}: {message}")]
    Body { url: String, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(#[from] HttpMethodError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl HttpError {
    /// Classify a reqwest failure against the URL it was sent to
    pub fn from_reqwest(url: &str, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            HttpError::Timeout {
                url: url.to_string(),
            }
        } else if error.is_connect() {
            HttpError::Connect {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else if let Some(status) = error.status() {
            HttpError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }
        } else if error.is_body() || error.is_decode() {
            HttpError::Body {
                url: url.to_string(),
                message: error.to_string(),
            }
        } else {
            HttpError::Network(error)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout { .. })
    }
}
