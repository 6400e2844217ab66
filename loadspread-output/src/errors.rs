//! Error types for the reporting sink

use thiserror::Error;

/// Errors that can occur while producing a report artifact
#[derive(Debug, Error, Clone)]
pub enum OutputError {
    #[error("Template rendering failed: {template} - {error}")]
    TemplateRender { template: String, error: String },

    #[error("Invalid report path {path}: {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Serialization failed for format {format}: {error}")]
    Serialization { format: String, error: String },

    #[error("Filesystem operation failed at {path} ({operation}): {error}")]
    Filesystem {
        path: String,
        operation: String,
        error: String,
    },

    #[error("Nothing to report for '{0}'")]
    EmptyChart(String),
}
