//! Error types for measurement rounds and scaling runs

use loadspread_http::HttpError;
use loadspread_output::OutputError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a single request produced no body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    Connect,
    Status(u16),
    Other,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Timeout => f.write_str("timeout"),
            FailureKind::Connect => f.write_str("connect"),
            FailureKind::Status(status) => write!(f, "HTTP {}", status),
            FailureKind::Other => f.write_str("other"),
        }
    }
}

impl From<&HttpError> for FailureKind {
    fn from(error: &HttpError) -> Self {
        match error {
            HttpError::Timeout { .. } => FailureKind::Timeout,
            HttpError::Connect { .. } => FailureKind::Connect,
            HttpError::Status { status, .. } => FailureKind::Status(*status),
            _ => FailureKind::Other,
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbeError {
    /// One request did not complete; counted as failed, never fatal
    #[error("Request failed ({kind}): {message}")]
    RequestFailed { kind: FailureKind, message: String },

    /// A body carried no recognisable server identifier
    #[error("Malformed response: {reason}")]
    MalformedResponse { reason: String },

    #[error(
        "No response could be attributed to a server ({attempted} attempted, {failed} failed, {unparsed} unparsed)"
    )]
    EmptyResultSet {
        attempted: usize,
        failed: usize,
        unparsed: usize,
    },

    #[error("Balancer did not acknowledge capacity change for {hostnames:?}: {reason}")]
    ControlRequestFailed {
        hostnames: Vec<String>,
        reason: String,
    },

    #[error("Report could not be written: {0}")]
    ReportWriteFailed(#[from] OutputError),

    #[error("Server count {attempted} does not follow {last} in the load series")]
    SeriesOrder { last: u32, attempted: u32 },

    #[error("Invalid scaling plan: {0}")]
    InvalidPlan(String),

    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ProbeError {
    pub fn request_failed(error: &HttpError) -> Self {
        ProbeError::RequestFailed {
            kind: FailureKind::from(error),
            message: error.to_string(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        ProbeError::MalformedResponse {
            reason: reason.into(),
        }
    }

    pub fn control_failed(hostnames: &[String], reason: impl Into<String>) -> Self {
        ProbeError::ControlRequestFailed {
            hostnames: hostnames.to_vec(),
            reason: reason.into(),
        }
    }
}

pub type ProbeResult<T> = Result<T, ProbeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_kind_from_http_error() {
        let status = HttpError::Status {
            url: "http://lb/home".to_string(),
            status: 503,
        };
        assert_eq!(FailureKind::from(&status), FailureKind::Status(503));

        let timeout = HttpError::Timeout {
            url: "http://lb/home".to_string(),
        };
        assert!(matches!(
            ProbeError::request_failed(&timeout),
            ProbeError::RequestFailed {
                kind: FailureKind::Timeout,
                ..
            }
        ));
    }

    #[test]
    fn test_empty_result_set_message_carries_counts() {
        let error = ProbeError::EmptyResultSet {
            attempted: 10,
            failed: 4,
            unparsed: 6,
        };
        let message = error.to_string();
        assert!(message.contains("10 attempted"));
        assert!(message.contains("6 unparsed"));
    }
}
