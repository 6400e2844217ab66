//! Measurement target and fan-out configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, validate_url, Validatable};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// How a backend names itself in a response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseEncoding {
    /// The whole trimmed body is the server identifier
    Plain,
    /// A JSON record whose message field ends in `": <identifier>"`
    #[default]
    Structured,
}

impl ResponseEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseEncoding::Plain => "plain",
            ResponseEncoding::Structured => "structured",
        }
    }
}

impl fmt::Display for ResponseEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "text" => Ok(ResponseEncoding::Plain),
            "structured" | "json" => Ok(ResponseEncoding::Structured),
            _ => Err(format!(
                "Invalid response encoding: {} (expected plain or structured)",
                s
            )),
        }
    }
}

/// Measurement round configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Load-balanced resource under test
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Requests issued per round
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Response body encoding
    #[serde(default)]
    pub encoding: ResponseEncoding,

    /// JSON field carrying the human-readable message in structured mode
    #[serde(default = "default_message_field")]
    pub message_field: String,

    /// Upper bound on in-flight requests; unset picks a size-dependent default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concurrency_limit: Option<usize>,

    /// Per-request timeout; unset falls back to `http.timeout`
    #[serde(
        default,
        rename = "request_timeout_ms",
        with = "crate::domains::utils::serde_duration_millis_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub request_timeout: Option<Duration>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            batch_size: default_batch_size(),
            encoding: ResponseEncoding::default(),
            message_field: default_message_field(),
            concurrency_limit: None,
            request_timeout: None,
        }
    }
}

impl Validatable for ProbeConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.target_url, "target_url", self.domain_name())?;
        validate_positive(self.batch_size, "batch_size", self.domain_name())?;
        validate_required_string(&self.message_field, "message_field", self.domain_name())?;

        if let Some(limit) = self.concurrency_limit {
            validate_positive(limit, "concurrency_limit", self.domain_name())?;
        }

        if let Some(timeout) = self.request_timeout {
            if timeout.is_zero() {
                return Err(self.validation_error("request_timeout_ms must be greater than 0"));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "probe"
    }
}

fn default_target_url() -> String {
    "http://localhost:5000/home".to_string()
}

fn default_batch_size() -> usize {
    100
}

fn default_message_field() -> String {
    "message".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_config_defaults() {
        let config = ProbeConfig::default();
        assert_eq!(config.target_url, "http://localhost:5000/home");
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.encoding, ResponseEncoding::Structured);
        assert_eq!(config.message_field, "message");
        assert!(config.concurrency_limit.is_none());
        assert!(config.request_timeout.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_probe_config_validation() {
        let mut config = ProbeConfig::default();
        config.batch_size = 0;
        assert!(config.validate().is_err());

        config = ProbeConfig::default();
        config.concurrency_limit = Some(0);
        assert!(config.validate().is_err());

        config = ProbeConfig::default();
        config.request_timeout = Some(Duration::ZERO);
        assert!(config.validate().is_err());

        config = ProbeConfig::default();
        config.target_url = "localhost:5000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_response_encoding_from_str() {
        assert_eq!("plain".parse::<ResponseEncoding>().unwrap(), ResponseEncoding::Plain);
        assert_eq!("JSON".parse::<ResponseEncoding>().unwrap(), ResponseEncoding::Structured);
        assert!("xml".parse::<ResponseEncoding>().is_err());
    }

    #[test]
    fn test_request_timeout_yaml() {
        let config: ProbeConfig = serde_yaml::from_str("request_timeout_ms: 1500\n").unwrap();
        assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(config.batch_size, 100);
    }
}
