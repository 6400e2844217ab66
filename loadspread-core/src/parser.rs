//! Server identifier extraction from response bodies

use crate::error::{ProbeError, ProbeResult};
use loadspread_config::{ProbeConfig, ResponseEncoding};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

const DELIMITER: &str = ": ";

/// Name of the backend that served a request
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pure body-to-identifier parser for one response encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseParser {
    encoding: ResponseEncoding,
    message_field: String,
}

impl ResponseParser {
    pub fn new(encoding: ResponseEncoding, message_field: impl Into<String>) -> Self {
        Self {
            encoding,
            message_field: message_field.into(),
        }
    }

    pub fn from_config(config: &ProbeConfig) -> Self {
        Self::new(config.encoding, config.message_field.clone())
    }

    pub fn encoding(&self) -> ResponseEncoding {
        self.encoding
    }

    pub fn parse(&self, body: &str) -> ProbeResult<ServerId> {
        match self.encoding {
            ResponseEncoding::Plain => Self::parse_plain(body),
            ResponseEncoding::Structured => self.parse_structured(body),
        }
    }

    fn parse_plain(body: &str) -> ProbeResult<ServerId> {
        let id = body.trim();
        if id.is_empty() {
            return Err(ProbeError::malformed("empty body"));
        }
        Ok(ServerId::new(id))
    }

    fn parse_structured(&self, body: &str) -> ProbeResult<ServerId> {
        let record: Value = serde_json::from_str(body)
            .map_err(|e| ProbeError::malformed(format!("body is not JSON: {}", e)))?;

        let message = record
            .get(&self.message_field)
            .ok_or_else(|| ProbeError::malformed(format!("field '{}' is missing", self.message_field)))?
            .as_str()
            .ok_or_else(|| {
                ProbeError::malformed(format!("field '{}' is not a string", self.message_field))
            })?;

        let (_, id) = message
            .rsplit_once(DELIMITER)
            .ok_or_else(|| ProbeError::malformed(format!("no '{}' in message {:?}", DELIMITER, message)))?;

        let id = id.trim();
        if id.is_empty() {
            return Err(ProbeError::malformed(format!(
                "nothing follows the last '{}' in message {:?}",
                DELIMITER, message
            )));
        }

        Ok(ServerId::new(id))
    }
}

impl Default for ResponseParser {
    fn default() -> Self {
        Self::from_config(&ProbeConfig::default())
    }
}
