//! Domain-specific configuration modules

pub mod http;
pub mod logging;
pub mod probe;
pub mod report;
pub mod scaling;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};

/// Main loadspread configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoadspreadConfig {
    /// Measurement target and fan-out settings
    #[serde(default)]
    pub probe: probe::ProbeConfig,

    /// Capacity control and scaling experiment settings
    #[serde(default)]
    pub scaling: scaling::ScalingConfig,

    /// Report artifact settings
    #[serde(default)]
    pub report: report::ReportConfig,

    /// HTTP client configuration
    #[serde(default)]
    pub http: http::HttpConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl LoadspreadConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.probe.validate()?;
        self.scaling.validate()?;
        self.report.validate()?;
        self.http.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Generate a sample configuration file
    pub fn generate_sample() -> String {
        let config = LoadspreadConfig::default();
        serde_yaml::to_string(&config)
            .unwrap_or_else(|_| "# Failed to generate sample config".to_string())
    }
}
