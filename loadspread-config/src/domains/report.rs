//! Report artifact configuration

use crate::error::ConfigResult;
use crate::validation::{
    validate_positive, validate_required_string, validate_template,
    validate_template_references_any, validate_template_variables, Validatable,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Artifact format written by the reporting sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Rendered chart
    #[default]
    Svg,
    /// Pretty-printed chart data
    Json,
    /// One row per data point
    Csv,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Svg => "svg",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "svg" => Ok(ReportFormat::Svg),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(format!("Invalid report format: {}", s)),
        }
    }
}

/// Variables available when a single-measurement chart is delivered
pub const DISTRIBUTION_VARIABLES: &[&str] = &["directory", "extension", "timestamp", "requests"];

/// Variables available when a scaling round's chart is delivered
pub const SERIES_VARIABLES: &[&str] = &["directory", "extension", "timestamp", "servers", "round"];

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Directory substituted for `{{directory}}` in path templates
    #[serde(default = "default_directory")]
    pub directory: String,

    /// Destination of the single-measurement bar chart
    #[serde(default = "default_distribution_path")]
    pub distribution_path: String,

    /// Destination of the per-round scaling chart
    #[serde(default = "default_series_path")]
    pub series_path: String,

    /// Artifact format
    #[serde(default)]
    pub format: ReportFormat,

    /// Chart width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Chart height in pixels
    #[serde(default = "default_height")]
    pub height: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            distribution_path: default_distribution_path(),
            series_path: default_series_path(),
            format: ReportFormat::default(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Validatable for ReportConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.directory, "directory", self.domain_name())?;
        validate_template(&self.distribution_path, None, "distribution_path", self.domain_name())?;
        validate_template_variables(
            &self.distribution_path,
            DISTRIBUTION_VARIABLES,
            "distribution_path",
            self.domain_name(),
        )?;
        validate_template(&self.series_path, None, "series_path", self.domain_name())?;
        validate_template_variables(&self.series_path, SERIES_VARIABLES, "series_path", self.domain_name())?;
        // One file per round
        validate_template_references_any(
            &self.series_path,
            &["servers", "round"],
            "series_path",
            self.domain_name(),
        )?;
        validate_positive(self.width, "width", self.domain_name())?;
        validate_positive(self.height, "height", self.domain_name())?;
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "report"
    }
}

fn default_directory() -> String {
    "reports".to_string()
}

fn default_distribution_path() -> String {
    "{{directory}}/distribution.{{extension}}".to_string()
}

fn default_series_path() -> String {
    "{{directory}}/scaling_{{servers}}.{{extension}}".to_string()
}

fn default_width() -> u32 {
    800
}

fn default_height() -> u32 {
    600
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_config_defaults() {
        let config = ReportConfig::default();
        assert_eq!(config.directory, "reports");
        assert_eq!(config.format, ReportFormat::Svg);
        assert_eq!((config.width, config.height), (800, 600));
        assert!(config.series_path.contains("{{servers}}"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_report_config_validation() {
        let mut config = ReportConfig::default();
        config.width = 0;
        assert!(config.validate().is_err());

        config = ReportConfig::default();
        config.series_path = "{{servers".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_report_format_from_str() {
        assert_eq!("CSV".parse::<ReportFormat>().unwrap(), ReportFormat::Csv);
        assert!("png".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_series_path_must_vary_per_round() {
        let mut config = ReportConfig::default();
        config.series_path = "{{directory}}/curve.{{extension}}".to_string();
        let error = config.validate().unwrap_err();
        assert!(error.to_string().contains("series_path"));

        config.series_path = "{{directory}}/round_{{round}}.{{extension}}".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_paths_reject_unavailable_variables() {
        let mut config = ReportConfig::default();
        config.distribution_path = "{{directory}}/dist_{{servers}}.{{extension}}".to_string();
        assert!(config.validate().is_err());

        config.distribution_path = "{{directory}}/dist_{{requests}}_{{timestamp}}.{{extension}}".to_string();
        assert!(config.validate().is_ok());

        config.series_path = "{{directory}}/{{servers}}_{{requests}}.{{extension}}".to_string();
        assert!(config.validate().is_err());
    }
}
