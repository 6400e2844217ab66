//! Configuration loading and environment variable handling

use crate::domains::LoadspreadConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "LOADSPREAD".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<LoadspreadConfig> {
        let content = std::fs::read_to_string(path)?;
        let mut config: LoadspreadConfig = if content.trim().is_empty() {
            LoadspreadConfig::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<LoadspreadConfig> {
        let mut config = LoadspreadConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut LoadspreadConfig) -> ConfigResult<()> {
        self.apply_probe_overrides(&mut config.probe)?;
        self.apply_scaling_overrides(&mut config.scaling)?;
        self.apply_report_overrides(&mut config.report)?;
        self.apply_http_overrides(&mut config.http)?;
        self.apply_logging_overrides(&mut config.logging)?;
        Ok(())
    }

    fn apply_probe_overrides(
        &self,
        config: &mut crate::domains::probe::ProbeConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("TARGET_URL") {
            config.target_url = url;
        }

        if let Some(batch_size) = self.parse_env_var::<usize>("BATCH_SIZE")? {
            config.batch_size = batch_size;
        }

        if let Ok(encoding) = self.get_env_var("ENCODING") {
            config.encoding = crate::domains::probe::ResponseEncoding::from_str(&encoding)
                .map_err(ConfigError::EnvError)?;
        }

        if let Some(limit) = self.parse_env_var::<usize>("CONCURRENCY_LIMIT")? {
            config.concurrency_limit = Some(limit);
        }

        if let Some(millis) = self.parse_env_var::<u64>("REQUEST_TIMEOUT")? {
            config.request_timeout = Some(Duration::from_millis(millis));
        }

        Ok(())
    }

    fn apply_scaling_overrides(
        &self,
        config: &mut crate::domains::scaling::ScalingConfig,
    ) -> ConfigResult<()> {
        if let Ok(url) = self.get_env_var("CONTROL_URL") {
            config.control_url = url;
        }

        if let Some(min) = self.parse_env_var::<u32>("MIN_SERVERS")? {
            config.min_servers = min;
        }

        if let Some(max) = self.parse_env_var::<u32>("MAX_SERVERS")? {
            config.max_servers = max;
        }

        Ok(())
    }

    fn apply_report_overrides(
        &self,
        config: &mut crate::domains::report::ReportConfig,
    ) -> ConfigResult<()> {
        if let Ok(directory) = self.get_env_var("REPORT_DIR") {
            config.directory = directory;
        }

        Ok(())
    }

    fn apply_http_overrides(
        &self,
        config: &mut crate::domains::http::HttpConfig,
    ) -> ConfigResult<()> {
        if let Some(seconds) = self.parse_env_var::<u64>("HTTP_TIMEOUT")? {
            config.timeout = Duration::from_secs(seconds);
        }

        if let Ok(user_agent) = self.get_env_var("HTTP_USER_AGENT") {
            config.user_agent = user_agent;
        }

        Ok(())
    }

    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        Ok(())
    }

    /// Parse an optional prefixed environment variable
    fn parse_env_var<T>(&self, name: &str) -> ConfigResult<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get_env_var(name) {
            Ok(raw) => raw
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::EnvError(format!("Invalid {}: {}", name, e))),
            Err(_) => Ok(None),
        }
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
