//! Capacity control and scaling experiment configuration

use crate::error::ConfigResult;
use crate::validation::{validate_path, validate_positive, validate_template, validate_url, Validatable};
use serde::{Deserialize, Serialize};

/// Scaling experiment configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingConfig {
    /// Base URL of the balancer's management API
    #[serde(default = "default_control_url")]
    pub control_url: String,

    /// Path accepting add-capacity commands
    #[serde(default = "default_add_path")]
    pub add_path: String,

    /// Path accepting remove-capacity commands
    #[serde(default = "default_remove_path")]
    pub remove_path: String,

    /// Path reporting the current replica set
    #[serde(default = "default_replicas_path")]
    pub replicas_path: String,

    /// Server count of the first round
    #[serde(default = "default_min_servers")]
    pub min_servers: u32,

    /// Server count of the last round
    #[serde(default = "default_max_servers")]
    pub max_servers: u32,

    /// Hostname given to the unit added before each round
    #[serde(default = "default_hostname_template")]
    pub hostname_template: String,

    /// Requests per round; unset falls back to `probe.batch_size`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<usize>,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            control_url: default_control_url(),
            add_path: default_add_path(),
            remove_path: default_remove_path(),
            replicas_path: default_replicas_path(),
            min_servers: default_min_servers(),
            max_servers: default_max_servers(),
            hostname_template: default_hostname_template(),
            batch_size: None,
        }
    }
}

impl Validatable for ScalingConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_url(&self.control_url, "control_url", self.domain_name())?;
        validate_path(&self.add_path, "add_path", self.domain_name())?;
        validate_path(&self.remove_path, "remove_path", self.domain_name())?;
        validate_path(&self.replicas_path, "replicas_path", self.domain_name())?;
        validate_positive(self.min_servers, "min_servers", self.domain_name())?;

        if self.min_servers > self.max_servers {
            return Err(self.validation_error(format!(
                "min_servers ({}) cannot exceed max_servers ({})",
                self.min_servers, self.max_servers
            )));
        }

        validate_template(
            &self.hostname_template,
            Some("servers"),
            "hostname_template",
            self.domain_name(),
        )?;

        if let Some(batch_size) = self.batch_size {
            validate_positive(batch_size, "batch_size", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scaling"
    }
}

fn default_control_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_add_path() -> String {
    "/add".to_string()
}

fn default_remove_path() -> String {
    "/rm".to_string()
}

fn default_replicas_path() -> String {
    "/rep".to_string()
}

fn default_min_servers() -> u32 {
    2
}

fn default_max_servers() -> u32 {
    6
}

fn default_hostname_template() -> String {
    "S{{servers}}".to_string()
}
