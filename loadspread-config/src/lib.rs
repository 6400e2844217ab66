//! Domain-driven configuration management for loadspread
//!
//! Configuration is split by functional domain (probe, scaling, report,
//! http, logging), each with its own defaults and validation, and can be
//! loaded from YAML with environment variable overrides.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    http::HttpConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    probe::{ProbeConfig, ResponseEncoding},
    report::{ReportConfig, ReportFormat},
    scaling::ScalingConfig,
    LoadspreadConfig,
};

// Re-export utilities
pub use domains::utils::{serde_duration, serde_duration_millis_option};
