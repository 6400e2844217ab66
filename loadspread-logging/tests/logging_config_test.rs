use loadspread_config::{LogFormat, LogLevel, LoggingConfig};
use loadspread_logging::{init_logging_from_config, init_simple_tracing};

#[test]
fn test_repeated_initialisation_is_harmless() {
    let config = LoggingConfig {
        level: LogLevel::Debug,
        format: LogFormat::Compact,
        include_location: true,
    };

    assert!(init_logging_from_config(&config).is_ok());
    // A second subscriber cannot be installed; this must not panic or error
    assert!(init_logging_from_config(&LoggingConfig::default()).is_ok());
    assert!(init_simple_tracing("warn").is_ok());

    tracing::info!(round = 1, servers = 2, "logging initialised");
}

#[test]
fn test_invalid_directive_falls_back() {
    let filter = loadspread_logging::build_env_filter("not a [valid directive");
    assert!(!filter.to_string().is_empty());
}
