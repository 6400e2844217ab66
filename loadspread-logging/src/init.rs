use anyhow::Result;
use loadspread_config::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Longest body excerpt included in a log line
const PREVIEW_LIMIT: usize = 120;

/// Build an env filter from a level directive, falling back to `RUST_LOG` then `info`
pub fn build_env_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize logging from configuration
pub fn init_logging_from_config(config: &LoggingConfig) -> Result<()> {
    let env_filter = build_env_filter(config.level.as_str());
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_file(config.include_location)
        .with_line_number(config.include_location);

    // Use try_init to avoid panic if global subscriber already set
    let result = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Text => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Initialize simple tracing for basic console output
pub fn init_simple_tracing(log_level: &str) -> Result<()> {
    let env_filter = build_env_filter(log_level);

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already initialized, skipping");
    }

    Ok(())
}

/// Truncate a response body for inclusion in a log line
pub fn preview(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(PREVIEW_LIMIT) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_short_body_is_untouched() {
        assert_eq!(preview("  S3\n"), "S3");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let body = "é".repeat(PREVIEW_LIMIT + 10);
        let shown = preview(&body);
        assert_eq!(shown.chars().count(), PREVIEW_LIMIT + 1);
        assert!(shown.ends_with('…'));
    }
}
