//! Configuration validation traits and utilities

use crate::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration
pub trait Validatable {
    /// Validate the configuration
    fn validate(&self) -> ConfigResult<()>;

    /// Get the domain name for error reporting
    fn domain_name(&self) -> &'static str;

    /// Helper to create a domain-specific validation error
    fn validation_error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::DomainError {
            domain: self.domain_name().to_string(),
            message: message.into(),
        }
    }
}

/// Validate a required string field
pub fn validate_required_string(value: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} cannot be empty", field_name),
        });
    }
    Ok(())
}

/// Validate a positive number
pub fn validate_positive<T>(value: T, field_name: &str, domain: &str) -> ConfigResult<()>
where
    T: PartialOrd + Default + std::fmt::Display,
{
    if value <= T::default() {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must be greater than 0, got {}", field_name, value),
        });
    }
    Ok(())
}

/// Validate an http(s) URL
pub fn validate_url(url: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    validate_required_string(url, field_name, domain)?;

    let parsed = url::Url::parse(url).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} has invalid URL format: {}", field_name, e),
    })?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} scheme '{}' not supported (only http/https)", field_name, scheme),
        }),
    }
}

/// Validate a URL path segment such as `/add`
pub fn validate_path(path: &str, field_name: &str, domain: &str) -> ConfigResult<()> {
    if !path.starts_with('/') {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!("{} must start with '/', got '{}'", field_name, path),
        });
    }
    Ok(())
}

/// Validate that a handlebars template compiles and, optionally, references a variable
pub fn validate_template(
    template: &str,
    required_variable: Option<&str>,
    field_name: &str,
    domain: &str,
) -> ConfigResult<()> {
    validate_required_string(template, field_name, domain)?;

    handlebars::Template::compile(template).map_err(|e| ConfigError::DomainError {
        domain: domain.to_string(),
        message: format!("{} is not a valid template: {}", field_name, e),
    })?;

    if let Some(variable) = required_variable {
        let placeholder = format!("{{{{{}}}}}", variable);
        if !template.contains(&placeholder) {
            return Err(ConfigError::DomainError {
                domain: domain.to_string(),
                message: format!("{} must reference {}", field_name, placeholder),
            });
        }
    }

    Ok(())
}

/// Names referenced as `{{name}}` in a template
///
/// Block helpers and other non-variable expressions are returned verbatim so
/// callers can reject them.
pub fn template_variables(template: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else { break };
        let name = after[..end].trim_matches(|c: char| c == '~' || c.is_whitespace());
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
        rest = &after[end + 2..];
    }
    names
}

/// Validate that a template only references variables from `allowed`
pub fn validate_template_variables(
    template: &str,
    allowed: &[&str],
    field_name: &str,
    domain: &str,
) -> ConfigResult<()> {
    if let Some(unknown) = template_variables(template)
        .into_iter()
        .find(|name| !allowed.contains(&name.as_str()))
    {
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!(
                "{} references unknown variable '{}' (available: {})",
                field_name,
                unknown,
                allowed.join(", ")
            ),
        });
    }
    Ok(())
}

/// Validate that a template references at least one of `variables`
pub fn validate_template_references_any(
    template: &str,
    variables: &[&str],
    field_name: &str,
    domain: &str,
) -> ConfigResult<()> {
    let referenced = template_variables(template);
    if !variables.iter().any(|v| referenced.iter().any(|r| r == v)) {
        let placeholders: Vec<String> = variables.iter().map(|v| format!("{{{{{}}}}}", v)).collect();
        return Err(ConfigError::DomainError {
            domain: domain.to_string(),
            message: format!(
                "{} must reference one of {}",
                field_name,
                placeholders.join(", ")
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("http://localhost:5000/home", "target_url", "probe").is_ok());
        assert!(validate_url("https://lb.example.com", "target_url", "probe").is_ok());
        assert!(validate_url("", "target_url", "probe").is_err());
        assert!(validate_url("not-a-url", "target_url", "probe").is_err());
        assert!(validate_url("ftp://files.example.com", "target_url", "probe").is_err());
    }

    #[test]
    fn test_validate_template() {
        assert!(validate_template("S{{servers}}", Some("servers"), "hostname_template", "scaling").is_ok());
        assert!(validate_template("server", Some("servers"), "hostname_template", "scaling").is_err());
        assert!(validate_template("{{unclosed", None, "series_path", "report").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("/add", "add_path", "scaling").is_ok());
        assert!(validate_path("add", "add_path", "scaling").is_err());
    }

    #[test]
    fn test_template_variables() {
        assert_eq!(
            template_variables("{{directory}}/scaling_{{ servers }}.{{extension}}_{{servers}}"),
            vec!["directory", "servers", "extension"]
        );
        assert!(template_variables("plain/path.svg").is_empty());
    }

    #[test]
    fn test_validate_template_variables() {
        let allowed = ["directory", "extension"];
        assert!(validate_template_variables("{{directory}}/a.{{extension}}", &allowed, "path", "report").is_ok());
        assert!(validate_template_variables("{{directory}}/{{servers}}.svg", &allowed, "path", "report").is_err());
        assert!(validate_template_variables("{{#if directory}}x{{/if}}", &allowed, "path", "report").is_err());
    }

    #[test]
    fn test_validate_template_references_any() {
        let round_keys = ["servers", "round"];
        assert!(validate_template_references_any("r{{round}}.svg", &round_keys, "series_path", "report").is_ok());
        assert!(validate_template_references_any("{{servers}}.svg", &round_keys, "series_path", "report").is_ok());
        assert!(validate_template_references_any("curve.svg", &round_keys, "series_path", "report").is_err());
    }
}
