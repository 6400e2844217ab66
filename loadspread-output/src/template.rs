//! Template engine for report destination paths

use crate::errors::OutputError;
use handlebars::Handlebars;
use serde_json::Value;
use std::collections::HashMap;

/// Template engine for variable substitution using Handlebars
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    handlebars: Handlebars<'static>,
}

impl TemplateEngine {
    pub fn new() -> Self {
        let mut handlebars = Handlebars::new();
        handlebars.set_strict_mode(true); // Error on missing variables
        // Paths are not HTML
        handlebars.register_escape_fn(handlebars::no_escape);

        Self { handlebars }
    }

    /// Render a template with the given variables
    pub fn render(
        &self,
        template: &str,
        variables: &HashMap<String, String>,
    ) -> Result<String, OutputError> {
        let json_vars: Value = variables
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect::<serde_json::Map<_, _>>()
            .into();

        self.handlebars
            .render_template(template, &json_vars)
            .map_err(|e| OutputError::TemplateRender {
                template: template.to_string(),
                error: e.to_string(),
            })
    }

    /// Validate that a template is syntactically correct
    pub fn validate(&self, template: &str) -> Result<(), OutputError> {
        handlebars::Template::compile(template)
            .map(|_| ())
            .map_err(|e| OutputError::TemplateRender {
                template: template.to_string(),
                error: format!("Invalid template syntax: {}", e),
            })
    }
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_rendering() {
        let engine = TemplateEngine::new();
        let mut vars = HashMap::new();
        vars.insert("directory".to_string(), "/images".to_string());
        vars.insert("servers".to_string(), "4".to_string());
        vars.insert("extension".to_string(), "svg".to_string());

        let result = engine
            .render("{{directory}}/A2_{{servers}}.{{extension}}", &vars)
            .unwrap();

        assert_eq!(result, "/images/A2_4.svg");
    }

    #[test]
    fn test_paths_are_not_html_escaped() {
        let engine = TemplateEngine::new();
        let mut vars = HashMap::new();
        vars.insert("directory".to_string(), "out/a&b".to_string());

        assert_eq!(engine.render("{{directory}}/x", &vars).unwrap(), "out/a&b/x");
    }

    #[test]
    fn test_missing_variable() {
        let engine = TemplateEngine::new();
        let template = "/results/{{round}}.svg";
        let result = engine.render(template, &HashMap::new());

        match result {
            Err(OutputError::TemplateRender { template: t, .. }) => assert_eq!(t, template),
            other => panic!("Expected TemplateRender error, got {:?}", other),
        }
    }

    #[test]
    fn test_template_validation() {
        let engine = TemplateEngine::new();
        assert!(engine.validate("{{directory}}/{{servers}}.svg").is_ok());
        assert!(engine.validate("no variables").is_ok());
        assert!(engine.validate("{{unmatched").is_err());
    }
}
