//! Filesystem report sink

use async_trait::async_trait;
use loadspread_config::{ReportConfig, ReportFormat};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::fs;

use crate::{
    chart::Chart,
    destination::{ReportContext, ReportReceipt, ReportSink},
    errors::OutputError,
    template::TemplateEngine,
};

/// Configuration for the filesystem sink
#[derive(Debug, Clone)]
pub struct FilesystemSinkConfig {
    pub path_template: String,
    pub format: ReportFormat,
    pub width: u32,
    pub height: u32,
    pub create_dirs: bool,
    /// Variables merged under each delivery's context
    pub variables: HashMap<String, String>,
}

impl FilesystemSinkConfig {
    fn from_report(config: &ReportConfig, path_template: &str) -> Self {
        let mut variables = HashMap::new();
        variables.insert("directory".to_string(), config.directory.clone());

        Self {
            path_template: path_template.to_string(),
            format: config.format,
            width: config.width,
            height: config.height,
            create_dirs: true,
            variables,
        }
    }
}

/// Writes each chart to a file whose path is rendered from a template
#[derive(Debug)]
pub struct FilesystemSink {
    config: FilesystemSinkConfig,
    template_engine: TemplateEngine,
}

impl FilesystemSink {
    pub fn new(config: FilesystemSinkConfig) -> Self {
        Self {
            config,
            template_engine: TemplateEngine::new(),
        }
    }

    /// Sink for single-measurement bar charts
    pub fn distribution(config: &ReportConfig) -> Self {
        Self::new(FilesystemSinkConfig::from_report(config, &config.distribution_path))
    }

    /// Sink for per-round scaling charts
    pub fn series(config: &ReportConfig) -> Self {
        Self::new(FilesystemSinkConfig::from_report(config, &config.series_path))
    }

    pub fn config(&self) -> &FilesystemSinkConfig {
        &self.config
    }

    /// Resolve the destination for a delivery without writing anything
    pub fn resolve_path(&self, context: &ReportContext) -> Result<PathBuf, OutputError> {
        let mut variables = self.config.variables.clone();
        variables.insert("extension".to_string(), self.config.format.as_str().to_string());
        variables.extend(
            context
                .template_variables
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );

        let rendered = self
            .template_engine
            .render(&self.config.path_template, &variables)?;
        Self::validate_path(&rendered)?;
        Ok(PathBuf::from(rendered))
    }

    fn validate_path(path: &str) -> Result<(), OutputError> {
        if path.trim().is_empty() {
            return Err(OutputError::InvalidPath {
                path: path.to_string(),
                reason: "rendered path is empty".to_string(),
            });
        }
        if path.contains('\0') {
            return Err(OutputError::InvalidPath {
                path: path.to_string(),
                reason: "path contains null bytes".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ReportSink for FilesystemSink {
    async fn deliver(
        &self,
        chart: &Chart,
        context: &ReportContext,
    ) -> Result<ReportReceipt, OutputError> {
        let path = self.resolve_path(context)?;
        let display_path = path.to_string_lossy().to_string();

        let bytes = chart.encode(self.config.format, (self.config.width, self.config.height))?;

        if self.config.create_dirs {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .await
                    .map_err(|e| OutputError::Filesystem {
                        path: parent.to_string_lossy().to_string(),
                        operation: "create_dirs".to_string(),
                        error: e.to_string(),
                    })?;
            }
        }

        fs::write(&path, &bytes)
            .await
            .map_err(|e| OutputError::Filesystem {
                path: display_path.clone(),
                operation: "write".to_string(),
                error: e.to_string(),
            })?;

        tracing::info!(
            path = %display_path,
            format = %self.config.format,
            bytes = bytes.len(),
            "Report written"
        );

        Ok(ReportReceipt {
            path,
            size_bytes: bytes.len() as u64,
            format: self.config.format,
        })
    }
}
