//! Report sink trait and delivery types

use crate::{chart::Chart, errors::OutputError};
use async_trait::async_trait;
use loadspread_config::ReportFormat;
use std::collections::HashMap;
use std::path::PathBuf;

/// A place charts can be delivered to
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Persist one chart, overwriting any earlier artifact at the same destination
    async fn deliver(
        &self,
        chart: &Chart,
        context: &ReportContext,
    ) -> Result<ReportReceipt, OutputError>;
}

/// Variables available to destination path templates
#[derive(Debug, Clone)]
pub struct ReportContext {
    pub template_variables: HashMap<String, String>,
}

impl ReportContext {
    /// Context seeded with a `timestamp` variable
    pub fn new() -> Self {
        let mut template_variables = HashMap::new();
        template_variables.insert(
            "timestamp".to_string(),
            chrono::Utc::now().format("%Y%m%dT%H%M%SZ").to_string(),
        );
        Self { template_variables }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.template_variables.insert(key.into(), value.to_string());
        self
    }
}

impl Default for ReportContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome of a successful delivery
#[derive(Debug, Clone, PartialEq)]
pub struct ReportReceipt {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub format: ReportFormat,
}
