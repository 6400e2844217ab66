//! Measurement rounds and single-measurement mode

use crate::aggregator::{AttributionAccumulator, AttributionReport, LoadStats};
use crate::error::{ProbeError, ProbeResult};
use crate::fanout::FanoutEngine;
use crate::parser::ResponseParser;
use loadspread_config::ProbeConfig;
use loadspread_http::HttpClient;
use loadspread_output::{Chart, ReportContext, ReportReceipt, ReportSink};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const DISTRIBUTION_TITLE: &str = "Load Distribution Among Servers";

/// Outcome of one fan-out plus attribution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundResult {
    pub requested: usize,
    pub report: AttributionReport,
    #[serde(with = "millis")]
    pub elapsed: Duration,
}

impl RoundResult {
    pub fn stats(&self) -> &LoadStats {
        &self.report.stats
    }
}

/// Fans out one batch and attributes the responses
pub struct RoundRunner<C: HttpClient + ?Sized> {
    engine: FanoutEngine<C>,
    parser: ResponseParser,
}

impl<C: HttpClient + ?Sized + 'static> RoundRunner<C> {
    pub fn new(engine: FanoutEngine<C>, parser: ResponseParser) -> Self {
        Self { engine, parser }
    }

    /// Engine and parser as described by the probe settings
    ///
    /// `fallback_timeout` bounds each request when the probe has no timeout of
    /// its own.
    pub fn from_config(client: Arc<C>, config: &ProbeConfig, fallback_timeout: Duration) -> Self {
        let timeout = config.request_timeout.unwrap_or(fallback_timeout);
        let engine =
            FanoutEngine::new(client, timeout).with_concurrency_limit(config.concurrency_limit);
        Self::new(engine, ResponseParser::from_config(config))
    }

    pub async fn run(&self, url: &str, requests: usize) -> ProbeResult<RoundResult> {
        let batch = self.engine.run_batch(url, requests).await;
        let elapsed = batch.elapsed;

        let report = AttributionAccumulator::from_outcomes(batch.outcomes, &self.parser)
            .finish()
            .map_err(|error| {
                if let ProbeError::EmptyResultSet {
                    failed, unparsed, ..
                } = &error
                {
                    warn!(url, requests, failed, unparsed, "Round attributed no responses");
                }
                error
            })?;

        Ok(RoundResult {
            requested: requests,
            report,
            elapsed,
        })
    }
}

/// Result of a single measurement
#[derive(Debug, Clone, Serialize)]
pub struct MeasurementSummary {
    pub target: String,
    pub round: RoundResult,
    #[serde(skip)]
    pub receipt: Option<ReportReceipt>,
}

/// One round against a target, charted as a bar chart
pub struct Measurement<C: HttpClient + ?Sized> {
    runner: RoundRunner<C>,
    target_url: String,
    requests: usize,
    sink: Box<dyn ReportSink>,
}

impl<C: HttpClient + ?Sized + 'static> Measurement<C> {
    pub fn new(
        runner: RoundRunner<C>,
        target_url: impl Into<String>,
        requests: usize,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            runner,
            target_url: target_url.into(),
            requests,
            sink,
        }
    }

    /// Fan out and attribute without touching the sink
    pub async fn measure(&self) -> ProbeResult<MeasurementSummary> {
        let round = self.runner.run(&self.target_url, self.requests).await?;
        let stats = round.stats();

        for (id, count) in round.report.table.iter() {
            info!(identifier = %id, count, "Requests handled");
        }
        info!(
            target = %self.target_url,
            requests = self.requests,
            servers = stats.distinct,
            attributed = stats.total,
            failed = round.report.failed,
            unparsed = round.report.unparsed,
            mean = stats.mean,
            std_dev = stats.std_dev,
            imbalance = stats.imbalance,
            elapsed_ms = round.elapsed.as_millis() as u64,
            "Measurement complete"
        );

        Ok(MeasurementSummary {
            target: self.target_url.clone(),
            round,
            receipt: None,
        })
    }

    /// Chart a measured distribution
    pub async fn report(&self, summary: &MeasurementSummary) -> ProbeResult<ReportReceipt> {
        let chart = Chart::distribution(DISTRIBUTION_TITLE, summary.round.report.table.to_bars());
        let context = ReportContext::new().with_variable("requests", summary.round.requested);
        Ok(self.sink.deliver(&chart, &context).await?)
    }

    /// Measure, then chart the result
    pub async fn run(&self) -> ProbeResult<MeasurementSummary> {
        let mut summary = self.measure().await?;
        summary.receipt = Some(self.report(&summary).await?);
        Ok(summary)
    }
}

mod millis {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(duration.as_millis() as u64)
    }
}
