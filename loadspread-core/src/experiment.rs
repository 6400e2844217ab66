//! Scaling experiment driver

use crate::capacity::{CapacityCommand, CapacityController};
use crate::error::{ProbeError, ProbeResult};
use crate::measurement::RoundRunner;
use crate::series::LoadSeries;
use loadspread_config::{ProbeConfig, ScalingConfig};
use loadspread_http::HttpClient;
use loadspread_output::{Chart, ReportContext, ReportSink, TemplateEngine};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use thiserror::Error;
use tracing::{error, info};

/// Server counts to visit and how to name the unit added for each
#[derive(Debug, Clone)]
pub struct ScalingPlan {
    min_servers: u32,
    max_servers: u32,
    requests: usize,
    hostname_template: String,
    templates: TemplateEngine,
}

impl ScalingPlan {
    pub fn new(
        min_servers: u32,
        max_servers: u32,
        requests: usize,
        hostname_template: impl Into<String>,
    ) -> ProbeResult<Self> {
        if min_servers == 0 || min_servers > max_servers {
            return Err(ProbeError::InvalidPlan(format!(
                "server range {}..={} is empty or starts at zero",
                min_servers, max_servers
            )));
        }
        if requests == 0 {
            return Err(ProbeError::InvalidPlan("requests per round must be positive".to_string()));
        }

        let plan = Self {
            min_servers,
            max_servers,
            requests,
            hostname_template: hostname_template.into(),
            templates: TemplateEngine::new(),
        };
        plan.templates
            .validate(&plan.hostname_template)
            .map_err(|e| ProbeError::InvalidPlan(e.to_string()))?;
        Ok(plan)
    }

    /// Plan from the scaling settings; the batch size falls back to the probe's
    pub fn from_config(scaling: &ScalingConfig, probe: &ProbeConfig) -> ProbeResult<Self> {
        Self::new(
            scaling.min_servers,
            scaling.max_servers,
            scaling.batch_size.unwrap_or(probe.batch_size),
            scaling.hostname_template.clone(),
        )
    }

    pub fn rounds(&self) -> RangeInclusive<u32> {
        self.min_servers..=self.max_servers
    }

    pub fn requests(&self) -> usize {
        self.requests
    }

    pub fn hostname_for(&self, servers: u32) -> ProbeResult<String> {
        let mut variables = HashMap::new();
        variables.insert("servers".to_string(), servers.to_string());
        self.templates
            .render(&self.hostname_template, &variables)
            .map_err(|e| ProbeError::InvalidPlan(e.to_string()))
    }
}

/// A scaling run that stopped early, with everything measured before it
#[derive(Debug, Error)]
#[error("Scaling run aborted in round {round} ({servers} servers): {source}")]
pub struct ExperimentError {
    pub round: usize,
    pub servers: u32,
    #[source]
    pub source: ProbeError,
    pub partial: LoadSeries,
}

/// Grows the pool one server per round and records the average load
pub struct ScalingExperiment<C: HttpClient + ?Sized> {
    controller: CapacityController<C>,
    runner: RoundRunner<C>,
    target_url: String,
    plan: ScalingPlan,
    sink: Box<dyn ReportSink>,
}

impl<C: HttpClient + ?Sized + 'static> ScalingExperiment<C> {
    pub fn new(
        controller: CapacityController<C>,
        runner: RoundRunner<C>,
        target_url: impl Into<String>,
        plan: ScalingPlan,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            controller,
            runner,
            target_url: target_url.into(),
            plan,
            sink,
        }
    }

    pub fn plan(&self) -> &ScalingPlan {
        &self.plan
    }

    /// Run every round in order, stopping at the first fatal failure
    ///
    /// Capacity added in earlier rounds is left in place on failure.
    pub async fn run(&self) -> Result<LoadSeries, ExperimentError> {
        let mut series = LoadSeries::new();

        for (index, servers) in self.plan.rounds().enumerate() {
            let round = index + 1;
            if let Err(source) = self.run_round(round, servers, &mut series).await {
                error!(round, servers, error = %source, completed = series.len(), "Scaling run aborted");
                return Err(ExperimentError {
                    round,
                    servers,
                    source,
                    partial: series,
                });
            }
        }

        info!(rounds = series.len(), "Scaling run complete");
        Ok(series)
    }

    async fn run_round(&self, round: usize, servers: u32, series: &mut LoadSeries) -> ProbeResult<()> {
        let hostname = self.plan.hostname_for(servers)?;
        info!(round, servers, hostname = %hostname, "Growing capacity");
        self.controller
            .add_servers(&CapacityCommand::single(hostname))
            .await?;

        let result = self.runner.run(&self.target_url, self.plan.requests).await?;
        let stats = result.stats();
        series.push(servers, stats.mean)?;
        info!(
            round,
            servers,
            observed = stats.distinct,
            attributed = stats.total,
            failed = result.report.failed,
            unparsed = result.report.unparsed,
            average_load = stats.mean,
            "Round measured"
        );

        let chart = Chart::load_curve(
            format!("Average Server Load for N = {}", servers),
            series.chart_points(),
        );
        let context = ReportContext::new()
            .with_variable("servers", servers)
            .with_variable("round", round);
        self.sink.deliver(&chart, &context).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_hostnames() {
        let plan = ScalingPlan::new(2, 6, 100, "S{{servers}}").unwrap();
        assert_eq!(plan.rounds().collect::<Vec<_>>(), vec![2, 3, 4, 5, 6]);
        assert_eq!(plan.hostname_for(5).unwrap(), "S5");

        let plan = ScalingPlan::new(1, 1, 10, "worker-{{servers}}.pool").unwrap();
        assert_eq!(plan.hostname_for(1).unwrap(), "worker-1.pool");
    }

    #[test]
    fn test_invalid_plans() {
        assert!(ScalingPlan::new(0, 3, 100, "S{{servers}}").is_err());
        assert!(ScalingPlan::new(4, 3, 100, "S{{servers}}").is_err());
        assert!(ScalingPlan::new(2, 3, 0, "S{{servers}}").is_err());
        assert!(ScalingPlan::new(2, 3, 100, "S{{servers").is_err());
    }

    #[test]
    fn test_plan_from_config_falls_back_to_probe_batch() {
        let probe = ProbeConfig {
            batch_size: 40,
            ..ProbeConfig::default()
        };
        let mut scaling = ScalingConfig::default();
        assert_eq!(ScalingPlan::from_config(&scaling, &probe).unwrap().requests(), 40);

        scaling.batch_size = Some(7);
        assert_eq!(ScalingPlan::from_config(&scaling, &probe).unwrap().requests(), 7);
    }
}
