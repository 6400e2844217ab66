//! Terminal rendering for command results

use colored::Colorize;
use loadspread_core::{ExperimentError, LoadSeries, MeasurementSummary, ReplicaStatus};

pub fn format_distribution(summary: &MeasurementSummary) -> String {
    let report = &summary.round.report;
    let stats = &report.stats;

    let mut lines = vec![format!(
        "{} {} ({} requests, {:.2?})",
        "Load distribution for".bold(),
        summary.target,
        summary.round.requested,
        summary.round.elapsed
    )];
    for (id, count) in report.table.iter() {
        let share = count as f64 * 100.0 / stats.total as f64;
        lines.push(format!("  {:<12} {:>8} {:>6.1}%", id.to_string().cyan(), count, share));
    }
    lines.push(format!(
        "  servers: {}  mean: {:.2}  std dev: {:.2}  imbalance: {:.2}",
        stats.distinct, stats.mean, stats.std_dev, stats.imbalance
    ));
    if report.failed > 0 || report.unparsed > 0 {
        lines.push(format!(
            "  {}",
            format!("failed: {}  unparsed: {}", report.failed, report.unparsed).yellow()
        ));
    }
    lines.join("\n")
}

/// Breakdown shown when no reply in a round named a server
pub fn format_empty_round(attempted: usize, failed: usize, unparsed: usize) -> String {
    [
        "No response could be attributed to a server".red().bold().to_string(),
        format!("  attempted: {}", attempted),
        format!("  failed:    {}", failed),
        format!("  unparsed:  {}", unparsed),
    ]
    .join("\n")
}

pub fn format_series(series: &LoadSeries) -> String {
    let mut lines = vec![format!("  {:>8} {:>14}", "servers", "average load")];
    for point in series.points() {
        lines.push(format!("  {:>8} {:>14.2}", point.servers, point.average_load));
    }
    lines.join("\n")
}

/// Where a scaling run stopped and what it measured before that
pub fn format_aborted_run(error: &ExperimentError) -> String {
    let header = format!(
        "Scaling run stopped in round {} ({} servers)",
        error.round, error.servers
    )
    .red()
    .bold()
    .to_string();
    let body = if error.partial.is_empty() {
        "  no rounds completed".to_string()
    } else {
        format_series(&error.partial)
    };
    format!("{}\n{}", header, body)
}

pub fn format_replicas(status: &ReplicaStatus) -> String {
    let mut lines = vec![format!("{} {}", "Replicas:".bold(), status.count)];
    lines.extend(status.replicas.iter().map(|replica| format!("  - {}", replica)));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use loadspread_core::{
        AttributionReport, FrequencyTable, LoadStats, ProbeError, RoundResult, ServerId,
    };
    use std::time::Duration;

    fn stopped_at(round: usize, servers: u32, partial: LoadSeries) -> ExperimentError {
        ExperimentError {
            round,
            servers,
            source: ProbeError::control_failed(&["S3".to_string()], "HTTP 503: unavailable"),
            partial,
        }
    }

    #[test]
    fn test_empty_round_lists_every_count() {
        let text = format_empty_round(100, 97, 3);
        assert!(text.contains("No response could be attributed to a server"));
        assert!(text.contains("attempted: 100"));
        assert!(text.contains("failed:    97"));
        assert!(text.contains("unparsed:  3"));
    }

    #[test]
    fn test_aborted_run_before_any_round() {
        let text = format_aborted_run(&stopped_at(1, 2, LoadSeries::new()));
        assert!(text.contains("Scaling run stopped in round 1 (2 servers)"));
        assert!(text.contains("no rounds completed"));
        assert!(!text.contains("average load"));
    }

    #[test]
    fn test_aborted_run_keeps_partial_series() {
        let mut partial = LoadSeries::new();
        partial.push(2, 5000.0).unwrap();
        partial.push(3, 3333.33).unwrap();

        let text = format_aborted_run(&stopped_at(3, 4, partial));
        assert!(text.contains("Scaling run stopped in round 3 (4 servers)"));
        assert!(!text.contains("no rounds completed"));
        assert!(text.contains("average load"));
        assert!(text.contains("5000.00"));
        assert!(text.contains("3333.33"));
    }

    #[test]
    fn test_distribution_shares_and_failures() {
        let mut table = FrequencyTable::new();
        for id in ["S1", "S1", "S1", "S2"] {
            table.record(ServerId::new(id));
        }
        let stats = LoadStats::from_table(&table).unwrap();
        let summary = MeasurementSummary {
            target: "http://localhost:8080/home".to_string(),
            round: RoundResult {
                requested: 6,
                report: AttributionReport {
                    table,
                    stats,
                    failed: 1,
                    unparsed: 1,
                },
                elapsed: Duration::from_millis(40),
            },
            receipt: None,
        };

        let text = format_distribution(&summary);
        assert!(text.contains("http://localhost:8080/home"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("25.0%"));
        assert!(text.contains("servers: 2"));
        assert!(text.contains("failed: 1  unparsed: 1"));
    }

    #[test]
    fn test_replicas_one_per_line() {
        let status = ReplicaStatus {
            count: 2,
            replicas: vec!["alpha".to_string(), "beta".to_string()],
        };
        let text = format_replicas(&status);
        assert!(text.contains("  - alpha\n  - beta"));
    }
}
