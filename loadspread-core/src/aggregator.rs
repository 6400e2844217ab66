//! Attribution of responses to servers

use crate::error::{ProbeError, ProbeResult};
use crate::parser::{ResponseParser, ServerId};
use loadspread_logging::preview;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Requests handled per server identifier
///
/// Keys are whatever identifiers were observed. Iteration follows identifier
/// order, so repeated reports over the same table list servers identically.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FrequencyTable {
    counts: BTreeMap<ServerId, u64>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, id: ServerId) {
        *self.counts.entry(id).or_insert(0) += 1;
    }

    pub fn get(&self, id: &str) -> u64 {
        self.counts
            .get(&ServerId::new(id))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct servers observed
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ServerId, u64)> {
        self.counts.iter().map(|(id, count)| (id, *count))
    }

    pub fn merge(&mut self, other: FrequencyTable) {
        for (id, count) in other.counts {
            *self.counts.entry(id).or_insert(0) += count;
        }
    }

    /// Label/count pairs for a bar chart
    pub fn to_bars(&self) -> Vec<(String, u64)> {
        self.iter().map(|(id, count)| (id.to_string(), count)).collect()
    }
}

/// Summary statistics over a non-empty frequency table
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadStats {
    pub distinct: usize,
    pub total: u64,
    /// Average load per distinct server
    pub mean: f64,
    pub min: u64,
    pub max: u64,
    /// Population standard deviation of the counts
    pub std_dev: f64,
    /// Busiest server relative to the mean; 1.0 is a perfect spread
    pub imbalance: f64,
}

impl LoadStats {
    pub fn from_table(table: &FrequencyTable) -> Option<Self> {
        if table.is_empty() {
            return None;
        }

        let distinct = table.len();
        let total = table.total();
        let mean = total as f64 / distinct as f64;
        let min = table.iter().map(|(_, c)| c).min().unwrap_or(0);
        let max = table.iter().map(|(_, c)| c).max().unwrap_or(0);
        let variance = table
            .iter()
            .map(|(_, c)| {
                let delta = c as f64 - mean;
                delta * delta
            })
            .sum::<f64>()
            / distinct as f64;

        Some(Self {
            distinct,
            total,
            mean,
            min,
            max,
            std_dev: variance.sqrt(),
            imbalance: if mean > 0.0 { max as f64 / mean } else { 0.0 },
        })
    }
}

/// Explicit fold state for one round's outcomes
#[derive(Debug, Clone, Default)]
pub struct AttributionAccumulator {
    table: FrequencyTable,
    failed: usize,
    unparsed: usize,
}

impl AttributionAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a whole batch into a fresh accumulator
    pub fn from_outcomes<I>(outcomes: I, parser: &ResponseParser) -> Self
    where
        I: IntoIterator<Item = ProbeResult<String>>,
    {
        outcomes.into_iter().fold(Self::new(), |mut acc, outcome| {
            acc.absorb(outcome, parser);
            acc
        })
    }

    pub fn absorb(&mut self, outcome: ProbeResult<String>, parser: &ResponseParser) {
        match outcome {
            Ok(body) => match parser.parse(&body) {
                Ok(id) => self.table.record(id),
                Err(error) => {
                    warn!(body = %preview(&body), %error, "Unattributable response");
                    self.unparsed += 1;
                }
            },
            Err(error) => {
                debug!(%error, "Request excluded from attribution");
                self.failed += 1;
            }
        }
    }

    pub fn merge(mut self, other: AttributionAccumulator) -> Self {
        self.table.merge(other.table);
        self.failed += other.failed;
        self.unparsed += other.unparsed;
        self
    }

    pub fn attempted(&self) -> usize {
        self.table.total() as usize + self.failed + self.unparsed
    }

    /// Close the round; zero attributed responses is an error
    pub fn finish(self) -> ProbeResult<AttributionReport> {
        let attempted = self.attempted();
        match LoadStats::from_table(&self.table) {
            Some(stats) => Ok(AttributionReport {
                table: self.table,
                stats,
                failed: self.failed,
                unparsed: self.unparsed,
            }),
            None => Err(ProbeError::EmptyResultSet {
                attempted,
                failed: self.failed,
                unparsed: self.unparsed,
            }),
        }
    }
}

/// Result of attributing one round
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttributionReport {
    pub table: FrequencyTable,
    pub stats: LoadStats,
    pub failed: usize,
    pub unparsed: usize,
}

impl AttributionReport {
    pub fn attributed(&self) -> u64 {
        self.table.total()
    }
}
