//! Load distribution measurement for loadspread
//!
//! A round fans a batch of GET requests out against a load-balanced
//! endpoint, attributes every response to the backend that served it, and
//! summarises how evenly the work was spread. The scaling experiment grows
//! the backend pool one server at a time through the balancer's management
//! API and records the average load per server after each step.

pub mod aggregator;
pub mod capacity;
pub mod error;
pub mod experiment;
pub mod fanout;
pub mod measurement;
pub mod parser;
pub mod series;

pub use aggregator::{AttributionAccumulator, AttributionReport, FrequencyTable, LoadStats};
pub use capacity::{CapacityCommand, CapacityController, ReplicaStatus};
pub use error::{FailureKind, ProbeError, ProbeResult};
pub use experiment::{ExperimentError, ScalingExperiment, ScalingPlan};
pub use fanout::{BatchOutcome, FanoutEngine, DEFAULT_MAX_IN_FLIGHT};
pub use measurement::{Measurement, MeasurementSummary, RoundResult, RoundRunner};
pub use parser::{ResponseParser, ServerId};
pub use series::{LoadPoint, LoadSeries};
