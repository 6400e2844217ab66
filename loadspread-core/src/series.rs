//! Append-only load series built by a scaling run

use crate::error::{ProbeError, ProbeResult};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadPoint {
    pub servers: u32,
    pub average_load: f64,
}

/// Average load per server count, strictly increasing in server count
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LoadSeries {
    points: Vec<LoadPoint>,
}

impl LoadSeries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, servers: u32, average_load: f64) -> ProbeResult<()> {
        if let Some(last) = self.last() {
            if servers <= last.servers {
                return Err(ProbeError::SeriesOrder {
                    last: last.servers,
                    attempted: servers,
                });
            }
        }
        self.points.push(LoadPoint {
            servers,
            average_load,
        });
        Ok(())
    }

    pub fn points(&self) -> &[LoadPoint] {
        &self.points
    }

    pub fn last(&self) -> Option<&LoadPoint> {
        self.points.last()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn chart_points(&self) -> Vec<(u32, f64)> {
        self.points
            .iter()
            .map(|p| (p.servers, p.average_load))
            .collect()
    }
}
