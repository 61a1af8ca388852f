//! End-of-run report and history export.

use std::path::Path;

use chrono::{DateTime, Utc};
use habitat_core::{Simulation, SimulationEndReason, SimulationResult};
use habitat_types::TickRecord;
use serde::Serialize;

use crate::error::EngineError;

/// Summary of one finished run, logged as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// When the run loop was entered.
    pub started_at: DateTime<Utc>,
    /// When the run loop returned.
    pub finished_at: DateTime<Utc>,
    /// Seed the run was configured with.
    pub seed: Option<u64>,
    /// Why the run ended.
    pub end_reason: SimulationEndReason,
    /// Ticks recorded.
    pub total_ticks: u64,
    /// Highest entity id issued.
    pub last_id: u64,
    /// Most humans alive after any tick.
    pub peak_humans: u32,
    /// Counts after the last recorded tick.
    pub final_record: Option<TickRecord>,
}

impl RunReport {
    /// Assemble the report for a finished run.
    pub fn new(
        simulation: &Simulation,
        result: &SimulationResult,
        peak_humans: u32,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            started_at,
            finished_at,
            seed: simulation.parameters().map(|p| p.seed),
            end_reason: result.end_reason,
            total_ticks: result.total_ticks,
            last_id: simulation.last_issued_id().0,
            peak_humans,
            final_record: result.final_record,
        }
    }

    /// Wall-clock duration of the run in milliseconds.
    pub fn elapsed_ms(&self) -> i64 {
        self.finished_at
            .signed_duration_since(self.started_at)
            .num_milliseconds()
    }

    /// The report as compact JSON.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Write the full per-tick history to `path` as a JSON array.
pub fn write_history(path: &Path, simulation: &Simulation) -> Result<(), EngineError> {
    std::fs::write(path, simulation.history_json()?)?;
    Ok(())
}
