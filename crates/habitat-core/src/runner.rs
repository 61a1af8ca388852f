//! Simulation loop runner.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives [`Simulation::step`] with support for:
//!
//! - **Bounded simulation**: stop when the tick limit is reached
//! - **Extinction**: stop once nothing is alive and nothing can spawn
//! - **Tick pacing**: real-time pause between ticks
//! - **Clean shutdown**: every agent task is joined before returning

use std::time::Duration;

use habitat_types::TickRecord;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::SimulationError;
use crate::simulation::{Simulation, SimulationPhase};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The simulation could not be started.
    #[error("simulation error: {source}")]
    Simulation {
        /// The underlying simulation error.
        #[from]
        source: SimulationError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// The tick counter reached the configured limit.
    MaxTicksReached,
    /// No agent or vegetable is alive and spawning is disabled.
    Extinction,
    /// The simulation was already stopped when the run began.
    Stopped,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick record, if any tick completed.
    pub final_record: Option<TickRecord>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to feed a renderer or a statistics sink.
/// The callback receives the tick record and read access to the
/// simulation.
pub trait TickCallback: Send {
    /// Called after a tick has been recorded.
    fn on_tick(&mut self, record: &TickRecord, simulation: &Simulation);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _record: &TickRecord, _simulation: &Simulation) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// A configured simulation is started first. Agent tasks are joined
/// before this returns, whatever the end reason.
///
/// # Errors
///
/// Returns [`RunnerError`] if the simulation cannot be started.
pub async fn run_simulation(
    simulation: &mut Simulation,
    tick_interval: Duration,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    if simulation.phase() != SimulationPhase::Running {
        if simulation.phase() == SimulationPhase::Stopped {
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Stopped,
                final_record: simulation.history().last().copied(),
                total_ticks: 0,
            });
        }
        simulation.start()?;
    }

    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = simulation.parameters().map(|p| p.max_ticks),
        tick_interval_ms = u64::try_from(tick_interval.as_millis()).unwrap_or(u64::MAX),
        "Simulation starting"
    );

    let end_reason = loop {
        let recorded = simulation.history().len();
        simulation.step().await;

        // --- Tick limit ---
        // step() stops instead of running the tick that hits the limit.
        if !simulation.is_running() {
            break SimulationEndReason::MaxTicksReached;
        }

        let Some(record) = simulation.history().get(recorded).copied() else {
            continue;
        };
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&record, simulation);

        // --- Check extinction ---
        if simulation.is_extinct() {
            info!(tick = record.tick, "Nothing alive and nothing can spawn -- extinction");
            simulation.stop();
            break SimulationEndReason::Extinction;
        }

        // --- Sleep for tick interval ---
        if !tick_interval.is_zero() {
            tokio::time::sleep(tick_interval).await;
        }
    };

    simulation.shutdown().await;
    Ok(SimulationResult {
        end_reason,
        final_record: simulation.history().last().copied(),
        total_ticks,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_record.map(|r| r.tick),
        "Simulation ended"
    );

    if let Some(record) = result.final_record {
        info!(
            tick = record.tick,
            humans_alive = record.humans_alive,
            animals_alive = record.animals_alive,
            vegetables_alive = record.vegetables_alive,
            pragmatic = record.pragmatic,
            cautious = record.cautious,
            selfish = record.selfish,
            collectivist = record.collectivist,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
