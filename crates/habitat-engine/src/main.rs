//! Engine binary for the Habitat simulation.
//!
//! This is the main entry point that wires the configuration, logging and
//! the simulation together, then runs the tick loop until the tick limit
//! or extinction ends it.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `habitat-config.yaml` (or defaults)
//! 2. Initialize structured logging (tracing)
//! 3. Configure the simulation from the file
//! 4. Run the simulation loop (start, step, pace, shut down)
//! 5. Log the result and the run report
//! 6. Log the per-tick history as JSON at debug level, and write it to
//!    `HABITAT_HISTORY_PATH` when that is set

mod error;
mod progress;
mod report;

use std::path::Path;

use chrono::Utc;
use habitat_core::{Simulation, SimulationConfig, log_simulation_end, run_simulation};
use tracing::{Level, debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;
use crate::report::RunReport;

/// Configuration file looked up in the working directory.
const CONFIG_PATH: &str = "habitat-config.yaml";

/// Environment variable naming where to write the JSON history.
const HISTORY_PATH_ENV: &str = "HABITAT_HISTORY_PATH";

/// Ticks between progress lines.
const PROGRESS_EVERY: u64 = 1_000;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, the simulation, or the report fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet; the level comes from here.
    let config_path = Path::new(CONFIG_PATH);
    let config_found = config_path.exists();
    let config = load_config(config_path, config_found)?;

    // 2. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .init();

    info!("habitat-engine starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        seed = config.world.seed,
        width = config.world.width,
        height = config.world.height,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    run(&config).await?;
    Ok(())
}

/// Configure, run and report one simulation.
async fn run(config: &SimulationConfig) -> Result<(), EngineError> {
    // 3. Configure.
    let mut simulation = Simulation::new();
    simulation.set_parameters(config.parameters())?;

    // 4. Run.
    let started_at = Utc::now();
    let mut callback = ProgressCallback::new(PROGRESS_EVERY);
    let result = run_simulation(&mut simulation, config.tick_interval(), &mut callback).await?;
    let finished_at = Utc::now();

    // 5. Log results.
    log_simulation_end(&result);
    let report = RunReport::new(
        &simulation,
        &result,
        callback.peak_humans(),
        started_at,
        finished_at,
    );
    let report_json = report.to_json()?;
    info!(
        elapsed_ms = report.elapsed_ms(),
        peak_animals = callback.peak_animals(),
        report = %report_json,
        "Run report"
    );

    // 6. Export history.
    if tracing::enabled!(Level::DEBUG) {
        let history = simulation.history_json()?;
        debug!(records = simulation.history().len(), history = %history, "Tick history");
    }
    if let Ok(path) = std::env::var(HISTORY_PATH_ENV) {
        report::write_history(Path::new(&path), &simulation)?;
        info!(path = %path, records = simulation.history().len(), "History written");
    }

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "habitat-engine shutdown complete"
    );
    Ok(())
}

/// Load the simulation configuration, falling back to defaults when the
/// file does not exist.
fn load_config(path: &Path, found: bool) -> Result<SimulationConfig, EngineError> {
    if found {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        let mut config = SimulationConfig::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
