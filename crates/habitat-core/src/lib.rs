//! Orchestration for the Habitat simulation.
//!
//! This crate drives a world of Humans, Animals and Vegetables one tick at
//! a time. It owns the seeded random source, spawns the initial population
//! and the stochastic arrivals, runs the per-tick barrier across agent
//! tasks, and records aggregate statistics after every tick.
//!
//! # Modules
//!
//! - [`barrier`] -- Fan-out/fan-in of one tick across agent tasks.
//! - [`config`] -- YAML configuration ([`SimulationConfig`]).
//! - [`error`] -- Lifecycle and parameter errors ([`SimulationError`]).
//! - [`parameters`] -- Validated run parameters ([`SimulationParameters`]).
//! - [`profiles`] -- Profile weights and the cumulative distribution.
//! - [`runner`] -- Bounded run loop with pacing and end reasons.
//! - [`simulation`] -- The [`Simulation`] orchestrator and its phases.
//! - [`spawner`] -- Exponential arrivals, kind rolls, free-spot probing.
//! - [`stats`] -- Per-tick population counts.

pub mod barrier;
pub mod config;
pub mod error;
pub mod parameters;
pub mod profiles;
pub mod runner;
pub mod simulation;
pub mod spawner;
pub mod stats;

// Re-export primary types at crate root for convenience.
pub use config::{ConfigError, SimulationConfig};
pub use error::SimulationError;
pub use parameters::SimulationParameters;
pub use profiles::{ProfileDistribution, ProfileWeights};
pub use runner::{
    NoOpCallback, RunnerError, SimulationEndReason, SimulationResult, TickCallback,
    log_simulation_end, run_simulation,
};
pub use simulation::{Simulation, SimulationPhase};
pub use spawner::{SpawnReport, Spawner};
