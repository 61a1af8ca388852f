//! Error types for the habitat-core crate.
//!
//! Simulation logic reports outcomes as data; these errors only cover
//! misuse of the lifecycle and invalid parameters.

use habitat_agents::AgentError;
use habitat_world::WorldError;

/// Errors returned by [`crate::Simulation`] lifecycle calls.
#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    /// `start` was called before `set_parameters`.
    #[error("simulation parameters have not been set")]
    NotConfigured,

    /// `start` or `set_parameters` was called after the run began.
    #[error("simulation has already been started")]
    AlreadyStarted,

    /// A parameter is out of range.
    #[error("invalid simulation parameters: {reason}")]
    InvalidConfig {
        /// Which parameter is wrong and why.
        reason: String,
    },

    /// `start` was called outside a tokio runtime.
    #[error("simulation must be started inside a tokio runtime: {source}")]
    NoRuntime {
        /// Why no runtime handle was available.
        #[source]
        source: tokio::runtime::TryCurrentError,
    },

    /// Building the world failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },

    /// Admitting an agent or starting its task failed.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: AgentError,
    },
}
