//! Error types for the habitat-agents crate.
//!
//! Behavior itself never fails: a lost target or an unaffordable cost is
//! recorded as agent state. These errors cover admission and task
//! management only.

use habitat_types::EntityId;

/// Errors that can occur while admitting agents or managing their tasks.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The global id counter cannot issue another identifier.
    #[error("entity id space exhausted after {last}")]
    IdSpaceExhausted {
        /// The last identifier that was handed out.
        last: EntityId,
    },

    /// A lifecycle task was started outside a tokio runtime.
    #[error("cannot start task for agent {agent_id}: {source}")]
    NoRuntime {
        /// The agent whose task could not be spawned.
        agent_id: EntityId,
        /// Why no runtime handle was available.
        #[source]
        source: tokio::runtime::TryCurrentError,
    },
}
