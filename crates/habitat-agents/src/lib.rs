//! Agents, their lifecycle tasks, and the human utility engine for the
//! Habitat simulation.
//!
//! This crate holds everything that lives in the world: the closed
//! [`Agent`] (human or animal) and [`Object`] (vegetable) sum types, the
//! per-agent tokio task that runs perceive, decide and act once per
//! ticket, and the shared state ([`SharedWorld`]) those tasks operate on.
//! Orchestration (tick numbering, spawning, statistics) lives in
//! `habitat-core`.
//!
//! # Modules
//!
//! - [`actions`] -- Utility scoring and execution of human actions.
//! - [`agent`] -- [`Agent`] sum type and the shared [`AgentCell`] handle.
//! - [`animal`] -- Animal state machine (wander, flee, stay).
//! - [`error`] -- Error types for admission and task management ([`AgentError`]).
//! - [`human`] -- Human needs, upkeep, decide phase, and conception.
//! - [`lifecycle`] -- Agent tasks, tick tickets, and the stop signal.
//! - [`perception`] -- Owned per-tick perception snapshots.
//! - [`reproduction`] -- Mating constants and profile inheritance.
//! - [`vegetable`] -- Vegetables and the [`Object`] sum type.
//! - [`vitals`] -- Shared base state and the [`Creature`] capability trait.
//! - [`world`] -- [`SharedWorld`]: environment, id counter, admission.

pub mod actions;
pub mod agent;
pub mod animal;
mod behavior;
pub mod error;
pub mod human;
pub mod lifecycle;
pub mod perception;
pub mod reproduction;
pub mod vegetable;
pub mod vitals;
pub mod world;

// Re-export primary types at crate root for convenience.
pub use actions::HumanAction;
pub use agent::{Agent, AgentCell, AgentRef, ObjectRef, WorldEnvironment};
pub use animal::Animal;
pub use error::AgentError;
pub use human::Human;
pub use lifecycle::{PendingTick, StopSignal, TickTicket};
pub use vegetable::{Object, Vegetable};
pub use vitals::{Creature, Vitals};
pub use world::{IdAllocator, SharedWorld};
