//! Bounded world and occupancy for the Habitat simulation.
//!
//! This crate models the physical world: a fixed rectangle holding the
//! live agent and object collections. It knows nothing about what agents
//! do; it only needs to ask an occupant for its identity, whether it is
//! alive, and where it stands.
//!
//! # Modules
//!
//! - [`environment`] -- [`Environment`], the lock-guarded collections with
//!   bounds and free-location queries.
//! - [`error`] -- Error types for world construction.

pub mod environment;
pub mod error;

// Re-export primary types at crate root.
pub use environment::{Environment, Occupant};
pub use error::WorldError;
