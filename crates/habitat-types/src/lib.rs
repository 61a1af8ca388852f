//! Shared type definitions for the Habitat simulation.
//!
//! This crate is the single source of truth for the value types used across
//! the Habitat workspace. Telemetry types flow downstream to `TypeScript` via
//! `ts-rs` for rendering and statistics consumers.
//!
//! # Modules
//!
//! - [`ids`] -- The globally allocated entity identifier
//! - [`geometry`] -- Positions, displacement vectors, and axis-aligned boxes
//! - [`enums`] -- Closed enumerations (profiles, kinds, behavior states)
//! - [`telemetry`] -- Read-only per-tick records and entity views

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod telemetry;

// Re-export all public types at crate root for convenience.
pub use enums::{ActionKind, AnimalKind, AnimalState, EntityKind, Profile, VegetableKind};
pub use geometry::{BoundingBox, Position, Vector};
pub use ids::EntityId;
pub use telemetry::{AgentView, HumanView, ObjectView, TickRecord};
