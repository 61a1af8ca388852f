//! Read-only telemetry exposed to rendering and statistics consumers.
//!
//! Views are owned copies taken at tick boundaries. Consumers never hold a
//! reference into live simulation state, so nothing they do can mutate it.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{ActionKind, AnimalKind, AnimalState, EntityKind, Profile, VegetableKind};
use crate::geometry::BoundingBox;
use crate::ids::EntityId;

/// Aggregate population counts recorded once per completed tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TickRecord {
    /// The tick this record closes.
    pub tick: u64,
    /// Living humans after the dead sweep.
    pub humans_alive: u32,
    /// Living animals after the dead sweep.
    pub animals_alive: u32,
    /// Uneaten vegetables after the dead sweep.
    pub vegetables_alive: u32,
    /// Living humans with the [`Profile::Pragmatic`] profile.
    pub pragmatic: u32,
    /// Living humans with the [`Profile::Cautious`] profile.
    pub cautious: u32,
    /// Living humans with the [`Profile::Selfish`] profile.
    pub selfish: u32,
    /// Living humans with the [`Profile::Collectivist`] profile.
    pub collectivist: u32,
}

impl TickRecord {
    /// Count one living human of the given profile.
    pub const fn count_human(&mut self, profile: Profile) {
        self.humans_alive = self.humans_alive.saturating_add(1);
        match profile {
            Profile::Pragmatic => self.pragmatic = self.pragmatic.saturating_add(1),
            Profile::Cautious => self.cautious = self.cautious.saturating_add(1),
            Profile::Selfish => self.selfish = self.selfish.saturating_add(1),
            Profile::Collectivist => self.collectivist = self.collectivist.saturating_add(1),
        }
    }

    /// Number of living humans with `profile`.
    pub const fn profile_count(&self, profile: Profile) -> u32 {
        match profile {
            Profile::Pragmatic => self.pragmatic,
            Profile::Cautious => self.cautious,
            Profile::Selfish => self.selfish,
            Profile::Collectivist => self.collectivist,
        }
    }
}

/// Human-only state exposed alongside an [`AgentView`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct HumanView {
    /// Current hunger, `0..=MAX_HUNGER`.
    pub hunger: u32,
    /// Current energy, `0..=MAX_ENERGY`.
    pub energy: u32,
    /// Fixed behavioral profile.
    pub profile: Profile,
    /// Action being carried out, if any.
    pub action: Option<ActionKind>,
}

/// Snapshot of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AgentView {
    /// Identifier issued on admission.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Human or animal.
    pub kind: EntityKind,
    /// Health points; zero or less means dead.
    pub health: i32,
    /// Whether the agent is alive.
    pub alive: bool,
    /// Current footprint.
    pub footprint: BoundingBox,
    /// Present for humans only.
    pub human: Option<HumanView>,
    /// Present for animals only.
    pub animal: Option<(AnimalKind, AnimalState)>,
}

/// Snapshot of one object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ObjectView {
    /// Identifier issued on admission.
    pub id: EntityId,
    /// Display name.
    pub name: String,
    /// Vegetable species.
    pub kind: VegetableKind,
    /// False once eaten.
    pub alive: bool,
    /// Footprint.
    pub footprint: BoundingBox,
}
