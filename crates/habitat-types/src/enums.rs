//! Enumeration types for the Habitat simulation.
//!
//! Kind tables (health, hunters required, nutrition, footprint size) live
//! on the enums themselves so that every factory and utility function reads
//! the same constants.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Humans
// ---------------------------------------------------------------------------

/// Behavioral bias of a human, fixed at creation.
///
/// Profiles modulate the utility multipliers of every candidate action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Profile {
    /// Avoids risky hunts that need many hunters.
    Selfish,
    /// Favors group hunting over gathering.
    Collectivist,
    /// Weighs energy and already-committed hunters.
    Pragmatic,
    /// Prefers resting and gathering over risk.
    Cautious,
}

impl Profile {
    /// Every profile, in declaration order.
    pub const ALL: [Self; 4] = [
        Self::Selfish,
        Self::Collectivist,
        Self::Pragmatic,
        Self::Cautious,
    ];
}

/// The kind of action a human is currently carrying out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ActionKind {
    /// Recover energy and health in place.
    Rest,
    /// Walk to a vegetable and eat it.
    Gather,
    /// Chase and attack an animal.
    Hunt,
    /// Meet a ready mate and produce offspring.
    Reproduce,
}

// ---------------------------------------------------------------------------
// Animals
// ---------------------------------------------------------------------------

/// Species of an animal. Fixes its health, hunters needed and nutrition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AnimalKind {
    /// Small prey, one hunter is enough.
    Chicken,
    /// Medium prey, needs two hunters.
    Cow,
    /// Large prey, needs three hunters.
    Bull,
}

impl AnimalKind {
    /// Starting health points.
    pub const fn health(self) -> i32 {
        match self {
            Self::Chicken => 40,
            Self::Cow => 120,
            Self::Bull => 160,
        }
    }

    /// Number of humans needed to hunt this animal at full strength.
    pub const fn required_hunters(self) -> u32 {
        match self {
            Self::Chicken => 1,
            Self::Cow => 2,
            Self::Bull => 3,
        }
    }

    /// Hunger removed, in total, when the carcass is shared.
    pub const fn nutrition(self) -> u32 {
        match self {
            Self::Chicken => 100,
            Self::Cow => 260,
            Self::Bull => 490,
        }
    }

    /// Side length of the square footprint.
    pub const fn size(self) -> f64 {
        match self {
            Self::Chicken => 20.0,
            Self::Cow => 32.0,
            Self::Bull => 48.0,
        }
    }
}

/// Behavior state of an animal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AnimalState {
    /// Roam toward a random target.
    #[default]
    Wander,
    /// Run away from visible humans.
    Flee,
    /// Stand still.
    Stay,
}

// ---------------------------------------------------------------------------
// Objects
// ---------------------------------------------------------------------------

/// Species of a vegetable. Fixes its nutrition value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum VegetableKind {
    /// Most nutritious, rarest.
    Carrot,
    /// Medium nutrition.
    Lettuce,
    /// Least nutritious, most common.
    Berry,
}

impl VegetableKind {
    /// Hunger removed when eaten.
    pub const fn nutrition(self) -> u32 {
        match self {
            Self::Carrot => 60,
            Self::Lettuce => 40,
            Self::Berry => 25,
        }
    }
}

/// Coarse entity category used by telemetry and occupancy queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum EntityKind {
    /// A human agent.
    Human,
    /// An animal agent.
    Animal,
    /// A vegetable object.
    Vegetable,
}
