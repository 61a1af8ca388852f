//! Per-tick perception snapshots.
//!
//! Perceiving copies what an agent can see into owned values instead of
//! holding references into the world. Each neighbor is locked just long
//! enough to read its sighting, so no task ever holds two agent locks
//! while perceiving.

use habitat_types::{AnimalKind, EntityId, EntityKind, Position};
use habitat_world::Occupant;

use crate::actions::HumanAction;
use crate::agent::{AgentRef, ObjectRef};

/// Humans see everything within this distance, inclusive.
pub const HUMAN_VISION_RADIUS: f64 = 250.0;

/// Animals notice humans strictly closer than this distance.
pub const ANIMAL_VISION_RADIUS: f64 = 100.0;

/// What a human knows about another visible human.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeenHuman {
    /// Identifier of the neighbor.
    pub id: EntityId,
    /// Footprint center.
    pub center: Position,
    /// Whether the neighbor meets the mating thresholds.
    pub ready_to_mate: bool,
    /// Action the neighbor is carrying out.
    pub action: Option<HumanAction>,
}

/// What a human knows about a visible animal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeenAnimal {
    /// Identifier of the animal.
    pub id: EntityId,
    /// Footprint center.
    pub center: Position,
    /// Species, which fixes the hunters needed.
    pub kind: AnimalKind,
}

/// What a human knows about a visible vegetable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeenVegetable {
    /// Identifier of the vegetable.
    pub id: EntityId,
    /// Footprint center.
    pub center: Position,
}

/// A living agent as observed from outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sighting {
    /// A human neighbor.
    Human(SeenHuman),
    /// An animal neighbor.
    Animal(SeenAnimal),
}

impl Sighting {
    /// Where the observed agent stands.
    pub const fn center(&self) -> Position {
        match self {
            Self::Human(h) => h.center,
            Self::Animal(a) => a.center,
        }
    }
}

/// Everything a human saw during its last perceive phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HumanPerception {
    /// Living humans in view, self excluded.
    pub humans: Vec<SeenHuman>,
    /// Living animals in view.
    pub animals: Vec<SeenAnimal>,
    /// Uneaten vegetables in view.
    pub vegetables: Vec<SeenVegetable>,
}

impl HumanPerception {
    /// Scan the world from `eye` on behalf of agent `me`.
    pub fn scan(me: EntityId, eye: Position, agents: &[AgentRef], objects: &[ObjectRef]) -> Self {
        let in_view = |at: Position| eye.distance_to(at) <= HUMAN_VISION_RADIUS;
        let mut seen = Self::default();

        for agent in agents.iter().filter(|a| a.id() != me) {
            match agent.sighting() {
                Some(Sighting::Human(h)) if in_view(h.center) => seen.humans.push(h),
                Some(Sighting::Animal(a)) if in_view(a.center) => seen.animals.push(a),
                _ => {}
            }
        }

        seen.vegetables = objects
            .iter()
            .filter(|o| o.is_alive() && in_view(o.center()))
            .map(|o| SeenVegetable {
                id: o.occupant_id(),
                center: o.center(),
            })
            .collect();
        seen
    }

    /// Visible food sources of any kind: vegetables and prey.
    pub fn food_count(&self) -> usize {
        self.vegetables.len().saturating_add(self.animals.len())
    }

    /// Whether some other visible human is already gathering `target`.
    pub fn is_claimed_by_gatherer(&self, target: EntityId) -> bool {
        self.humans
            .iter()
            .any(|h| h.action == Some(HumanAction::Gather { target }))
    }

    /// Number of visible humans currently hunting `target`.
    pub fn hunters_on(&self, target: EntityId) -> usize {
        self.humans
            .iter()
            .filter(|h| h.action == Some(HumanAction::Hunt { target }))
            .count()
    }
}

/// Centers of the living humans an animal at `eye` can see.
pub fn scan_threats(eye: Position, agents: &[AgentRef]) -> Vec<Position> {
    agents
        .iter()
        .filter(|a| a.kind() == EntityKind::Human)
        .filter_map(|a| a.sighting())
        .map(|s| s.center())
        .filter(|at| eye.distance_to(*at) < ANIMAL_VISION_RADIUS)
        .collect()
}
