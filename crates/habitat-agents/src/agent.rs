//! The closed agent sum type and its shared, lock-guarded handle.
//!
//! [`Agent`] is either a [`Human`] or an [`Animal`]; behavior dispatches by
//! pattern matching, never by downcasting. [`AgentCell`] is what the world
//! stores: an immutable id and kind, the agent state behind a mutex, and
//! the task lifecycle (see [`crate::lifecycle`]).
//!
//! A thread holds at most one agent lock at a time, with one exception:
//! mating locks both partners in ascending id order.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use habitat_types::{AgentView, EntityId, EntityKind, Position};
use habitat_world::{Environment, Occupant};

use crate::animal::Animal;
use crate::human::Human;
use crate::lifecycle::Lifecycle;
use crate::perception::{SeenAnimal, SeenHuman, Sighting};
use crate::vegetable::Object;
use crate::vitals::{Creature, Vitals};

/// Shared handle to a registered agent.
pub type AgentRef = Arc<AgentCell>;

/// Shared handle to a registered object.
pub type ObjectRef = Arc<Object>;

/// The world as populated by this crate's handles.
pub type WorldEnvironment = Environment<AgentRef, ObjectRef>;

/// Any agent.
#[derive(Debug, Clone)]
pub enum Agent {
    /// A human.
    Human(Human),
    /// An animal.
    Animal(Animal),
}

impl Agent {
    /// Coarse kind used by telemetry and perception.
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Human(_) => EntityKind::Human,
            Self::Animal(_) => EntityKind::Animal,
        }
    }

    /// The human inside, if this is one.
    pub const fn as_human(&self) -> Option<&Human> {
        match self {
            Self::Human(h) => Some(h),
            Self::Animal(_) => None,
        }
    }

    /// The animal inside, if this is one.
    pub const fn as_animal(&self) -> Option<&Animal> {
        match self {
            Self::Animal(a) => Some(a),
            Self::Human(_) => None,
        }
    }

    /// Read-only telemetry copy.
    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id(),
            name: self.name().to_owned(),
            kind: self.kind(),
            health: self.health(),
            alive: self.is_alive(),
            footprint: self.footprint(),
            human: self.as_human().map(Human::view),
            animal: self.as_animal().map(|a| (a.kind(), a.state())),
        }
    }
}

impl Creature for Agent {
    fn vitals(&self) -> &Vitals {
        match self {
            Self::Human(h) => h.vitals(),
            Self::Animal(a) => a.vitals(),
        }
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        match self {
            Self::Human(h) => h.vitals_mut(),
            Self::Animal(a) => a.vitals_mut(),
        }
    }

    fn energy(&self) -> u32 {
        match self {
            Self::Human(h) => h.energy(),
            Self::Animal(a) => a.energy(),
        }
    }
}

impl From<Human> for Agent {
    fn from(human: Human) -> Self {
        Self::Human(human)
    }
}

impl From<Animal> for Agent {
    fn from(animal: Animal) -> Self {
        Self::Animal(animal)
    }
}

/// A registered agent: fixed identity, guarded state, and its task.
#[derive(Debug)]
pub struct AgentCell {
    id: EntityId,
    kind: EntityKind,
    state: Mutex<Agent>,
    pub(crate) lifecycle: Lifecycle,
}

impl AgentCell {
    /// Wrap an agent whose id has already been assigned.
    pub(crate) fn new(agent: Agent) -> Self {
        Self {
            id: agent.id(),
            kind: agent.kind(),
            state: Mutex::new(agent),
            lifecycle: Lifecycle::new(),
        }
    }

    /// Identifier issued on admission.
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Human or animal. Never changes.
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Lock the agent state.
    ///
    /// A poisoned lock is recovered: every critical section leaves the
    /// agent in a consistent state before it can panic.
    pub fn lock(&self) -> MutexGuard<'_, Agent> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` on the human inside, if this cell holds one.
    pub fn with_human<R>(&self, f: impl FnOnce(&mut Human) -> R) -> Option<R> {
        let mut agent = self.lock();
        match &mut *agent {
            Agent::Human(h) => Some(f(h)),
            Agent::Animal(_) => None,
        }
    }

    /// Run `f` on the animal inside, if this cell holds one.
    pub fn with_animal<R>(&self, f: impl FnOnce(&mut Animal) -> R) -> Option<R> {
        let mut agent = self.lock();
        match &mut *agent {
            Agent::Animal(a) => Some(f(a)),
            Agent::Human(_) => None,
        }
    }

    /// Read-only telemetry copy.
    pub fn view(&self) -> AgentView {
        self.lock().view()
    }

    /// What others see of this agent, or `None` once it is dead.
    pub fn sighting(&self) -> Option<Sighting> {
        let agent = self.lock();
        if !agent.is_alive() {
            return None;
        }
        let center = agent.center();
        let sighting = match &*agent {
            Agent::Human(h) => Sighting::Human(SeenHuman {
                id: self.id,
                center,
                ready_to_mate: h.is_ready_to_mate(),
                action: h.action(),
            }),
            Agent::Animal(a) => Sighting::Animal(SeenAnimal {
                id: self.id,
                center,
                kind: a.kind(),
            }),
        };
        Some(sighting)
    }
}

impl Occupant for AgentCell {
    fn occupant_id(&self) -> EntityId {
        self.id
    }

    fn is_alive(&self) -> bool {
        self.lock().is_alive()
    }

    fn center(&self) -> Position {
        self.lock().center()
    }
}

#[cfg(test)]
mod tests {
    use habitat_types::{AnimalKind, Profile};

    use super::*;

    fn cell(mut agent: Agent, id: u64) -> AgentCell {
        agent.set_id(EntityId(id));
        AgentCell::new(agent)
    }

    #[test]
    fn cell_reports_identity_and_kind() {
        let c = cell(Agent::from(Animal::new(AnimalKind::Cow, 0.0, 0.0, 1)), 4);
        assert_eq!(c.id(), EntityId(4));
        assert_eq!(c.kind(), EntityKind::Animal);
        assert!(c.with_human(|_| ()).is_none());
        assert_eq!(c.with_animal(|a| a.kind()), Some(AnimalKind::Cow));
    }

    #[test]
    fn dead_agents_are_not_sighted() {
        let c = cell(Agent::from(Human::new("H-1", 0.0, 0.0, Profile::Selfish, 1)), 1);
        assert!(matches!(c.sighting(), Some(Sighting::Human(_))));
        c.lock().kill();
        assert!(c.sighting().is_none());
        assert!(!Occupant::is_alive(&c));
    }

    #[test]
    fn view_carries_kind_specific_state() {
        let human = cell(Agent::from(Human::new("H-2", 0.0, 0.0, Profile::Cautious, 1)), 2);
        let view = human.view();
        assert_eq!(view.kind, EntityKind::Human);
        assert_eq!(view.human.map(|h| h.profile), Some(Profile::Cautious));
        assert!(view.animal.is_none());

        let bull = cell(Agent::from(Animal::new(AnimalKind::Bull, 0.0, 0.0, 1)), 3);
        let view = bull.view();
        assert_eq!(view.health, 160);
        assert_eq!(view.animal.map(|(kind, _)| kind), Some(AnimalKind::Bull));
    }
}
