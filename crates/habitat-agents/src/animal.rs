//! Animal agents: a three-state behavior machine.
//!
//! Perceive collects the centers of visible humans as threats; decide
//! flees when any threat is present and wanders otherwise; act moves.

use habitat_types::{AnimalKind, AnimalState, BoundingBox, Position, Vector};
use habitat_world::{Environment, Occupant};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::vitals::{Creature, Vitals};

/// Base movement per tick.
pub const ANIMAL_SPEED: f64 = 0.5;

/// Fleeing moves this many times faster than wandering.
pub const FLEE_SPEED_FACTOR: f64 = 1.5;

/// A wanderer this close to its target picks a new one.
pub const WANDER_ARRIVAL_DISTANCE: f64 = 5.0;

/// A wanderer picks a new target after more steps than this.
pub const WANDER_DURATION: u32 = 100;

/// Name given to every spawned animal.
pub const ANIMAL_NAME: &str = "Wild";

/// An animal agent.
#[derive(Debug, Clone)]
pub struct Animal {
    vitals: Vitals,
    kind: AnimalKind,
    state: AnimalState,
    wander_target: Position,
    steps_in_state: u32,
    threats: Vec<Position>,
    rng: SmallRng,
}

impl Animal {
    /// A new animal of `kind`, its footprint's top-left corner at `(x, y)`.
    pub fn new(kind: AnimalKind, x: f64, y: f64, seed: u64) -> Self {
        let size = kind.size();
        Self {
            vitals: Vitals::new(ANIMAL_NAME, kind.health(), BoundingBox::new(x, y, size, size)),
            kind,
            state: AnimalState::Wander,
            wander_target: Position::default(),
            steps_in_state: 0,
            threats: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Species.
    pub const fn kind(&self) -> AnimalKind {
        self.kind
    }

    /// Current behavior state.
    pub const fn state(&self) -> AnimalState {
        self.state
    }

    /// Humans needed to hunt it at full strength.
    pub const fn required_hunters(&self) -> u32 {
        self.kind.required_hunters()
    }

    /// Hunger removed, in total, when the carcass is shared.
    pub const fn nutrition(&self) -> u32 {
        self.kind.nutrition()
    }

    /// Threat centers seen during the last perceive phase.
    pub fn threats(&self) -> &[Position] {
        &self.threats
    }

    /// Replace the threats seen this tick.
    pub fn set_threats(&mut self, threats: Vec<Position>) {
        self.threats = threats;
    }

    /// Flee if any threat is in view, wander otherwise.
    pub fn decide(&mut self) {
        self.state = if self.threats.is_empty() {
            AnimalState::Wander
        } else {
            AnimalState::Flee
        };
    }

    /// Move according to the current state.
    ///
    /// Fleeing runs directly away from the sum of threat directions.
    /// Wandering heads for a random point, retargeting on arrival or
    /// after [`WANDER_DURATION`] steps.
    pub fn act<A, O>(&mut self, env: &Environment<A, O>)
    where
        A: Occupant + Clone,
        O: Occupant + Clone,
    {
        self.steps_in_state = self.steps_in_state.saturating_add(1);
        let here = self.center();

        match self.state {
            AnimalState::Flee => {
                let away = self
                    .threats
                    .iter()
                    .fold(Vector::ZERO, |sum, threat| sum.plus(threat.vector_to(here)));
                if let Some(step) = away.with_length(ANIMAL_SPEED * FLEE_SPEED_FACTOR) {
                    self.move_by(step, env);
                }
            }
            AnimalState::Wander => {
                if here.distance_to(self.wander_target) < WANDER_ARRIVAL_DISTANCE
                    || self.steps_in_state > WANDER_DURATION
                {
                    self.steps_in_state = 0;
                    self.wander_target = Position::new(
                        self.rng.random_range(0.0..env.width()),
                        self.rng.random_range(0.0..env.height()),
                    );
                }
                if let Some(step) = here.vector_to(self.wander_target).with_length(ANIMAL_SPEED) {
                    self.move_by(step, env);
                }
            }
            AnimalState::Stay => {}
        }
    }
}

impl Creature for Animal {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use habitat_types::EntityId;

    use super::*;

    #[derive(Debug)]
    struct Nobody;

    impl Occupant for Nobody {
        fn occupant_id(&self) -> EntityId {
            EntityId::UNASSIGNED
        }

        fn is_alive(&self) -> bool {
            false
        }

        fn center(&self) -> Position {
            Position::default()
        }
    }

    fn world() -> Environment<Arc<Nobody>, Arc<Nobody>> {
        Environment::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn kind_sets_health_and_size() {
        let bull = Animal::new(AnimalKind::Bull, 0.0, 0.0, 1);
        assert_eq!(bull.health(), 160);
        assert_eq!(bull.required_hunters(), 3);
        assert_eq!(bull.name(), ANIMAL_NAME);
        assert!((bull.footprint().width - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn flees_directly_away_from_a_threat() {
        let env = world();
        let mut chicken = Animal::new(AnimalKind::Chicken, 400.0, 300.0, 1);
        let here = chicken.center();
        chicken.set_threats(vec![Position::new(here.x - 50.0, here.y)]);
        chicken.decide();
        assert_eq!(chicken.state(), AnimalState::Flee);

        chicken.act(&env);
        let moved = chicken.center();
        assert!((moved.x - here.x - 0.75).abs() < 1e-9);
        assert!((moved.y - here.y).abs() < 1e-9);
    }

    #[test]
    fn wanders_at_base_speed_without_threats() {
        let env = world();
        let mut cow = Animal::new(AnimalKind::Cow, 200.0, 200.0, 9);
        cow.decide();
        assert_eq!(cow.state(), AnimalState::Wander);
        let before = cow.center();
        cow.act(&env);
        let step = before.distance_to(cow.center());
        // Either a full step or a rejected move at the world edge.
        assert!((step - ANIMAL_SPEED).abs() < 1e-9 || step.abs() < 1e-9);
    }

    #[test]
    fn never_leaves_the_world() {
        let env = world();
        let mut chicken = Animal::new(AnimalKind::Chicken, 0.0, 0.0, 4);
        chicken.set_threats(vec![Position::new(60.0, 60.0)]);
        chicken.decide();
        for _ in 0..50 {
            chicken.act(&env);
        }
        assert!(chicken.footprint().fits_within(800.0, 600.0));
        assert_eq!(chicken.center(), Position::new(10.0, 10.0));
    }
}
