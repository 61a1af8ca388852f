//! Base state shared by every agent kind and the capability trait over it.
//!
//! Humans and animals each own a [`Vitals`] value and implement
//! [`Creature`] by pointing at it; everything else (identity, health,
//! death, bounded movement) comes from the trait's default methods.
//!
//! The death rule lives in exactly one place: [`Vitals::damage`] and
//! [`Vitals::kill`] are the only mutations of `health` and `alive`, and
//! both keep `health <= 0` equivalent to `!alive`.

use habitat_types::{BoundingBox, EntityId, Position, Vector};
use habitat_world::{Environment, Occupant};

/// Identity, health and footprint common to all agents.
#[derive(Debug, Clone, PartialEq)]
pub struct Vitals {
    /// Identifier, [`EntityId::UNASSIGNED`] until admission.
    id: EntityId,
    /// Display name.
    name: String,
    /// Health points; zero or less means dead.
    health: i32,
    /// Whether the agent still acts.
    alive: bool,
    /// Current footprint.
    footprint: BoundingBox,
}

impl Vitals {
    /// Fresh, unadmitted base state.
    ///
    /// A non-positive starting health produces a dead agent.
    pub fn new(name: impl Into<String>, health: i32, footprint: BoundingBox) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            health,
            alive: health > 0,
            footprint,
        }
    }

    /// Subtract `amount` health. Returns `true` if this call killed the
    /// agent. Damage to a dead agent is ignored.
    pub const fn damage(&mut self, amount: i32) -> bool {
        if !self.alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health <= 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Mark the agent dead, dropping health to zero if it was positive.
    pub const fn kill(&mut self) {
        self.alive = false;
        if self.health > 0 {
            self.health = 0;
        }
    }

    /// Overwrite health before the agent is admitted. A non-positive value
    /// leaves it dead.
    pub(crate) const fn reset_health(&mut self, health: i32) {
        self.health = health;
        self.alive = health > 0;
    }

    /// Restore up to `amount` health without exceeding `max`.
    pub fn heal(&mut self, amount: i32, max: i32) {
        if self.alive {
            self.health = self.health.saturating_add(amount).min(max);
        }
    }
}

/// Capability set shared by every agent kind.
///
/// Implementors only provide access to their [`Vitals`]; the remaining
/// methods are defaults over it.
pub trait Creature {
    /// Shared base state.
    fn vitals(&self) -> &Vitals;

    /// Shared base state, mutably.
    fn vitals_mut(&mut self) -> &mut Vitals;

    /// Identifier issued on admission.
    fn id(&self) -> EntityId {
        self.vitals().id
    }

    /// Display name.
    fn name(&self) -> &str {
        &self.vitals().name
    }

    /// Current health.
    fn health(&self) -> i32 {
        self.vitals().health
    }

    /// Whether the agent is alive.
    fn is_alive(&self) -> bool {
        self.vitals().alive
    }

    /// Current footprint.
    fn footprint(&self) -> BoundingBox {
        self.vitals().footprint
    }

    /// Center of the footprint, the point all distances are measured from.
    fn center(&self) -> Position {
        self.vitals().footprint.center()
    }

    /// Energy reserve. Only humans track energy.
    fn energy(&self) -> u32 {
        0
    }

    /// Assign the identifier. Called once, on admission.
    fn set_id(&mut self, id: EntityId) {
        self.vitals_mut().id = id;
    }

    /// Apply damage. Returns `true` if this call killed the agent.
    fn damage(&mut self, amount: i32) -> bool {
        self.vitals_mut().damage(amount)
    }

    /// Kill the agent outright.
    fn kill(&mut self) {
        self.vitals_mut().kill();
    }

    /// Translate the footprint by `delta` if the result stays inside the
    /// world. Other occupants are not checked. Returns whether the move
    /// was applied.
    fn move_by<A, O>(&mut self, delta: Vector, env: &Environment<A, O>) -> bool
    where
        A: Occupant + Clone,
        O: Occupant + Clone,
    {
        let vitals = self.vitals_mut();
        if !env.is_inside_bounds(&vitals.footprint, delta) {
            return false;
        }
        vitals.footprint = vitals.footprint.translated(delta);
        true
    }
}
