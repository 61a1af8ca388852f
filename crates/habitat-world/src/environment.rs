//! The bounded world and its live collections.
//!
//! [`Environment`] owns the agent and object collections behind a single
//! read/write lock. Structural mutation (admission, sweeps) takes the
//! write side; consistency-sensitive reads (free-location probing, lookups,
//! snapshots) take the read side.
//!
//! # Lock discipline
//!
//! The environment lock is always acquired *before* any per-occupant lock
//! that [`Occupant::is_alive`] or [`Occupant::center`] may take. Occupant
//! implementations must therefore never call back into the environment
//! while holding their own lock.
//!
//! Dead entries are not removed during a tick. They stay enumerable until
//! the orchestrator runs [`Environment::prune_dead_agents`] and
//! [`Environment::prune_dead_objects`] after the tick barrier.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use habitat_types::{BoundingBox, EntityId, Position, Vector};
use tracing::trace;

use crate::error::WorldError;

/// The minimal view the world needs of anything standing in it.
pub trait Occupant: Send + Sync {
    /// Identifier issued on admission.
    fn occupant_id(&self) -> EntityId;

    /// Whether the occupant still counts as present.
    fn is_alive(&self) -> bool;

    /// Center of the occupant's footprint.
    fn center(&self) -> Position;
}

impl<T: Occupant + ?Sized> Occupant for Arc<T> {
    fn occupant_id(&self) -> EntityId {
        (**self).occupant_id()
    }

    fn is_alive(&self) -> bool {
        (**self).is_alive()
    }

    fn center(&self) -> Position {
        (**self).center()
    }
}

/// The collections guarded by the environment lock.
#[derive(Debug)]
struct Population<A, O> {
    agents: Vec<A>,
    objects: Vec<O>,
}

/// A fixed-size rectangular world holding agents of type `A` and objects
/// of type `O`.
///
/// `A` and `O` are usually cheap shared handles (`Arc<...>`); snapshots
/// clone the handles, not the entities.
#[derive(Debug)]
pub struct Environment<A, O> {
    /// World width in units.
    width: f64,
    /// World height in units.
    height: f64,
    /// Live collections.
    population: RwLock<Population<A, O>>,
}

impl<A, O> Environment<A, O>
where
    A: Occupant + Clone,
    O: Occupant + Clone,
{
    /// Create an empty world of the given size.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if either side is not a
    /// positive finite number.
    pub fn new(width: f64, height: f64) -> Result<Self, WorldError> {
        let valid = |side: f64| side.is_finite() && side > 0.0;
        if !valid(width) || !valid(height) {
            return Err(WorldError::InvalidDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            population: RwLock::new(Population {
                agents: Vec::new(),
                objects: Vec::new(),
            }),
        })
    }

    /// World width.
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// World height.
    pub const fn height(&self) -> f64 {
        self.height
    }

    fn read(&self) -> RwLockReadGuard<'_, Population<A, O>> {
        self.population.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Population<A, O>> {
        self.population.write().unwrap_or_else(PoisonError::into_inner)
    }

    // -----------------------------------------------------------------------
    // Structural mutation
    // -----------------------------------------------------------------------

    /// Append an agent.
    pub fn add_agent(&self, agent: A) {
        self.write().agents.push(agent);
    }

    /// Append an object.
    pub fn add_object(&self, object: O) {
        self.write().objects.push(object);
    }

    /// Remove the object with `id`, whatever its state.
    pub fn remove_object(&self, id: EntityId) {
        self.write().objects.retain(|o| o.occupant_id() != id);
    }

    /// Drop every dead agent and return the removed handles.
    pub fn prune_dead_agents(&self) -> Vec<A> {
        let mut population = self.write();
        let (alive, dead): (Vec<A>, Vec<A>) = std::mem::take(&mut population.agents)
            .into_iter()
            .partition(|a| a.is_alive());
        population.agents = alive;
        if !dead.is_empty() {
            trace!(removed = dead.len(), "Pruned dead agents");
        }
        dead
    }

    /// Drop every consumed object and return how many were removed.
    pub fn prune_dead_objects(&self) -> usize {
        let mut population = self.write();
        let before = population.objects.len();
        population.objects.retain(|o| o.is_alive());
        let removed = before.saturating_sub(population.objects.len());
        if removed > 0 {
            trace!(removed, "Pruned dead objects");
        }
        removed
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Whether `footprint` moved by `delta` stays inside
    /// `[0, width] x [0, height]`. Invalid moves simply yield `false`.
    ///
    /// Does not take the environment lock: width and height are fixed at
    /// construction and are the only state read here.
    pub const fn is_inside_bounds(&self, footprint: &BoundingBox, delta: Vector) -> bool {
        footprint
            .translated(delta)
            .fits_within(self.width, self.height)
    }

    /// Whether no alive agent or object center lies strictly within
    /// `min_distance` of `point`. Linear in the population size.
    pub fn is_location_free(&self, point: Position, min_distance: f64) -> bool {
        let population = self.read();
        let too_close = |center: Position| center.distance_to(point) < min_distance;

        let agent_blocks = population
            .agents
            .iter()
            .any(|a| a.is_alive() && too_close(a.center()));
        if agent_blocks {
            return false;
        }
        !population
            .objects
            .iter()
            .any(|o| o.is_alive() && too_close(o.center()))
    }

    /// Snapshot of every registered agent handle, dead ones included.
    pub fn agents(&self) -> Vec<A> {
        self.read().agents.clone()
    }

    /// Snapshot of every registered object handle, consumed ones included.
    pub fn objects(&self) -> Vec<O> {
        self.read().objects.clone()
    }

    /// Look up a registered agent by id.
    pub fn find_agent(&self, id: EntityId) -> Option<A> {
        self.read()
            .agents
            .iter()
            .find(|a| a.occupant_id() == id)
            .cloned()
    }

    /// Look up a registered object by id.
    pub fn find_object(&self, id: EntityId) -> Option<O> {
        self.read()
            .objects
            .iter()
            .find(|o| o.occupant_id() == id)
            .cloned()
    }

    /// Number of registered agents, dead ones included.
    pub fn agent_count(&self) -> usize {
        self.read().agents.len()
    }

    /// Number of registered objects, consumed ones included.
    pub fn object_count(&self) -> usize {
        self.read().objects.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;

    #[derive(Debug)]
    struct Marker {
        id: EntityId,
        at: Position,
        alive: AtomicBool,
    }

    impl Marker {
        fn new(id: u64, x: f64, y: f64) -> Arc<Self> {
            Arc::new(Self {
                id: EntityId(id),
                at: Position::new(x, y),
                alive: AtomicBool::new(true),
            })
        }

        fn kill(&self) {
            self.alive.store(false, Ordering::Release);
        }
    }

    impl Occupant for Marker {
        fn occupant_id(&self) -> EntityId {
            self.id
        }

        fn is_alive(&self) -> bool {
            self.alive.load(Ordering::Acquire)
        }

        fn center(&self) -> Position {
            self.at
        }
    }

    type TestEnv = Environment<Arc<Marker>, Arc<Marker>>;

    fn world() -> TestEnv {
        Environment::new(800.0, 600.0).unwrap()
    }

    #[test]
    fn rejects_degenerate_dimensions() {
        assert!(TestEnv::new(0.0, 600.0).is_err());
        assert!(TestEnv::new(800.0, -1.0).is_err());
        assert!(TestEnv::new(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn bounds_check_allows_edges_and_rejects_exits() {
        let env = world();
        let footprint = BoundingBox::new(0.0, 0.0, 16.0, 16.0);
        assert!(env.is_inside_bounds(&footprint, Vector::new(784.0, 584.0)));
        assert!(!env.is_inside_bounds(&footprint, Vector::new(-0.5, 0.0)));
        assert!(!env.is_inside_bounds(&footprint, Vector::new(0.0, 584.5)));
    }

    #[test]
    fn location_free_ignores_dead_entries() {
        let env = world();
        let agent = Marker::new(1, 100.0, 100.0);
        let plant = Marker::new(2, 300.0, 300.0);
        env.add_agent(Arc::clone(&agent));
        env.add_object(Arc::clone(&plant));

        assert!(!env.is_location_free(Position::new(110.0, 100.0), 20.0));
        assert!(!env.is_location_free(Position::new(300.0, 315.0), 20.0));
        assert!(env.is_location_free(Position::new(200.0, 200.0), 20.0));

        agent.kill();
        plant.kill();
        assert!(env.is_location_free(Position::new(110.0, 100.0), 20.0));
        assert!(env.is_location_free(Position::new(300.0, 315.0), 20.0));
    }

    #[test]
    fn dead_entries_survive_until_pruned() {
        let env = world();
        let a = Marker::new(1, 0.0, 0.0);
        let b = Marker::new(2, 10.0, 0.0);
        let veg = Marker::new(3, 50.0, 50.0);
        env.add_agent(Arc::clone(&a));
        env.add_agent(Arc::clone(&b));
        env.add_object(Arc::clone(&veg));

        a.kill();
        veg.kill();
        assert_eq!(env.agent_count(), 2);
        assert!(env.find_object(EntityId(3)).is_some());

        let removed = env.prune_dead_agents();
        assert_eq!(removed.len(), 1);
        assert_eq!(removed.first().map(|m| m.id), Some(EntityId(1)));
        assert_eq!(env.prune_dead_objects(), 1);

        assert_eq!(env.agent_count(), 1);
        assert!(env.find_agent(EntityId(2)).is_some());
        assert!(env.find_object(EntityId(3)).is_none());
    }

    #[test]
    fn remove_object_by_id() {
        let env = world();
        env.add_object(Marker::new(5, 0.0, 0.0));
        env.add_object(Marker::new(6, 0.0, 0.0));
        env.remove_object(EntityId(5));
        assert_eq!(env.object_count(), 1);
        assert!(env.find_object(EntityId(6)).is_some());
        assert!(env.find_object(EntityId(5)).is_none());
    }
}
