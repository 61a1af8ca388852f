//! Stochastic arrival of animals and vegetables.
//!
//! Each kind has a countdown timer. Every tick the timer drops by one; while
//! it is at or below zero an entity is spawned and a fresh exponential
//! interval is added. At most [`MAX_SPAWNS_PER_TICK`] arrivals happen per
//! kind per tick, so a huge rate cannot stall a tick.

use std::sync::Arc;

use habitat_agents::vegetable::PLANT_SIZE;
use habitat_agents::{AgentError, AgentRef, Animal, ObjectRef, SharedWorld, Vegetable};
use habitat_types::{AnimalKind, EntityKind, Position, VegetableKind};
use habitat_world::Occupant;
use rand::Rng;
use rand_distr::{Distribution, Exp};
use tracing::trace;

use crate::parameters::SimulationParameters;

/// Arrivals per kind per tick.
pub const MAX_SPAWNS_PER_TICK: u32 = 5;

/// Random positions tried before a spawn attempt gives up.
pub const SPAWN_PROBES: u32 = 10;

/// Minimum distance between a new animal and any alive entity center.
pub const ANIMAL_SEPARATION: f64 = 40.0;

/// Minimum distance between a new vegetable and any alive entity center.
pub const PLANT_SEPARATION: f64 = 20.0;

/// Time until the next arrival of a Poisson process with `rate` arrivals
/// per tick. A non-positive or non-finite rate never arrives.
pub fn arrival_interval<R: Rng + ?Sized>(rate: f64, rng: &mut R) -> f64 {
    if !rate.is_finite() || rate <= 0.0 {
        return f64::INFINITY;
    }
    Exp::new(rate).map_or(f64::INFINITY, |exp| exp.sample(rng))
}

/// Animal species roll: 60% chicken, 30% cow, 10% bull.
pub fn roll_animal_kind<R: Rng + ?Sized>(rng: &mut R) -> AnimalKind {
    let roll: f64 = rng.random();
    if roll < 0.6 {
        AnimalKind::Chicken
    } else if roll < 0.9 {
        AnimalKind::Cow
    } else {
        AnimalKind::Bull
    }
}

/// Vegetable species roll: 50% berry, 30% lettuce, 20% carrot.
pub fn roll_vegetable_kind<R: Rng + ?Sized>(rng: &mut R) -> VegetableKind {
    let roll: f64 = rng.random();
    if roll < 0.5 {
        VegetableKind::Berry
    } else if roll < 0.8 {
        VegetableKind::Lettuce
    } else {
        VegetableKind::Carrot
    }
}

/// Uniform top-left corner for a square of `size` that fits in the world.
fn random_corner<R: Rng + ?Sized>(world: &SharedWorld, size: f64, rng: &mut R) -> (f64, f64) {
    let env = world.environment();
    let x = rng.random::<f64>() * (env.width() - size).max(0.0);
    let y = rng.random::<f64>() * (env.height() - size).max(0.0);
    (x, y)
}

const fn center_of(x: f64, y: f64, size: f64) -> Position {
    Position::new(x + size / 2.0, y + size / 2.0)
}

fn cap(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

/// How many entities one [`Spawner::tick`] added.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Animals admitted.
    pub animals: u32,
    /// Vegetables admitted.
    pub plants: u32,
}

/// Arrival timers and population caps.
#[derive(Debug, Clone)]
pub struct Spawner {
    animal_rate: f64,
    plant_rate: f64,
    max_animals: u32,
    max_plants: u32,
    animal_timer: f64,
    plant_timer: f64,
}

impl Spawner {
    /// Build a spawner and draw the first interval of each timer.
    pub fn new<R: Rng + ?Sized>(params: &SimulationParameters, rng: &mut R) -> Self {
        Self {
            animal_rate: params.animal_rate,
            plant_rate: params.plant_rate,
            max_animals: params.max_animals,
            max_plants: params.max_plants,
            animal_timer: arrival_interval(params.animal_rate, rng),
            plant_timer: arrival_interval(params.plant_rate, rng),
        }
    }

    /// Whether neither kind can ever arrive again.
    pub const fn is_exhausted(&self) -> bool {
        self.animal_timer.is_infinite() && self.plant_timer.is_infinite()
    }

    /// Advance both timers by one tick and spawn whatever is due.
    ///
    /// A spawn that finds no free spot still consumes its arrival.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if an admission fails.
    pub fn tick<R: Rng + ?Sized>(
        &mut self,
        world: &Arc<SharedWorld>,
        rng: &mut R,
    ) -> Result<SpawnReport, AgentError> {
        let mut report = SpawnReport::default();

        self.animal_timer -= 1.0;
        let mut arrivals = 0_u32;
        while self.animal_timer <= 0.0 && arrivals < MAX_SPAWNS_PER_TICK {
            if self.spawn_animal(world, rng)?.is_some() {
                report.animals = report.animals.saturating_add(1);
            }
            self.animal_timer += arrival_interval(self.animal_rate, rng);
            arrivals = arrivals.saturating_add(1);
        }

        self.plant_timer -= 1.0;
        let mut arrivals = 0_u32;
        while self.plant_timer <= 0.0 && arrivals < MAX_SPAWNS_PER_TICK {
            if self.spawn_plant(world, rng)?.is_some() {
                report.plants = report.plants.saturating_add(1);
            }
            self.plant_timer += arrival_interval(self.plant_rate, rng);
            arrivals = arrivals.saturating_add(1);
        }

        Ok(report)
    }

    /// Try to place one animal of a random species.
    ///
    /// Returns `Ok(None)` when the cap is reached or no probe found a spot
    /// at least [`ANIMAL_SEPARATION`] from every alive entity.
    pub fn spawn_animal<R: Rng + ?Sized>(
        &self,
        world: &Arc<SharedWorld>,
        rng: &mut R,
    ) -> Result<Option<AgentRef>, AgentError> {
        let env = world.environment();
        let alive = env
            .agents()
            .iter()
            .filter(|a| a.kind() == EntityKind::Animal && a.is_alive())
            .count();
        if alive >= cap(self.max_animals) {
            return Ok(None);
        }

        for _ in 0..SPAWN_PROBES {
            let kind = roll_animal_kind(rng);
            let size = kind.size();
            if size > env.width() || size > env.height() {
                continue;
            }
            let (x, y) = random_corner(world, size, rng);
            if env.is_location_free(center_of(x, y, size), ANIMAL_SEPARATION) {
                let animal = Animal::new(kind, x, y, rng.random());
                let cell = world.admit_agent(animal)?;
                trace!(agent_id = %cell.id(), ?kind, "Animal spawned");
                return Ok(Some(cell));
            }
        }
        Ok(None)
    }

    /// Try to place one vegetable of a random species.
    ///
    /// Returns `Ok(None)` when the cap is reached or no probe found a spot
    /// at least [`PLANT_SEPARATION`] from every alive entity.
    pub fn spawn_plant<R: Rng + ?Sized>(
        &self,
        world: &Arc<SharedWorld>,
        rng: &mut R,
    ) -> Result<Option<ObjectRef>, AgentError> {
        let env = world.environment();
        let alive = env.objects().iter().filter(|o| o.is_alive()).count();
        if alive >= cap(self.max_plants) {
            return Ok(None);
        }

        let kind = roll_vegetable_kind(rng);
        for _ in 0..SPAWN_PROBES {
            let (x, y) = random_corner(world, PLANT_SIZE, rng);
            if env.is_location_free(center_of(x, y, PLANT_SIZE), PLANT_SEPARATION) {
                let object = world.admit_object(Vegetable::new(kind, x, y))?;
                trace!(object_id = %object.id(), ?kind, "Vegetable spawned");
                return Ok(Some(object));
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use habitat_agents::WorldEnvironment;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn world() -> Arc<SharedWorld> {
        SharedWorld::new(WorldEnvironment::new(800.0, 600.0).unwrap())
    }

    fn params(animal_rate: f64, plant_rate: f64) -> SimulationParameters {
        SimulationParameters {
            animal_rate,
            plant_rate,
            ..SimulationParameters::default()
        }
    }

    #[test]
    fn disabled_rate_never_arrives() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(arrival_interval(0.0, &mut rng).is_infinite());
        assert!(arrival_interval(-3.0, &mut rng).is_infinite());
        assert!(arrival_interval(0.5, &mut rng).is_finite());
    }

    #[test]
    fn disabled_spawner_is_exhausted_and_idle() {
        let mut rng = StdRng::seed_from_u64(2);
        let world = world();
        let mut spawner = Spawner::new(&params(0.0, -1.0), &mut rng);
        assert!(spawner.is_exhausted());
        for _ in 0..50 {
            assert_eq!(spawner.tick(&world, &mut rng).unwrap(), SpawnReport::default());
        }
        assert_eq!(world.environment().agent_count(), 0);
        assert_eq!(world.environment().object_count(), 0);
    }

    #[test]
    fn huge_rate_is_bounded_per_tick() {
        let mut rng = StdRng::seed_from_u64(3);
        let world = world();
        let mut spawner = Spawner::new(&params(1e9, 1e9), &mut rng);
        let report = spawner.tick(&world, &mut rng).unwrap();
        assert!(report.animals <= MAX_SPAWNS_PER_TICK);
        assert!(report.plants <= MAX_SPAWNS_PER_TICK);
        assert!(report.plants > 0);
    }

    #[test]
    fn caps_count_only_alive_entities() {
        let mut rng = StdRng::seed_from_u64(4);
        let world = world();
        let spawner = Spawner::new(
            &SimulationParameters {
                max_plants: 1,
                ..params(0.0, 0.0)
            },
            &mut rng,
        );

        let first = spawner.spawn_plant(&world, &mut rng).unwrap().unwrap();
        assert!(spawner.spawn_plant(&world, &mut rng).unwrap().is_none());

        assert!(first.as_vegetable().unwrap().consume());
        assert!(spawner.spawn_plant(&world, &mut rng).unwrap().is_some());
    }

    #[test]
    fn crowded_world_rejects_spawns() {
        let mut rng = StdRng::seed_from_u64(5);
        let world = SharedWorld::new(WorldEnvironment::new(30.0, 30.0).unwrap());
        let spawner = Spawner::new(&params(0.0, 0.0), &mut rng);

        world.admit_object(Vegetable::new(VegetableKind::Berry, 7.0, 7.0)).unwrap();
        assert!(spawner.spawn_plant(&world, &mut rng).unwrap().is_none());
        assert!(spawner.spawn_animal(&world, &mut rng).unwrap().is_none());
    }

    #[test]
    fn spawned_entities_fit_in_the_world() {
        let mut rng = StdRng::seed_from_u64(6);
        let world = world();
        let spawner = Spawner::new(&params(0.0, 0.0), &mut rng);
        for _ in 0..30 {
            spawner.spawn_animal(&world, &mut rng).unwrap();
            spawner.spawn_plant(&world, &mut rng).unwrap();
        }
        for agent in world.environment().agents() {
            assert!(agent.view().footprint.fits_within(800.0, 600.0));
            assert_eq!(agent.view().name, "Wild");
        }
        for object in world.environment().objects() {
            assert!(object.footprint().fits_within(800.0, 600.0));
        }
    }

    #[test]
    fn kind_rolls_cover_every_species() {
        let mut rng = StdRng::seed_from_u64(7);
        let animals: Vec<_> = (0..500).map(|_| roll_animal_kind(&mut rng)).collect();
        let plants: Vec<_> = (0..500).map(|_| roll_vegetable_kind(&mut rng)).collect();
        for kind in [AnimalKind::Chicken, AnimalKind::Cow, AnimalKind::Bull] {
            assert!(animals.contains(&kind));
        }
        for kind in [VegetableKind::Berry, VegetableKind::Lettuce, VegetableKind::Carrot] {
            assert!(plants.contains(&kind));
        }
        let chickens = animals.iter().filter(|k| **k == AnimalKind::Chicken).count();
        assert!(chickens > animals.len() / 2 - 50);
    }
}
