//! The simulation orchestrator.
//!
//! [`Simulation`] owns the shared world, the seeded random source, the
//! spawner and the history of per-tick records. Its lifecycle is
//! `Unconfigured -> Configured -> Running -> Stopped`, and `Stopped` is
//! terminal.
//!
//! # Tick pipeline
//!
//! Each [`Simulation::step`] runs, in order:
//!
//! 1. Advance the tick counter (stop instead if the limit is reached).
//! 2. Snapshot the alive agents and run the tick barrier over them.
//! 3. Spawn due animals and vegetables.
//! 4. Sweep dead agents (stopping their tasks) and eaten vegetables.
//! 5. Append a [`TickRecord`].

use std::sync::Arc;

use habitat_agents::human::HUMAN_SIZE;
use habitat_agents::{Agent, AgentRef, Human, Object, ObjectRef, SharedWorld, WorldEnvironment};
use habitat_types::{AgentView, EntityId, ObjectView, TickRecord};
use habitat_world::Occupant;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::barrier;
use crate::error::SimulationError;
use crate::parameters::SimulationParameters;
use crate::profiles::ProfileDistribution;
use crate::spawner::Spawner;
use crate::stats;

/// Where a [`Simulation`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationPhase {
    /// No parameters yet.
    Unconfigured,
    /// Parameters set, world built, nothing started.
    Configured,
    /// Agent tasks are running and `step` advances time.
    Running,
    /// Stopped for good.
    Stopped,
}

/// State that exists once parameters are set.
#[derive(Debug)]
struct Setup {
    params: SimulationParameters,
    world: Arc<SharedWorld>,
    rng: StdRng,
    profiles: ProfileDistribution,
    spawner: Spawner,
}

/// A Humans, Animals and Vegetables world advanced one tick at a time.
#[derive(Debug)]
pub struct Simulation {
    setup: Option<Setup>,
    phase: SimulationPhase,
    tick: u64,
    history: Vec<TickRecord>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// An unconfigured simulation.
    pub const fn new() -> Self {
        Self {
            setup: None,
            phase: SimulationPhase::Unconfigured,
            tick: 0,
            history: Vec::new(),
        }
    }

    /// Configure the run and build an empty world. May be called again
    /// until [`Simulation::start`], each call replacing the previous world.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::AlreadyStarted`] once started, or
    /// [`SimulationError::InvalidConfig`] for unusable parameters.
    pub fn set_parameters(&mut self, params: SimulationParameters) -> Result<(), SimulationError> {
        if matches!(self.phase, SimulationPhase::Running | SimulationPhase::Stopped) {
            return Err(SimulationError::AlreadyStarted);
        }
        params.validate()?;

        let environment = WorldEnvironment::new(params.world_width, params.world_height)?;
        let mut rng = StdRng::seed_from_u64(params.seed);
        let profiles = ProfileDistribution::from_weights(&params.profile_weights);
        let spawner = Spawner::new(&params, &mut rng);
        debug!(
            seed = params.seed,
            width = params.world_width,
            height = params.world_height,
            max_ticks = params.max_ticks,
            "Simulation configured"
        );

        self.setup = Some(Setup {
            params,
            world: SharedWorld::new(environment),
            rng,
            profiles,
            spawner,
        });
        self.phase = SimulationPhase::Configured;
        self.tick = 0;
        self.history.clear();
        Ok(())
    }

    /// Place the initial population, start every agent task, and begin
    /// accepting [`Simulation::step`] calls.
    ///
    /// Initial humans are placed uniformly without a free-location check;
    /// initial animals and vegetables go through the spawner's probing and
    /// may therefore fall short of the requested count.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NotConfigured`] before
    /// [`Simulation::set_parameters`], [`SimulationError::AlreadyStarted`]
    /// when called twice, and [`SimulationError::NoRuntime`] outside tokio.
    pub fn start(&mut self) -> Result<(), SimulationError> {
        match self.phase {
            SimulationPhase::Unconfigured => return Err(SimulationError::NotConfigured),
            SimulationPhase::Running | SimulationPhase::Stopped => {
                return Err(SimulationError::AlreadyStarted);
            }
            SimulationPhase::Configured => {}
        }
        let setup = self.setup.as_mut().ok_or(SimulationError::NotConfigured)?;
        tokio::runtime::Handle::try_current()
            .map_err(|source| SimulationError::NoRuntime { source })?;

        let world = Arc::clone(&setup.world);
        let (width, height) = (world.environment().width(), world.environment().height());

        for index in 0..setup.params.initial_humans {
            let profile = setup.profiles.sample(&mut setup.rng);
            let x = setup.rng.random::<f64>() * (width - HUMAN_SIZE).max(0.0);
            let y = setup.rng.random::<f64>() * (height - HUMAN_SIZE).max(0.0);
            let seed = setup.rng.random();
            world.admit_agent(Human::new(format!("H-{index}"), x, y, profile, seed))?;
        }
        for _ in 0..setup.params.initial_animals {
            setup.spawner.spawn_animal(&world, &mut setup.rng)?;
        }
        for _ in 0..setup.params.initial_plants {
            setup.spawner.spawn_plant(&world, &mut setup.rng)?;
        }

        world.set_running(true);
        let started = world.start_all()?;
        self.phase = SimulationPhase::Running;

        info!(
            agents = started,
            objects = world.environment().object_count(),
            seed = setup.params.seed,
            "Simulation started"
        );
        Ok(())
    }

    /// Advance one tick. A no-op unless running.
    ///
    /// Reaching the tick limit stops the simulation instead of running the
    /// tick, so a limit of `N` records `N - 1` ticks.
    pub async fn step(&mut self) {
        if self.phase != SimulationPhase::Running {
            return;
        }
        self.tick = self.tick.saturating_add(1);
        let tick = self.tick;

        let Some(setup) = self.setup.as_mut() else {
            return;
        };
        let max_ticks = setup.params.max_ticks;
        if max_ticks > 0 && tick >= max_ticks {
            info!(tick, max_ticks, "Tick limit reached");
            self.stop();
            return;
        }

        let world = Arc::clone(&setup.world);
        let env = world.environment();

        let alive: Vec<AgentRef> = env.agents().into_iter().filter(|a| a.is_alive()).collect();
        let signaled = barrier::run_tick(&alive, tick).await;

        match setup.spawner.tick(&world, &mut setup.rng) {
            Ok(report) if report.animals > 0 || report.plants > 0 => {
                debug!(tick, animals = report.animals, plants = report.plants, "Spawned");
            }
            Ok(_) => {}
            Err(err) => warn!(tick, error = %err, "Spawning failed"),
        }

        for dead in env.prune_dead_agents() {
            dead.stop();
            dead.join().await;
            debug!(tick, agent_id = %dead.id(), kind = ?dead.kind(), "Agent removed");
        }
        env.prune_dead_objects();

        let record = stats::record_tick(tick, env);
        debug!(
            tick,
            signaled,
            humans_alive = record.humans_alive,
            animals_alive = record.animals_alive,
            vegetables_alive = record.vegetables_alive,
            "Tick complete"
        );
        self.history.push(record);
    }

    /// Stop the run and signal every agent task to exit. Idempotent; a
    /// simulation that never started is left untouched.
    pub fn stop(&mut self) {
        if self.phase != SimulationPhase::Running {
            return;
        }
        self.phase = SimulationPhase::Stopped;
        if let Some(setup) = &self.setup {
            setup.world.set_running(false);
            let signaled = setup.world.stop_all();
            info!(tick = self.tick, signaled, "Simulation stopped");
        }
    }

    /// Stop (if still running) and wait for every agent task to exit.
    pub async fn shutdown(&mut self) {
        self.stop();
        let Some(setup) = &self.setup else {
            return;
        };
        for agent in setup.world.environment().agents() {
            agent.stop();
            agent.join().await;
        }
        debug!("All agent tasks joined");
    }

    /// Admit an agent built by the caller. While running, its task starts
    /// immediately and it joins from the next tick.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NotConfigured`] before parameters are set.
    pub fn add_agent(&self, agent: impl Into<Agent>) -> Result<AgentRef, SimulationError> {
        let setup = self.setup.as_ref().ok_or(SimulationError::NotConfigured)?;
        Ok(setup.world.admit_agent(agent)?)
    }

    /// Admit an object built by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SimulationError::NotConfigured`] before parameters are set.
    pub fn add_object(&self, object: impl Into<Object>) -> Result<ObjectRef, SimulationError> {
        let setup = self.setup.as_ref().ok_or(SimulationError::NotConfigured)?;
        Ok(setup.world.admit_object(object)?)
    }

    // -----------------------------------------------------------------------
    // Telemetry
    // -----------------------------------------------------------------------

    /// Lifecycle phase.
    pub const fn phase(&self) -> SimulationPhase {
        self.phase
    }

    /// Whether `step` currently advances time.
    pub fn is_running(&self) -> bool {
        self.phase == SimulationPhase::Running
    }

    /// The tick counter. Equals the last recorded tick, or the limit once
    /// it has been reached.
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Records of every completed tick, oldest first.
    pub fn history(&self) -> &[TickRecord] {
        &self.history
    }

    /// The history as a JSON array.
    pub fn history_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.history)
    }

    /// The configured parameters.
    pub fn parameters(&self) -> Option<&SimulationParameters> {
        self.setup.as_ref().map(|s| &s.params)
    }

    /// The shared world, once configured.
    pub fn world(&self) -> Option<&Arc<SharedWorld>> {
        self.setup.as_ref().map(|s| &s.world)
    }

    /// The highest id issued so far.
    pub fn last_issued_id(&self) -> EntityId {
        self.setup
            .as_ref()
            .map_or(EntityId::UNASSIGNED, |s| s.world.ids().last_issued())
    }

    /// Owned views of every registered agent, including those that died
    /// this tick and have not been swept yet.
    pub fn agents(&self) -> Vec<AgentView> {
        self.setup.as_ref().map_or_else(Vec::new, |s| {
            s.world
                .environment()
                .agents()
                .iter()
                .map(|a| a.view())
                .collect()
        })
    }

    /// Owned views of every registered object.
    pub fn objects(&self) -> Vec<ObjectView> {
        self.setup.as_ref().map_or_else(Vec::new, |s| {
            s.world
                .environment()
                .objects()
                .iter()
                .map(|o| o.view())
                .collect()
        })
    }

    /// Whether nothing is alive and nothing can ever spawn again.
    pub fn is_extinct(&self) -> bool {
        let Some(setup) = &self.setup else {
            return false;
        };
        let env = setup.world.environment();
        setup.spawner.is_exhausted()
            && !env.agents().iter().any(Occupant::is_alive)
            && !env.objects().iter().any(Occupant::is_alive)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use habitat_types::EntityKind;

    use super::*;

    fn params() -> SimulationParameters {
        SimulationParameters {
            initial_humans: 3,
            initial_animals: 2,
            initial_plants: 4,
            max_ticks: 0,
            ..SimulationParameters::default()
        }
    }

    #[test]
    fn start_requires_parameters() {
        let mut sim = Simulation::new();
        assert!(matches!(sim.start(), Err(SimulationError::NotConfigured)));
        assert_eq!(sim.phase(), SimulationPhase::Unconfigured);
    }

    #[test]
    fn invalid_parameters_leave_simulation_unconfigured() {
        let mut sim = Simulation::new();
        let bad = SimulationParameters {
            world_width: -5.0,
            ..params()
        };
        assert!(matches!(
            sim.set_parameters(bad),
            Err(SimulationError::InvalidConfig { .. })
        ));
        assert_eq!(sim.phase(), SimulationPhase::Unconfigured);
    }

    #[test]
    fn start_outside_runtime_is_rejected() {
        let mut sim = Simulation::new();
        sim.set_parameters(params()).unwrap();
        assert!(matches!(sim.start(), Err(SimulationError::NoRuntime { .. })));
        assert_eq!(sim.phase(), SimulationPhase::Configured);
    }

    #[tokio::test]
    async fn start_places_initial_population() {
        let mut sim = Simulation::new();
        sim.set_parameters(params()).unwrap();
        sim.start().unwrap();

        let agents = sim.agents();
        let humans: Vec<_> = agents
            .iter()
            .filter(|a| a.kind == EntityKind::Human)
            .collect();
        assert_eq!(humans.len(), 3);
        assert!(humans.iter().any(|h| h.name == "H-0"));
        assert!(humans.iter().all(|h| h.footprint.fits_within(800.0, 600.0)));
        assert!(agents.len() <= 5);
        assert!(sim.objects().len() <= 4);
        assert!(sim.is_running());

        assert!(matches!(sim.start(), Err(SimulationError::AlreadyStarted)));
        assert!(matches!(
            sim.set_parameters(params()),
            Err(SimulationError::AlreadyStarted)
        ));
        sim.shutdown().await;
    }

    #[tokio::test]
    async fn same_seed_same_initial_world() {
        let mut a = Simulation::new();
        let mut b = Simulation::new();
        a.set_parameters(params()).unwrap();
        b.set_parameters(params()).unwrap();
        a.start().unwrap();
        b.start().unwrap();

        assert_eq!(a.agents(), b.agents());
        assert_eq!(a.objects(), b.objects());
        a.shutdown().await;
        b.shutdown().await;
    }

    #[tokio::test]
    async fn step_is_noop_before_start() {
        let mut sim = Simulation::new();
        sim.set_parameters(params()).unwrap();
        sim.step().await;
        assert_eq!(sim.current_tick(), 0);
        assert!(sim.history().is_empty());
    }

    #[tokio::test]
    async fn history_serializes_to_json_array() {
        let mut sim = Simulation::new();
        sim.set_parameters(params()).unwrap();
        sim.start().unwrap();
        sim.step().await;
        sim.step().await;
        sim.shutdown().await;

        let json = sim.history_json().unwrap();
        let parsed: Vec<TickRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed.last().map(|r| r.tick), Some(2));
    }

    #[tokio::test]
    async fn empty_world_without_spawning_is_extinct() {
        let mut sim = Simulation::new();
        sim.set_parameters(SimulationParameters {
            initial_humans: 0,
            initial_animals: 0,
            initial_plants: 0,
            animal_rate: 0.0,
            plant_rate: 0.0,
            ..SimulationParameters::default()
        })
        .unwrap();
        assert!(sim.is_extinct());

        sim.set_parameters(params()).unwrap();
        assert!(!sim.is_extinct());
    }
}
