//! The state every agent task shares: the environment, the global id
//! counter, and whether the simulation is running.
//!
//! Admission goes through [`SharedWorld`] so that id assignment,
//! registration, and task start happen in one place, both for the initial
//! population and for children born mid-tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use habitat_types::EntityId;
use tracing::{debug, trace};

use crate::agent::{Agent, AgentCell, AgentRef, ObjectRef, WorldEnvironment};
use crate::error::AgentError;
use crate::vegetable::Object;
use crate::vitals::Creature;

/// Monotonic source of entity ids. The first id issued is 1; ids are
/// never reused.
#[derive(Debug, Default)]
pub struct IdAllocator {
    last: AtomicU64,
}

impl IdAllocator {
    /// A counter that has issued nothing yet.
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    /// Issue the next id.
    pub fn next_id(&self) -> Result<EntityId, AgentError> {
        self.last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
            .map(|previous| EntityId(previous.saturating_add(1)))
            .map_err(|last| AgentError::IdSpaceExhausted {
                last: EntityId(last),
            })
    }

    /// The most recently issued id, [`EntityId::UNASSIGNED`] if none.
    pub fn last_issued(&self) -> EntityId {
        EntityId(self.last.load(Ordering::Acquire))
    }
}

/// Environment, id counter, and running flag shared by every task.
#[derive(Debug)]
pub struct SharedWorld {
    environment: WorldEnvironment,
    ids: IdAllocator,
    running: AtomicBool,
}

impl SharedWorld {
    /// Share `environment` with a fresh id counter, not yet running.
    pub fn new(environment: WorldEnvironment) -> Arc<Self> {
        Arc::new(Self {
            environment,
            ids: IdAllocator::new(),
            running: AtomicBool::new(false),
        })
    }

    /// The world.
    pub const fn environment(&self) -> &WorldEnvironment {
        &self.environment
    }

    /// The global id counter.
    pub const fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Whether newly admitted agents should start their task at once.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Flip the running flag.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::Release);
    }

    /// Assign the next id to `agent`, register it, and start its task if
    /// the simulation is already running.
    pub fn admit_agent(self: &Arc<Self>, agent: impl Into<Agent>) -> Result<AgentRef, AgentError> {
        let mut agent = agent.into();
        let id = self.ids.next_id()?;
        agent.set_id(id);
        let cell = Arc::new(AgentCell::new(agent));
        self.environment.add_agent(Arc::clone(&cell));
        if self.is_running() {
            cell.start(self)?;
        }
        trace!(agent_id = %id, kind = ?cell.kind(), "Agent admitted");
        Ok(cell)
    }

    /// Assign the next id to `object` and register it.
    pub fn admit_object(&self, object: impl Into<Object>) -> Result<ObjectRef, AgentError> {
        let mut object = object.into();
        let id = self.ids.next_id()?;
        object.set_id(id);
        let object = Arc::new(object);
        self.environment.add_object(Arc::clone(&object));
        trace!(object_id = %id, "Object admitted");
        Ok(object)
    }

    /// Start the task of every registered agent that has none yet.
    /// Returns how many tasks were spawned.
    pub fn start_all(self: &Arc<Self>) -> Result<usize, AgentError> {
        let mut started = 0_usize;
        for agent in self.environment.agents() {
            if agent.start(self)? {
                started = started.saturating_add(1);
            }
        }
        debug!(started, "Agent tasks started");
        Ok(started)
    }

    /// Signal every registered agent to stop. Returns how many had not
    /// been stopped before.
    pub fn stop_all(&self) -> usize {
        self.environment
            .agents()
            .iter()
            .filter(|agent| agent.stop())
            .count()
    }
}
