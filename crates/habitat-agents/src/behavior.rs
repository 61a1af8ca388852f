//! One agent's turn within a tick: perceive, decide, act.
//!
//! Perceive snapshots the world handles, reads neighbors one lock at a
//! time, and only then stores the result into the agent. Decide and act
//! follow in that order. Dead agents do nothing.

use std::sync::Arc;

use habitat_types::EntityKind;
use habitat_world::Occupant;

use crate::actions::execute;
use crate::agent::{Agent, AgentCell};
use crate::human::Human;
use crate::perception::{HumanPerception, scan_threats};
use crate::world::SharedWorld;

/// Run perceive, decide and act for `cell`.
pub(crate) fn run_tick(cell: &AgentCell, world: &Arc<SharedWorld>) {
    if !cell.is_alive() {
        return;
    }
    match cell.kind() {
        EntityKind::Human => {
            perceive_human(cell, world);
            cell.with_human(Human::decide);
            execute::act(cell, world);
        }
        EntityKind::Animal => {
            perceive_animal(cell, world);
            let mut agent = cell.lock();
            if let Agent::Animal(animal) = &mut *agent {
                animal.decide();
                animal.act(world.environment());
            }
        }
        EntityKind::Vegetable => {}
    }
}

fn perceive_human(cell: &AgentCell, world: &SharedWorld) {
    let eye = cell.center();
    let env = world.environment();
    let perception = HumanPerception::scan(cell.id(), eye, &env.agents(), &env.objects());
    cell.with_human(|h| h.set_perception(perception));
}

fn perceive_animal(cell: &AgentCell, world: &SharedWorld) {
    let eye = cell.center();
    let threats = scan_threats(eye, &world.environment().agents());
    cell.with_animal(|a| a.set_threats(threats));
}
