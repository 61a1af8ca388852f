//! Per-tick population counts.

use habitat_agents::{Agent, Creature, WorldEnvironment};
use habitat_types::TickRecord;
use habitat_world::Occupant;

/// Count living humans (per profile), animals and uneaten vegetables.
pub fn record_tick(tick: u64, env: &WorldEnvironment) -> TickRecord {
    let mut record = TickRecord {
        tick,
        ..TickRecord::default()
    };

    for cell in env.agents() {
        let agent = cell.lock();
        match &*agent {
            Agent::Human(human) if human.is_alive() => record.count_human(human.profile()),
            Agent::Animal(animal) if animal.is_alive() => {
                record.animals_alive = record.animals_alive.saturating_add(1);
            }
            _ => {}
        }
    }

    let vegetables = env.objects().iter().filter(|o| o.is_alive()).count();
    record.vegetables_alive = u32::try_from(vegetables).unwrap_or(u32::MAX);
    record
}
