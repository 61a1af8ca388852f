//! Carrying out an adopted action against the shared world.
//!
//! Execution never fails. A target that is gone or dead by the time the
//! human reaches for it is "lost": the action is cleared and the next
//! decide phase chooses again. Contested targets are settled by the
//! target's own state: [`Vegetable::consume`] and animal death both flip
//! exactly once.
//!
//! [`Vegetable::consume`]: crate::vegetable::Vegetable::consume

use std::sync::Arc;

use habitat_types::{EntityId, EntityKind, Position};
use habitat_world::Occupant;
use tracing::{debug, trace, warn};

use super::HumanAction;
use crate::agent::{Agent, AgentCell, AgentRef, WorldEnvironment};
use crate::human::Human;
use crate::reproduction::{OFFSPRING_PER_MATING, REPRODUCTION_COST};
use crate::vegetable::Vegetable;
use crate::vitals::Creature;
use crate::world::SharedWorld;

/// Distance a human covers per tick.
pub const HUMAN_SPEED: f64 = 2.0;

/// A human this close to its target has arrived.
pub const ACTION_RANGE: f64 = 10.0;

/// Humans within `ACTION_RANGE * HUNT_ASSIST_FACTOR` of the prey join the
/// strike.
pub const HUNT_ASSIST_FACTOR: f64 = 1.5;

/// Damage dealt by a full-strength hunting party.
pub const FULL_STRIKE_DAMAGE: i32 = 20;

/// Damage dealt by an undermanned party.
pub const WEAK_STRIKE_DAMAGE: i32 = 10;

/// Damage a full-strength strike costs the initiating hunter.
pub const RETALIATION_DAMAGE: i32 = 4;

/// Hunger added by each step of a gather or hunt.
pub const MOVE_HUNGER_COST: u32 = 1;

/// Act phase for a human: upkeep, then one step of the current action.
pub(crate) fn act(cell: &AgentCell, world: &Arc<SharedWorld>) {
    let Some(action) = cell.with_human(Human::begin_act).flatten() else {
        return;
    };

    match action {
        HumanAction::Rest => {
            cell.with_human(Human::rest_step);
        }
        HumanAction::Gather { target } => gather(cell, world.environment(), target),
        HumanAction::Hunt { target } => hunt(cell, world.environment(), target),
        HumanAction::Reproduce { mate } => reproduce(cell, world, mate),
    }

    cell.with_human(Human::finish_act);
}

fn lose_target(cell: &AgentCell, target: EntityId) {
    cell.with_human(Human::clear_action);
    trace!(agent_id = %cell.id(), target = %target, "Target lost");
}

/// Move one step toward `destination`. Returns `true` once within
/// [`ACTION_RANGE`], in which case no step is taken.
fn step_towards(cell: &AgentCell, env: &WorldEnvironment, destination: Position) -> bool {
    cell.with_human(|h| {
        let here = h.center();
        if here.distance_to(destination) <= ACTION_RANGE {
            return true;
        }
        if let Some(step) = here.vector_to(destination).with_length(HUMAN_SPEED) {
            h.move_by(step, env);
        }
        false
    })
    .unwrap_or(false)
}

fn gather(cell: &AgentCell, env: &WorldEnvironment, target: EntityId) {
    let Some(object) = env.find_object(target).filter(|o| o.is_alive()) else {
        lose_target(cell, target);
        return;
    };

    let arrived = step_towards(cell, env, object.center());
    cell.with_human(|h| h.add_hunger(MOVE_HUNGER_COST));
    if !arrived {
        return;
    }

    let eaten = object
        .as_vegetable()
        .filter(|v| v.consume())
        .map(Vegetable::nutrition);
    cell.with_human(|h| {
        if let Some(nutrition) = eaten {
            h.relieve_hunger(nutrition);
        }
        h.clear_action();
    });
    match eaten {
        Some(nutrition) => trace!(agent_id = %cell.id(), target = %target, nutrition, "Vegetable eaten"),
        None => trace!(agent_id = %cell.id(), target = %target, "Vegetable taken by a rival"),
    }
}

fn hunt(cell: &AgentCell, env: &WorldEnvironment, target: EntityId) {
    let prey = env
        .find_agent(target)
        .filter(|a| a.kind() == EntityKind::Animal);
    let Some(prey) = prey else {
        lose_target(cell, target);
        return;
    };
    let sighted = prey
        .with_animal(|a| a.is_alive().then(|| (a.center(), a.required_hunters())))
        .flatten();
    let Some((prey_center, required)) = sighted else {
        lose_target(cell, target);
        return;
    };

    let arrived = step_towards(cell, env, prey_center);
    cell.with_human(|h| h.add_hunger(MOVE_HUNGER_COST));
    if !arrived {
        return;
    }

    let party = hunting_party(cell, env, prey_center);
    let party_size = u32::try_from(party.len()).unwrap_or(u32::MAX);
    let full_strength = party_size >= required;
    let damage = if full_strength {
        FULL_STRIKE_DAMAGE
    } else {
        WEAK_STRIKE_DAMAGE
    };

    // `None`: another hunter finished it first.
    let strike = prey
        .with_animal(|a| {
            if !a.is_alive() {
                return None;
            }
            let killed = a.damage(damage);
            Some(killed.then_some(a.nutrition()))
        })
        .flatten();
    let Some(kill) = strike else {
        lose_target(cell, target);
        return;
    };

    if full_strength {
        cell.with_human(|h| h.damage(RETALIATION_DAMAGE));
    }
    trace!(
        agent_id = %cell.id(),
        target = %target,
        party = party_size,
        damage,
        "Hunt strike"
    );

    if let Some(nutrition) = kill {
        let share = nutrition.checked_div(party_size).unwrap_or(nutrition);
        for hunter in &party {
            hunter.with_human(|h| {
                h.relieve_hunger(share);
                h.clear_action();
            });
        }
        debug!(
            agent_id = %cell.id(),
            target = %target,
            party = party_size,
            share,
            "Prey killed"
        );
    }

    if !prey.is_alive() {
        cell.with_human(Human::clear_action);
    }
}

/// The initiating hunter plus every living human close enough to the prey.
fn hunting_party(cell: &AgentCell, env: &WorldEnvironment, prey_center: Position) -> Vec<AgentRef> {
    let reach = ACTION_RANGE * HUNT_ASSIST_FACTOR;
    env.agents()
        .into_iter()
        .filter(|other| other.kind() == EntityKind::Human)
        .filter(|other| {
            other.id() == cell.id()
                || other
                    .with_human(|h| h.is_alive() && h.center().distance_to(prey_center) <= reach)
                    .unwrap_or(false)
        })
        .collect()
}

fn reproduce(cell: &AgentCell, world: &Arc<SharedWorld>, mate_id: EntityId) {
    let env = world.environment();
    let mate = env
        .find_agent(mate_id)
        .filter(|a| a.kind() == EntityKind::Human && a.is_alive());
    let Some(mate) = mate else {
        lose_target(cell, mate_id);
        return;
    };

    if !step_towards(cell, env, mate.center()) {
        return;
    }

    let children = mate_with(cell, &mate, env.width(), env.height());
    for child in children {
        match world.admit_agent(child) {
            Ok(born) => debug!(
                agent_id = %born.id(),
                parent = %cell.id(),
                other_parent = %mate_id,
                "Human born"
            ),
            Err(err) => warn!(parent = %cell.id(), error = %err, "Could not admit newborn"),
        }
    }
}

/// Complete a mating if both partners still want it.
///
/// Both agents are locked, lower id first, so that exactly one of the two
/// partners completes the handshake. The initiator must still be heading
/// for `mate`, and the mate must be reproducing too; otherwise this is a
/// no-op and the initiator keeps waiting. If either partner cannot pay,
/// both actions are abandoned.
fn mate_with(cell: &AgentCell, mate: &AgentCell, world_width: f64, world_height: f64) -> Vec<Human> {
    if cell.id() == mate.id() {
        return Vec::new();
    }
    let initiator_first = cell.id() < mate.id();
    let (low, high) = if initiator_first { (cell, mate) } else { (mate, cell) };
    let mut low_guard = low.lock();
    let mut high_guard = high.lock();
    let (mine, theirs) = if initiator_first {
        (&mut *low_guard, &mut *high_guard)
    } else {
        (&mut *high_guard, &mut *low_guard)
    };
    let (Agent::Human(me), Agent::Human(partner)) = (mine, theirs) else {
        return Vec::new();
    };

    let still_wanted = me.action() == Some(HumanAction::Reproduce { mate: mate.id() });
    let partner_willing =
        partner.is_alive() && matches!(partner.action(), Some(HumanAction::Reproduce { .. }));
    if !still_wanted || !partner_willing {
        return Vec::new();
    }

    if me.energy() < REPRODUCTION_COST || partner.energy() < REPRODUCTION_COST {
        me.clear_action();
        partner.clear_action();
        trace!(agent_id = %cell.id(), mate = %mate.id(), "Mating abandoned, not enough energy");
        return Vec::new();
    }

    me.spend_energy(REPRODUCTION_COST);
    partner.spend_energy(REPRODUCTION_COST);
    me.clear_action();
    partner.clear_action();

    let partner_profile = partner.profile();
    (0..OFFSPRING_PER_MATING)
        .map(|_| me.conceive(partner_profile, world_width, world_height))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use habitat_types::{AnimalKind, Profile, VegetableKind};

    use super::*;
    use crate::animal::Animal;
    use crate::human::MAX_HUNGER;

    fn world() -> Arc<SharedWorld> {
        SharedWorld::new(WorldEnvironment::new(800.0, 600.0).unwrap())
    }

    fn adopt(cell: &AgentCell, action: HumanAction) {
        cell.with_human(|h| h.force_action(action));
    }

    #[test]
    fn gatherer_walks_then_eats() {
        let world = world();
        let human = world
            .admit_agent(Human::new("H-0", 100.0, 100.0, Profile::Pragmatic, 1).with_needs(300, 100))
            .unwrap();
        let carrot = world
            .admit_object(Vegetable::new(VegetableKind::Carrot, 120.0, 100.0))
            .unwrap();
        adopt(
            &human,
            HumanAction::Gather {
                target: carrot.id(),
            },
        );

        // 20 units away: five steps of 2 bring it within range.
        for _ in 0..5 {
            act(&human, &world);
            assert!(carrot.is_alive());
        }
        act(&human, &world);
        assert!(!carrot.is_alive());
        let (hunger, action) = human.with_human(|h| (h.hunger(), h.action())).unwrap();
        // 300 + 6 steps of hunger - 60
        assert_eq!(hunger, 246);
        assert_eq!(action, None);
    }

    #[test]
    fn gatherer_loses_an_eaten_target() {
        let world = world();
        let human = world
            .admit_agent(Human::new("H-0", 100.0, 100.0, Profile::Pragmatic, 1))
            .unwrap();
        let berry = world
            .admit_object(Vegetable::new(VegetableKind::Berry, 300.0, 300.0))
            .unwrap();
        adopt(&human, HumanAction::Gather { target: berry.id() });
        assert!(berry.as_vegetable().is_some_and(Vegetable::consume));

        act(&human, &world);
        assert_eq!(human.with_human(|h| h.action()).unwrap(), None);
    }

    #[test]
    fn solo_hunter_deals_weak_blows_to_a_bull() {
        let world = world();
        let human = world
            .admit_agent(Human::new("H-0", 100.0, 100.0, Profile::Collectivist, 1).with_needs(100, 100))
            .unwrap();
        // Bull center (108, 108): already within range of the hunter.
        let bull = world
            .admit_agent(Animal::new(AnimalKind::Bull, 84.0, 84.0, 1))
            .unwrap();
        adopt(&human, HumanAction::Hunt { target: bull.id() });

        for round in 1..=3 {
            act(&human, &world);
            let bull_health = bull.lock().health();
            assert_eq!(bull_health, 160 - 10 * round);
            assert_eq!(human.lock().health(), 100);
        }
    }

    #[test]
    fn full_party_kills_and_shares() {
        let world = world();
        let human = world
            .admit_agent(Human::new("H-0", 100.0, 100.0, Profile::Pragmatic, 1).with_needs(MAX_HUNGER, 100))
            .unwrap();
        let chicken = world
            .admit_agent(Animal::new(AnimalKind::Chicken, 98.0, 98.0, 1))
            .unwrap();
        adopt(&human, HumanAction::Hunt { target: chicken.id() });

        // Chicken: 40 health, two full strikes.
        act(&human, &world);
        assert_eq!(chicken.lock().health(), 20);
        assert_eq!(human.lock().health(), 96);
        act(&human, &world);
        assert!(!chicken.is_alive());
        assert!(chicken.lock().health() <= 0);

        let (hunger, action) = human.with_human(|h| (h.hunger(), h.action())).unwrap();
        // Capped at 500 by the steps, then the whole carcass (100).
        assert_eq!(hunger, MAX_HUNGER - 100);
        assert_eq!(action, None);
        assert_eq!(human.lock().health(), 92);
    }

    #[test]
    fn mating_needs_both_partners_and_yields_two_children() {
        let world = world();
        let a = world
            .admit_agent(Human::new("H-0", 100.0, 100.0, Profile::Selfish, 1).with_needs(100, 450))
            .unwrap();
        let b = world
            .admit_agent(Human::new("H-1", 104.0, 100.0, Profile::Cautious, 2).with_needs(100, 450))
            .unwrap();
        adopt(&a, HumanAction::Reproduce { mate: b.id() });

        // B is not reproducing yet: nothing happens, A keeps waiting.
        act(&a, &world);
        assert_eq!(world.environment().agent_count(), 2);
        assert_eq!(
            a.with_human(|h| h.action()).unwrap(),
            Some(HumanAction::Reproduce { mate: b.id() })
        );

        adopt(&b, HumanAction::Reproduce { mate: a.id() });
        act(&a, &world);
        assert_eq!(world.environment().agent_count(), 4);
        // B's own turn finds its action already completed.
        act(&b, &world);
        assert_eq!(world.environment().agent_count(), 4);

        for parent in [&a, &b] {
            let (energy, action) = parent.with_human(|h| (h.energy(), h.action())).unwrap();
            assert_eq!(energy, 200);
            assert_eq!(action, None);
        }
        let newest = world.ids().last_issued();
        assert_eq!(newest, EntityId(4));
    }

    #[test]
    fn unaffordable_mating_is_abandoned_by_both() {
        let world = world();
        let a = world
            .admit_agent(Human::new("H-0", 100.0, 100.0, Profile::Selfish, 1).with_needs(100, 450))
            .unwrap();
        let b = world
            .admit_agent(Human::new("H-1", 104.0, 100.0, Profile::Cautious, 2).with_needs(100, 200))
            .unwrap();
        adopt(&a, HumanAction::Reproduce { mate: b.id() });
        adopt(&b, HumanAction::Reproduce { mate: a.id() });

        act(&a, &world);
        assert_eq!(world.environment().agent_count(), 2);
        assert_eq!(a.with_human(|h| h.action()).unwrap(), None);
        assert_eq!(b.with_human(|h| h.action()).unwrap(), None);
    }
}
