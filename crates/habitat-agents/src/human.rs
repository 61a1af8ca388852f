//! Human agents: needs, profile, and the decide phase.
//!
//! Hunger and energy live in `0..=MAX_HUNGER` and `0..=MAX_ENERGY`; every
//! mutation below clamps. The act phase itself lives in
//! [`crate::actions::execute`] because it reaches into other agents.

use habitat_types::{BoundingBox, HumanView, Profile};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use crate::actions::{self, HumanAction};
use crate::perception::HumanPerception;
use crate::reproduction;
use crate::vitals::{Creature, Vitals};

/// Energy ceiling.
pub const MAX_ENERGY: u32 = 500;

/// Hunger ceiling.
pub const MAX_HUNGER: u32 = 500;

/// Health ceiling.
pub const MAX_HEALTH: i32 = 100;

/// Side length of a human footprint.
pub const HUMAN_SIZE: f64 = 16.0;

/// Ticks an adopted action is kept before it is reconsidered.
pub const COMMITMENT_TICKS: u32 = 90;

/// Every this many ticks a human pays one energy and one hunger.
pub const UPKEEP_INTERVAL: u64 = 30;

/// Least energy at which a human may reproduce.
pub const MATING_MIN_ENERGY: u32 = 400;

/// Most hunger at which a human may reproduce.
pub const MATING_MAX_HUNGER: u32 = 150;

const DEFAULT_HEALTH: i32 = 100;
const DEFAULT_HUNGER: u32 = 50;
const DEFAULT_ENERGY: u32 = 100;

/// A human agent.
#[derive(Debug, Clone)]
pub struct Human {
    vitals: Vitals,
    hunger: u32,
    energy: u32,
    profile: Profile,
    action: Option<HumanAction>,
    perception: HumanPerception,
    /// Ticks acted so far, drives the upkeep interval.
    ticks_lived: u64,
    /// Ticks spent in the current action.
    action_duration: u32,
    rng: SmallRng,
}

impl Human {
    /// A new adult with default needs, its footprint's top-left corner at
    /// `(x, y)`.
    ///
    /// `seed` drives the human's own random draws (offspring placement and
    /// profiles), so a seeded simulation replays identically.
    pub fn new(name: impl Into<String>, x: f64, y: f64, profile: Profile, seed: u64) -> Self {
        Self {
            vitals: Vitals::new(
                name,
                DEFAULT_HEALTH,
                BoundingBox::new(x, y, HUMAN_SIZE, HUMAN_SIZE),
            ),
            hunger: DEFAULT_HUNGER,
            energy: DEFAULT_ENERGY,
            profile,
            action: None,
            perception: HumanPerception::default(),
            ticks_lived: 0,
            action_duration: 0,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Override hunger and energy, clamped to their ceilings.
    #[must_use]
    pub fn with_needs(mut self, hunger: u32, energy: u32) -> Self {
        self.hunger = hunger.min(MAX_HUNGER);
        self.energy = energy.min(MAX_ENERGY);
        self
    }

    /// Override starting health.
    #[must_use]
    pub const fn with_health(mut self, health: i32) -> Self {
        self.vitals.reset_health(health);
        self
    }

    /// Current hunger.
    pub const fn hunger(&self) -> u32 {
        self.hunger
    }

    /// Behavioral profile.
    pub const fn profile(&self) -> Profile {
        self.profile
    }

    /// The action being carried out.
    pub const fn action(&self) -> Option<HumanAction> {
        self.action
    }

    /// Ticks spent in the current action.
    pub const fn action_duration(&self) -> u32 {
        self.action_duration
    }

    /// Perception cached by the last perceive phase.
    pub const fn perception(&self) -> &HumanPerception {
        &self.perception
    }

    /// Replace the cached perception.
    pub fn set_perception(&mut self, perception: HumanPerception) {
        self.perception = perception;
    }

    /// Whether this human meets the mating thresholds.
    pub const fn is_ready_to_mate(&self) -> bool {
        self.energy >= MATING_MIN_ENERGY && self.hunger <= MATING_MAX_HUNGER
    }

    /// Raise hunger, capped at [`MAX_HUNGER`].
    pub fn add_hunger(&mut self, amount: u32) {
        self.hunger = self.hunger.saturating_add(amount).min(MAX_HUNGER);
    }

    /// Lower hunger, floored at zero.
    pub const fn relieve_hunger(&mut self, amount: u32) {
        self.hunger = self.hunger.saturating_sub(amount);
    }

    /// Raise energy, capped at [`MAX_ENERGY`].
    pub fn add_energy(&mut self, amount: u32) {
        self.energy = self.energy.saturating_add(amount).min(MAX_ENERGY);
    }

    /// Spend `amount` energy if the whole amount is available.
    pub const fn spend_energy(&mut self, amount: u32) -> bool {
        match self.energy.checked_sub(amount) {
            Some(left) => {
                self.energy = left;
                true
            }
            None => false,
        }
    }

    /// Drop the current action. The next decide phase picks a new one.
    pub const fn clear_action(&mut self) {
        self.action = None;
    }

    /// Choose the next action.
    ///
    /// An action younger than [`COMMITMENT_TICKS`] is kept. Otherwise
    /// every candidate is scored and the best strictly positive one is
    /// adopted, restarting the duration counter; with no positive
    /// candidate the human stays idle.
    pub fn decide(&mut self) {
        if self.action.is_some() && self.action_duration < COMMITMENT_TICKS {
            return;
        }
        let previous = self.action.take();
        if let Some(best) = actions::choose(self, previous) {
            trace!(
                agent_id = %self.id(),
                action = ?best.action,
                utility = best.utility,
                "Human adopted action"
            );
            self.action = Some(best.action);
            self.action_duration = 0;
        }
    }

    /// Adopt `action` without scoring it.
    #[cfg(test)]
    pub(crate) const fn force_action(&mut self, action: HumanAction) {
        self.action = Some(action);
        self.action_duration = 0;
    }

    /// Start of the act phase: pay periodic upkeep, then report the
    /// action to execute. Dead or idle humans execute nothing.
    pub(crate) fn begin_act(&mut self) -> Option<HumanAction> {
        self.pay_upkeep();
        if !self.is_alive() {
            return None;
        }
        if self.action.is_none() {
            self.action_duration = 0;
        }
        self.action
    }

    /// End of the act phase for a human that executed an action.
    pub(crate) const fn finish_act(&mut self) {
        self.action_duration = self.action_duration.saturating_add(1);
    }

    /// Every [`UPKEEP_INTERVAL`] ticks: one energy, or one damage when
    /// empty; one hunger, or one damage when already starving.
    fn pay_upkeep(&mut self) {
        self.ticks_lived = self.ticks_lived.saturating_add(1);
        if self.ticks_lived.checked_rem(UPKEEP_INTERVAL) != Some(0) {
            return;
        }
        if !self.spend_energy(1) {
            self.damage(1);
        }
        if self.hunger < MAX_HUNGER {
            self.add_hunger(1);
        } else {
            self.damage(1);
        }
    }

    /// One tick of resting. Energy every 2 ticks in the action, hunger
    /// every 4, health every 5, counted from the tick the rest began.
    pub fn rest_step(&mut self) {
        let t = self.action_duration;
        if on_cadence(t, 2) {
            self.add_energy(1);
        }
        if on_cadence(t, 4) {
            self.add_hunger(1);
        }
        if on_cadence(t, 5) {
            self.vitals.heal(1, MAX_HEALTH);
        }
    }

    /// Produce one child with `partner_profile`'s parent, placed near
    /// this human and clamped inside a `world_width` x `world_height`
    /// world.
    pub fn conceive(&mut self, partner_profile: Profile, world_width: f64, world_height: f64) -> Self {
        let profile = reproduction::inherit_profile(self.profile, partner_profile, &mut self.rng);
        let origin = self.footprint().origin;
        let offset = reproduction::CHILD_OFFSET;
        let x = origin.x + self.rng.random_range(-offset..offset);
        let y = origin.y + self.rng.random_range(-offset..offset);
        let x = x.clamp(0.0, (world_width - HUMAN_SIZE).max(0.0));
        let y = y.clamp(0.0, (world_height - HUMAN_SIZE).max(0.0));

        Self::new(
            format!("{}-Jr", self.name()),
            x,
            y,
            profile,
            self.rng.random(),
        )
        .with_needs(reproduction::CHILD_HUNGER, reproduction::CHILD_ENERGY)
        .with_health(reproduction::CHILD_HEALTH)
    }

    /// Telemetry view of the human-only state.
    pub fn view(&self) -> HumanView {
        HumanView {
            hunger: self.hunger,
            energy: self.energy,
            profile: self.profile,
            action: self.action.map(HumanAction::kind),
        }
    }
}

const fn on_cadence(ticks: u32, period: u32) -> bool {
    matches!(ticks.checked_rem(period), Some(0))
}

impl Creature for Human {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn vitals_mut(&mut self) -> &mut Vitals {
        &mut self.vitals
    }

    fn energy(&self) -> u32 {
        self.energy
    }
}

#[cfg(test)]
#[allow(clippy::arithmetic_side_effects)]
mod tests {
    use habitat_types::{EntityId, Position};

    use super::*;
    use crate::perception::{HumanPerception, SeenVegetable};

    fn human() -> Human {
        Human::new("H-0", 100.0, 100.0, Profile::Pragmatic, 1)
    }

    #[test]
    fn new_human_has_default_needs() {
        let h = human();
        assert_eq!(h.hunger(), 50);
        assert_eq!(h.energy(), 100);
        assert_eq!(h.health(), 100);
        assert!(h.is_alive());
        assert_eq!(h.center(), Position::new(108.0, 108.0));
    }

    #[test]
    fn needs_are_clamped() {
        let mut h = human().with_needs(10_000, 10_000);
        assert_eq!(h.hunger(), MAX_HUNGER);
        assert_eq!(h.energy(), MAX_ENERGY);
        h.add_hunger(5);
        h.add_energy(5);
        assert_eq!(h.hunger(), MAX_HUNGER);
        assert_eq!(h.energy(), MAX_ENERGY);
        h.relieve_hunger(u32::MAX);
        assert_eq!(h.hunger(), 0);
        assert!(!h.spend_energy(MAX_ENERGY + 1));
        assert!(h.spend_energy(MAX_ENERGY));
        assert_eq!(h.energy(), 0);
    }

    #[test]
    fn starving_human_gathers_instead_of_resting() {
        let mut h = human().with_needs(MAX_HUNGER, 0);
        h.set_perception(HumanPerception {
            vegetables: vec![SeenVegetable {
                id: EntityId(2),
                center: Position::new(158.0, 108.0),
            }],
            ..HumanPerception::default()
        });
        h.decide();
        assert_eq!(
            h.action(),
            Some(HumanAction::Gather {
                target: EntityId(2)
            })
        );
    }

    #[test]
    fn commitment_holds_for_ninety_ticks() {
        let mut h = human().with_needs(0, 0);
        h.decide();
        assert_eq!(h.action(), Some(HumanAction::Rest));

        // A hungrier human would still keep resting until the commitment ends.
        h.add_hunger(MAX_HUNGER);
        h.set_perception(HumanPerception {
            vegetables: vec![SeenVegetable {
                id: EntityId(5),
                center: Position::new(120.0, 108.0),
            }],
            ..HumanPerception::default()
        });
        for _ in 0..COMMITMENT_TICKS {
            h.decide();
            assert_eq!(h.action(), Some(HumanAction::Rest));
            h.finish_act();
        }
        h.decide();
        assert_eq!(
            h.action(),
            Some(HumanAction::Gather {
                target: EntityId(5)
            })
        );
        assert_eq!(h.action_duration(), 0);
    }

    #[test]
    fn satisfied_human_stays_idle() {
        // Rest: 0 / 2 - 500 < 0 and nothing else is visible.
        let mut h = human().with_needs(MAX_HUNGER, MAX_ENERGY);
        h.set_perception(HumanPerception::default());
        h.decide();
        assert_eq!(h.action(), None);
    }

    #[test]
    fn upkeep_every_thirty_ticks() {
        let mut h = human().with_needs(10, 10);
        for _ in 0..29 {
            let _ = h.begin_act();
        }
        assert_eq!((h.hunger(), h.energy()), (10, 10));
        let _ = h.begin_act();
        assert_eq!((h.hunger(), h.energy()), (11, 9));
    }

    #[test]
    fn upkeep_damages_when_depleted() {
        let mut h = human().with_needs(MAX_HUNGER, 0);
        for _ in 0..UPKEEP_INTERVAL {
            let _ = h.begin_act();
        }
        assert_eq!(h.health(), 98);
        assert_eq!(h.hunger(), MAX_HUNGER);
        assert_eq!(h.energy(), 0);
    }

    #[test]
    fn rest_follows_its_cadence() {
        let mut h = human().with_needs(0, 0).with_health(90);
        for _ in 0..20 {
            h.rest_step();
            h.finish_act();
        }
        // durations 0..20: 10 even, 5 multiples of 4, 4 multiples of 5
        assert_eq!(h.energy(), 10);
        assert_eq!(h.hunger(), 5);
        assert_eq!(h.health(), 94);
    }

    #[test]
    fn child_inherits_name_and_starting_needs() {
        let mut parent = human();
        let child = parent.conceive(Profile::Cautious, 800.0, 600.0);
        assert_eq!(child.name(), "H-0-Jr");
        assert_eq!(child.hunger(), 20);
        assert_eq!(child.energy(), 80);
        assert_eq!(child.health(), 100);
        assert!(!child.id().is_assigned());
        let origin = child.footprint().origin;
        assert!((90.0..110.0).contains(&origin.x));
        assert!((90.0..110.0).contains(&origin.y));
    }

    #[test]
    fn child_near_the_corner_is_clamped_inside() {
        let mut parent = Human::new("H-9", 0.0, 0.0, Profile::Selfish, 3);
        for _ in 0..20 {
            let child = parent.conceive(Profile::Selfish, 800.0, 600.0);
            let origin = child.footprint().origin;
            assert!(origin.x >= 0.0 && origin.y >= 0.0);
        }
    }

    #[test]
    fn view_exposes_action_kind() {
        let mut h = human().with_needs(0, 0);
        h.decide();
        let view = h.view();
        assert_eq!(view.action, Some(habitat_types::ActionKind::Rest));
        assert_eq!(view.profile, Profile::Pragmatic);
    }
}
