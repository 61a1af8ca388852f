//! Utility scores for the four human actions.
//!
//! Every function here is pure: it reads the human's own state and the
//! perception cached by the last perceive phase, and returns a scored
//! [`Candidate`]. `None` means the action has no eligible target.
//! Distances are measured between footprint centers.

use habitat_types::{AnimalKind, Profile};

use super::{Candidate, HumanAction};
use crate::human::{Human, MAX_ENERGY, MAX_HEALTH};
use crate::vitals::Creature;

/// Penalty per unit of distance to a gather or hunt target.
const TARGET_DISTANCE_WEIGHT: f64 = 0.1;

/// Penalty per unit of distance to a prospective mate.
const MATE_DISTANCE_WEIGHT: f64 = 0.5;

/// Risk added per hunter an animal requires.
const RISK_PER_HUNTER: f64 = 10.0;

/// Bonus per visible food source when reproducing.
const FOOD_BONUS: f64 = 10.0;

/// Fewest visible food sources that make reproduction worthwhile.
const MIN_FOOD_FOR_REPRODUCTION: usize = 2;

/// Most visible humans tolerated around a reproducing couple.
const MAX_CROWD_FOR_REPRODUCTION: usize = 5;

/// `(MAX_ENERGY - energy) / 2 - hunger + 2 * (MAX_HEALTH - health)`,
/// scaled by profile.
pub fn rest(human: &Human) -> Candidate {
    let energy_gap = f64::from(MAX_ENERGY.saturating_sub(human.energy()));
    let health_gap = f64::from(MAX_HEALTH.saturating_sub(human.health()));
    let base = 2.0_f64.mul_add(health_gap, energy_gap / 2.0 - f64::from(human.hunger()));

    let multiplier = match human.profile() {
        Profile::Cautious => 1.25,
        Profile::Pragmatic => 1.0,
        Profile::Selfish | Profile::Collectivist => 0.8,
    };

    Candidate {
        action: HumanAction::Rest,
        utility: base * multiplier,
    }
}

/// `hunger - 0.1 * distance` to the nearest vegetable no other visible
/// human is already gathering, scaled by profile.
pub fn gather(human: &Human) -> Option<Candidate> {
    let eye = human.center();
    let seen = human.perception();
    let (target, distance) = seen
        .vegetables
        .iter()
        .filter(|v| !seen.is_claimed_by_gatherer(v.id))
        .map(|v| (v.id, eye.distance_to(v.center)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let base = TARGET_DISTANCE_WEIGHT.mul_add(-distance, f64::from(human.hunger()));
    let multiplier = match human.profile() {
        Profile::Pragmatic => 1.25,
        Profile::Collectivist => 0.8,
        Profile::Cautious => 1.5,
        Profile::Selfish => 1.0,
    };

    Some(Candidate {
        action: HumanAction::Gather { target },
        utility: base * multiplier,
    })
}

/// `1.5 * hunger - 0.1 * distance - risk` to the nearest eligible animal,
/// adjusted by profile and clamped at zero.
///
/// An animal is eligible when the human and its visible allies are enough
/// to bring it down and it is not already fully staffed by visible
/// hunters. A target the human was already hunting stays eligible.
pub fn hunt(human: &Human, previous: Option<HumanAction>) -> Option<Candidate> {
    let committed_to = match previous {
        Some(HumanAction::Hunt { target }) => Some(target),
        _ => None,
    };
    let eye = human.center();
    let seen = human.perception();
    let party = seen.humans.len().saturating_add(1);

    let (animal, hunters, distance) = seen
        .animals
        .iter()
        .filter_map(|animal| {
            let required = hunters_needed(animal.kind);
            let hunters = seen.hunters_on(animal.id);
            let committed = committed_to == Some(animal.id);
            let eligible = committed || (party >= required && hunters < required);
            eligible.then(|| (animal, hunters, eye.distance_to(animal.center)))
        })
        .min_by(|a, b| a.2.total_cmp(&b.2))?;

    let required = animal.kind.required_hunters();
    let risk = RISK_PER_HUNTER * f64::from(required);
    let base = 1.5_f64.mul_add(
        f64::from(human.hunger()),
        TARGET_DISTANCE_WEIGHT.mul_add(-distance, -risk),
    );

    let adjustment = match human.profile() {
        Profile::Cautious => -1.25 * risk,
        Profile::Selfish => -15.0 * f64::from(required.saturating_sub(1)),
        Profile::Collectivist => 50.0,
        Profile::Pragmatic => {
            let energetic = if human.energy() > 200 { 50.0 } else { 0.0 };
            15.0_f64.mul_add(count_as_f64(hunters), energetic)
        }
    };

    Some(Candidate {
        action: HumanAction::Hunt { target: animal.id },
        utility: (base + adjustment).max(0.0),
    })
}

/// `energy - 0.5 * distance + 10 * food` toward the nearest ready mate,
/// clamped at zero.
///
/// Requires the human to be ready itself, at least two visible food
/// sources, and no more than five visible humans.
pub fn reproduce(human: &Human) -> Option<Candidate> {
    if !human.is_ready_to_mate() {
        return None;
    }
    let seen = human.perception();
    let food = seen.food_count();
    if food < MIN_FOOD_FOR_REPRODUCTION || seen.humans.len() > MAX_CROWD_FOR_REPRODUCTION {
        return None;
    }

    let eye = human.center();
    let (mate, distance) = seen
        .humans
        .iter()
        .filter(|h| h.ready_to_mate)
        .map(|h| (h.id, eye.distance_to(h.center)))
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    let utility = FOOD_BONUS.mul_add(
        count_as_f64(food),
        MATE_DISTANCE_WEIGHT.mul_add(-distance, f64::from(human.energy())),
    );

    Some(Candidate {
        action: HumanAction::Reproduce { mate },
        utility: utility.max(0.0),
    })
}

fn hunters_needed(kind: AnimalKind) -> usize {
    usize::try_from(kind.required_hunters()).unwrap_or(usize::MAX)
}

fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

#[cfg(test)]
mod tests {
    use habitat_types::{EntityId, Position};

    use super::*;
    use crate::perception::{HumanPerception, SeenAnimal, SeenHuman, SeenVegetable};

    fn human_at(x: f64, y: f64, profile: Profile) -> Human {
        Human::new("H-test", x, y, profile, 7)
    }

    fn veg(id: u64, x: f64, y: f64) -> SeenVegetable {
        SeenVegetable {
            id: EntityId(id),
            center: Position::new(x, y),
        }
    }

    fn animal(id: u64, x: f64, y: f64, kind: AnimalKind) -> SeenAnimal {
        SeenAnimal {
            id: EntityId(id),
            center: Position::new(x, y),
            kind,
        }
    }

    fn neighbor(id: u64, x: f64, y: f64, action: Option<HumanAction>) -> SeenHuman {
        SeenHuman {
            id: EntityId(id),
            center: Position::new(x, y),
            ready_to_mate: false,
            action,
        }
    }

    #[test]
    fn rest_prefers_the_exhausted_and_wounded() {
        let tired = human_at(0.0, 0.0, Profile::Pragmatic).with_needs(0, 100);
        // 400 / 2 - 0 + 0
        assert!((rest(&tired).utility - 200.0).abs() < 1e-9);

        let wounded = human_at(0.0, 0.0, Profile::Cautious)
            .with_needs(100, 500)
            .with_health(60);
        // (0 - 100 + 80) * 1.25
        assert!((rest(&wounded).utility + 25.0).abs() < 1e-9);
    }

    #[test]
    fn gather_skips_claimed_vegetables() {
        let mut human = human_at(0.0, 0.0, Profile::Selfish).with_needs(200, 100);
        human.set_perception(HumanPerception {
            humans: vec![neighbor(
                9,
                50.0,
                50.0,
                Some(HumanAction::Gather {
                    target: EntityId(1),
                }),
            )],
            animals: Vec::new(),
            vegetables: vec![veg(1, 18.0, 8.0), veg(2, 108.0, 8.0)],
        });

        let candidate = gather(&human);
        assert_eq!(
            candidate.map(|c| c.action),
            Some(HumanAction::Gather {
                target: EntityId(2)
            })
        );
        // 200 - 0.1 * 100
        assert!(candidate.is_some_and(|c| (c.utility - 190.0).abs() < 1e-9));
    }

    #[test]
    fn gather_without_vegetables_has_no_candidate() {
        let human = human_at(0.0, 0.0, Profile::Cautious);
        assert!(gather(&human).is_none());
    }

    #[test]
    fn solo_hunter_ignores_big_prey() {
        let mut human = human_at(0.0, 0.0, Profile::Collectivist).with_needs(300, 100);
        human.set_perception(HumanPerception {
            animals: vec![animal(3, 40.0, 8.0, AnimalKind::Bull)],
            ..HumanPerception::default()
        });
        assert!(hunt(&human, None).is_none());

        // Already committed to the bull: still eligible.
        let committed = hunt(
            &human,
            Some(HumanAction::Hunt {
                target: EntityId(3),
            }),
        );
        assert_eq!(
            committed.map(|c| c.action),
            Some(HumanAction::Hunt {
                target: EntityId(3)
            })
        );
    }

    #[test]
    fn hunt_applies_profile_adjustments() {
        let prey = vec![animal(3, 108.0, 8.0, AnimalKind::Chicken)];
        let score = |profile: Profile, energy: u32| {
            let mut human = human_at(0.0, 0.0, profile).with_needs(100, energy);
            human.set_perception(HumanPerception {
                animals: prey.clone(),
                ..HumanPerception::default()
            });
            hunt(&human, None).map_or(-1.0, |c| c.utility)
        };

        // base = 150 - 10 - 10 = 130
        assert!((score(Profile::Selfish, 100) - 130.0).abs() < 1e-9);
        assert!((score(Profile::Cautious, 100) - 117.5).abs() < 1e-9);
        assert!((score(Profile::Collectivist, 100) - 180.0).abs() < 1e-9);
        assert!((score(Profile::Pragmatic, 100) - 130.0).abs() < 1e-9);
        assert!((score(Profile::Pragmatic, 300) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn pragmatic_hunters_join_a_staffed_hunt() {
        let cow_hunt = Some(HumanAction::Hunt {
            target: EntityId(3),
        });
        let score = |profile: Profile, energy: u32| {
            let mut human = human_at(0.0, 0.0, profile).with_needs(100, energy);
            human.set_perception(HumanPerception {
                humans: vec![neighbor(10, 30.0, 30.0, cow_hunt)],
                animals: vec![animal(3, 108.0, 8.0, AnimalKind::Cow)],
                vegetables: Vec::new(),
            });
            hunt(&human, None).map_or(-1.0, |c| c.utility)
        };

        // base = 150 - 10 - 20 = 120, one hunter already on the cow
        assert!((score(Profile::Pragmatic, 100) - 135.0).abs() < 1e-9);
        assert!((score(Profile::Pragmatic, 300) - 185.0).abs() < 1e-9);
        assert!((score(Profile::Selfish, 300) - 105.0).abs() < 1e-9);
    }

    #[test]
    fn bull_hunt_scales_with_hunters_and_party_size() {
        let bull_hunt = Some(HumanAction::Hunt {
            target: EntityId(3),
        });
        let score = |profile: Profile, second: Option<HumanAction>| {
            let mut human = human_at(0.0, 0.0, profile).with_needs(100, 300);
            human.set_perception(HumanPerception {
                humans: vec![
                    neighbor(10, 30.0, 30.0, bull_hunt),
                    neighbor(11, 60.0, 30.0, second),
                ],
                animals: vec![animal(3, 108.0, 8.0, AnimalKind::Bull)],
                vegetables: Vec::new(),
            });
            hunt(&human, None).map_or(-1.0, |c| c.utility)
        };

        // base = 150 - 10 - 30 = 110
        assert!((score(Profile::Pragmatic, None) - 175.0).abs() < 1e-9);
        assert!((score(Profile::Pragmatic, bull_hunt) - 190.0).abs() < 1e-9);
        assert!((score(Profile::Selfish, bull_hunt) - 80.0).abs() < 1e-9);
        assert!((score(Profile::Selfish, None) - 80.0).abs() < 1e-9);
    }

    #[test]
    fn counts_saturate_when_converted() {
        assert!((count_as_f64(3) - 3.0).abs() < f64::EPSILON);
        assert!((count_as_f64(usize::MAX) - f64::from(u32::MAX)).abs() < f64::EPSILON);
    }

    #[test]
    fn hunt_score_never_negative() {
        let mut human = human_at(0.0, 0.0, Profile::Cautious).with_needs(0, 100);
        human.set_perception(HumanPerception {
            animals: vec![animal(3, 208.0, 8.0, AnimalKind::Chicken)],
            ..HumanPerception::default()
        });
        assert!(hunt(&human, None).is_some_and(|c| c.utility.abs() < 1e-9));
    }

    #[test]
    fn fully_staffed_prey_is_left_alone() {
        let mut human = human_at(0.0, 0.0, Profile::Pragmatic).with_needs(300, 100);
        let hunting = Some(HumanAction::Hunt {
            target: EntityId(3),
        });
        human.set_perception(HumanPerception {
            humans: vec![neighbor(10, 30.0, 30.0, hunting)],
            animals: vec![animal(3, 50.0, 8.0, AnimalKind::Chicken)],
            vegetables: Vec::new(),
        });
        assert!(hunt(&human, None).is_none());
    }

    #[test]
    fn reproduce_needs_readiness_food_and_a_mate() {
        let mut human = human_at(0.0, 0.0, Profile::Pragmatic).with_needs(100, 450);
        let mate = SeenHuman {
            ready_to_mate: true,
            ..neighbor(4, 108.0, 8.0, None)
        };
        human.set_perception(HumanPerception {
            humans: vec![mate],
            animals: vec![animal(5, 300.0, 300.0, AnimalKind::Cow)],
            vegetables: vec![veg(6, 200.0, 200.0)],
        });
        let candidate = reproduce(&human);
        assert_eq!(
            candidate.map(|c| c.action),
            Some(HumanAction::Reproduce { mate: EntityId(4) })
        );
        // 450 - 50 + 20
        assert!(candidate.is_some_and(|c| (c.utility - 420.0).abs() < 1e-9));

        let hungry = human.clone().with_needs(200, 450);
        assert!(reproduce(&hungry).is_none());

        let mut no_food = human;
        no_food.set_perception(HumanPerception {
            humans: vec![mate],
            ..HumanPerception::default()
        });
        assert!(reproduce(&no_food).is_none());
    }
}
