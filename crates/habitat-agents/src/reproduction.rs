//! Reproduction constants and offspring profile inheritance.
//!
//! The mating handshake itself lives in [`crate::actions::execute`];
//! [`crate::human::Human::conceive`] builds each child.

use habitat_types::Profile;
use rand::Rng;
use rand::seq::IndexedRandom;

/// Energy each parent pays for one mating.
pub const REPRODUCTION_COST: u32 = 250;

/// Children produced by one mating.
pub const OFFSPRING_PER_MATING: usize = 2;

/// Starting health of a child.
pub const CHILD_HEALTH: i32 = 100;

/// Starting hunger of a child.
pub const CHILD_HUNGER: u32 = 20;

/// Starting energy of a child.
pub const CHILD_ENERGY: u32 = 80;

/// A child lands within this distance of its parent on each axis.
pub const CHILD_OFFSET: f64 = 10.0;

/// Probability a child takes the initiating parent's profile.
const FIRST_PARENT_SHARE: f64 = 0.4;

/// Cumulative probability covering both parents.
const BOTH_PARENTS_SHARE: f64 = 0.8;

/// Draw a child's profile: 40% `first`, 40% `second`, 20% uniform over
/// every profile.
pub fn inherit_profile<R: Rng + ?Sized>(first: Profile, second: Profile, rng: &mut R) -> Profile {
    let roll: f64 = rng.random();
    if roll < FIRST_PARENT_SHARE {
        first
    } else if roll < BOTH_PARENTS_SHARE {
        second
    } else {
        Profile::ALL.choose(rng).copied().unwrap_or(first)
    }
}
