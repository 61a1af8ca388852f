//! The human utility engine.
//!
//! A decide phase scores every candidate action against the human's own
//! state and its cached perception ([`utility`]), then adopts the best
//! strictly positive one. The act phase carries the adopted action out
//! against the shared world ([`execute`]).
//!
//! # Modules
//!
//! - [`utility`] -- Pure scoring functions, one per action.
//! - [`execute`] -- Movement, consumption, hunting and mating.

pub mod execute;
pub mod utility;

use habitat_types::{ActionKind, EntityId};

use crate::human::Human;

/// A pending human action together with its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HumanAction {
    /// Recover in place.
    Rest,
    /// Walk to and eat a vegetable.
    Gather {
        /// The vegetable to eat.
        target: EntityId,
    },
    /// Chase and strike an animal.
    Hunt {
        /// The animal to hunt.
        target: EntityId,
    },
    /// Meet a mate and produce offspring.
    Reproduce {
        /// The chosen partner.
        mate: EntityId,
    },
}

impl HumanAction {
    /// The target-free kind, as exposed in telemetry.
    pub const fn kind(self) -> ActionKind {
        match self {
            Self::Rest => ActionKind::Rest,
            Self::Gather { .. } => ActionKind::Gather,
            Self::Hunt { .. } => ActionKind::Hunt,
            Self::Reproduce { .. } => ActionKind::Reproduce,
        }
    }

    /// The entity this action is aimed at, if any.
    pub const fn target(self) -> Option<EntityId> {
        match self {
            Self::Rest => None,
            Self::Gather { target } | Self::Hunt { target } => Some(target),
            Self::Reproduce { mate } => Some(mate),
        }
    }
}

/// A scored candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    /// The action that would be adopted.
    pub action: HumanAction,
    /// Its utility score.
    pub utility: f64,
}

/// Pick the highest-scoring candidate, provided its score is strictly
/// positive. Ties keep the earlier candidate in the order Rest, Gather,
/// Hunt, Reproduce.
///
/// `previous` is the action the human held before this decision, which
/// the hunt score uses to honor an existing commitment.
pub fn choose(human: &Human, previous: Option<HumanAction>) -> Option<Candidate> {
    let candidates = [
        Some(utility::rest(human)),
        utility::gather(human),
        utility::hunt(human, previous),
        utility::reproduce(human),
    ];

    candidates
        .into_iter()
        .flatten()
        .fold(None, |best: Option<Candidate>, candidate| {
            let bar = best.map_or(0.0, |b| b.utility);
            if candidate.utility > bar {
                Some(candidate)
            } else {
                best
            }
        })
}
