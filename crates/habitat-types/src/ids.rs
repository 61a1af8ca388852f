//! Entity identifiers.
//!
//! Every admitted agent and object receives an [`EntityId`] from a single
//! monotonically increasing counter owned by the simulation. Identifiers
//! are never reused. Factories build entities with [`EntityId::UNASSIGNED`]
//! and admission replaces it with the next issued value.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for an agent or object in the simulation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub struct EntityId(pub u64);

impl EntityId {
    /// Placeholder carried by freshly built entities before admission.
    pub const UNASSIGNED: Self = Self(0);

    /// Return the raw counter value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }

    /// Whether this identifier has been issued by the allocator.
    pub const fn is_assigned(self) -> bool {
        self.0 > 0
    }
}

impl core::fmt::Display for EntityId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unassigned_is_zero() {
        assert!(!EntityId::UNASSIGNED.is_assigned());
        assert!(EntityId(1).is_assigned());
        assert_eq!(EntityId::default(), EntityId::UNASSIGNED);
    }

    #[test]
    fn ids_order_by_issue() {
        assert!(EntityId(3) > EntityId(2));
        assert_eq!(EntityId::from(7).into_inner(), 7);
        assert_eq!(EntityId(12).to_string(), "#12");
    }
}
