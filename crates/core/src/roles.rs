//! Role-delta computation for skill and military-unit roles.
//!
//! A [`RoleDelta`] is the minimal set of role additions and removals that
//! brings a member's current roles to the desired state. Deltas never
//! contain a role the member already has (for additions) or lacks (for
//! removals), so applying one is a no-op when nothing needs to change.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::classification::Classification;
use crate::error::CoreError;
use crate::types::RoleId;

pub const REASON_ECONOMY_ADD: &str = "Economy skill > 50";
pub const REASON_ECONOMY_REMOVE_FIGHT: &str = "Economy > 50, remove fighter role";
pub const REASON_FIGHT_ADD: &str = "Economy skill <= 50";
pub const REASON_FIGHT_REMOVE_ECONOMY: &str = "Economy <= 50, remove economy role";
pub const REASON_MILITARY_UNIT_ADD: &str = "Assigned Military Unit role.";
pub const REASON_MILITARY_UNIT_REMOVE: &str = "Removed unused Military Unit roles.";

/// Roles to add to and remove from a single member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleDelta {
    pub add: Vec<RoleId>,
    pub remove: Vec<RoleId>,
    /// Audit-log reason attached to the additions.
    pub add_reason: &'static str,
    /// Audit-log reason attached to the removals.
    pub remove_reason: &'static str,
}

impl RoleDelta {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    /// Drop additions already held and removals not held.
    pub fn restrict_to(&self, held: &BTreeSet<RoleId>) -> RoleDelta {
        RoleDelta {
            add: self.add.iter().copied().filter(|r| !held.contains(r)).collect(),
            remove: self.remove.iter().copied().filter(|r| held.contains(r)).collect(),
            add_reason: self.add_reason,
            remove_reason: self.remove_reason,
        }
    }
}

// ---------------------------------------------------------------------------
// Skill roles
// ---------------------------------------------------------------------------

/// The economy / fight role pair of the guild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillRoles {
    pub economy: RoleId,
    pub fight: RoleId,
}

impl SkillRoles {
    pub fn role_for(&self, classification: Classification) -> RoleId {
        match classification {
            Classification::Economy => self.economy,
            Classification::Fighter => self.fight,
        }
    }

    /// Delta moving `held` onto the role for `classification`.
    ///
    /// Adds the target role if absent and removes the opposite role if
    /// present.
    pub fn delta(&self, classification: Classification, held: &BTreeSet<RoleId>) -> RoleDelta {
        let target = self.role_for(classification);
        let opposite = self.role_for(classification.opposite());

        let (add_reason, remove_reason) = match classification {
            Classification::Economy => (REASON_ECONOMY_ADD, REASON_ECONOMY_REMOVE_FIGHT),
            Classification::Fighter => (REASON_FIGHT_ADD, REASON_FIGHT_REMOVE_ECONOMY),
        };

        RoleDelta {
            add: vec![target],
            remove: vec![opposite],
            add_reason,
            remove_reason,
        }
        .restrict_to(held)
    }
}

// ---------------------------------------------------------------------------
// Military unit roles
// ---------------------------------------------------------------------------

/// Static table mapping in-game military unit ids to guild roles.
#[derive(Debug, Clone, Default)]
pub struct MilitaryUnitRoles {
    by_unit: HashMap<String, RoleId>,
}

impl MilitaryUnitRoles {
    /// Build the table from `(unit id, role)` pairs.
    ///
    /// Rejects duplicate unit ids and roles shared between two units, since
    /// either would make the "remove every other unit role" step ambiguous.
    pub fn new<I>(entries: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (String, RoleId)>,
    {
        let mut by_unit = HashMap::new();
        let mut roles = HashSet::new();

        for (unit, role) in entries {
            if !roles.insert(role) {
                return Err(CoreError::Validation(format!(
                    "Role {role} is assigned to more than one military unit"
                )));
            }
            if by_unit.insert(unit.clone(), role).is_some() {
                return Err(CoreError::Validation(format!(
                    "Military unit \"{unit}\" is configured twice"
                )));
            }
        }

        Ok(Self { by_unit })
    }

    pub fn role_for(&self, unit_id: &str) -> Option<RoleId> {
        self.by_unit.get(unit_id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_unit.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_unit.is_empty()
    }

    /// Delta for a member belonging to `unit_id`.
    ///
    /// `None` when the unit has no configured role or the member already
    /// holds it. Otherwise adds the unit role and removes every other
    /// configured unit role the member holds.
    pub fn delta(&self, unit_id: &str, held: &BTreeSet<RoleId>) -> Option<RoleDelta> {
        let role = self.role_for(unit_id)?;
        if held.contains(&role) {
            return None;
        }

        let mut remove: Vec<RoleId> = self
            .by_unit
            .values()
            .copied()
            .filter(|r| *r != role && held.contains(r))
            .collect();
        remove.sort_unstable();

        Some(RoleDelta {
            add: vec![role],
            remove,
            add_reason: REASON_MILITARY_UNIT_ADD,
            remove_reason: REASON_MILITARY_UNIT_REMOVE,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
