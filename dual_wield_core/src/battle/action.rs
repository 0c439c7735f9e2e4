//! Actions and combatant addressing

use crate::types::{SkillId, BASIC_ATTACK_SKILL_ID};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which party a combatant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Party,
    Troop,
}

/// Position of a combatant in a battle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CombatantId {
    pub side: Side,
    pub index: usize,
}

impl CombatantId {
    pub fn party(index: usize) -> Self {
        CombatantId {
            side: Side::Party,
            index,
        }
    }

    pub fn troop(index: usize) -> Self {
        CombatantId {
            side: Side::Troop,
            index,
        }
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.side {
            Side::Party => write!(f, "party[{}]", self.index),
            Side::Troop => write!(f, "troop[{}]", self.index),
        }
    }
}

/// One combatant using one skill on a list of targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub user: CombatantId,
    pub skill_id: SkillId,
    pub targets: Vec<CombatantId>,
}

impl Action {
    /// Plain attack
    pub fn attack(user: CombatantId, target: CombatantId) -> Self {
        Action {
            user,
            skill_id: BASIC_ATTACK_SKILL_ID,
            targets: vec![target],
        }
    }

    pub fn skill(user: CombatantId, skill_id: SkillId, targets: impl IntoIterator<Item = CombatantId>) -> Self {
        Action {
            user,
            skill_id,
            targets: targets.into_iter().collect(),
        }
    }
}
