//! Database definitions consumed by the combat core
//!
//! Definitions are read-only once the [`Database`] is built. Note tags and
//! skill steps are computed exactly once, inside [`Database::from_raw`].

mod equipment;
mod skill;

pub use equipment::{ArmorDef, EquipItem, WeaponDef};
pub use skill::{DamageDef, SkillDef, SkillSteps};

use crate::sequence::SequenceParseError;
use crate::types::{ArmorId, SkillId, WeaponId, WeaponTypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Body motion played for an attack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    Thrust,
    Swing,
    Missile,
}

/// Attack motion for one weapon type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackMotion {
    pub kind: MotionKind,
    /// Weapon sprite shown during the motion, 0 for none
    pub weapon_image_id: u32,
}

/// Database contents as written on disk
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawDatabase {
    #[serde(default)]
    pub weapons: Vec<WeaponDef>,
    #[serde(default)]
    pub armors: Vec<ArmorDef>,
    #[serde(default)]
    pub skills: Vec<SkillDef>,
    /// Attack motion per weapon type id; 0 is the bare hand
    #[serde(default)]
    pub attack_motions: HashMap<WeaponTypeId, AttackMotion>,
    /// Animation played by an empty hand
    #[serde(default = "default_bare_hand_animation")]
    pub bare_hand_animation_id: u32,
}

fn default_bare_hand_animation() -> u32 {
    1
}

/// Database build error
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("duplicate {kind} id {id}")]
    DuplicateId { kind: &'static str, id: u32 },
    #[error("skill {id} has an invalid sequence: {source}")]
    InvalidSequence {
        id: SkillId,
        #[source]
        source: SequenceParseError,
    },
}

/// Classified, indexed definitions
#[derive(Debug, Clone, Default)]
pub struct Database {
    weapons: HashMap<WeaponId, WeaponDef>,
    armors: HashMap<ArmorId, ArmorDef>,
    skills: HashMap<SkillId, SkillDef>,
    attack_motions: HashMap<WeaponTypeId, AttackMotion>,
    bare_hand_animation_id: u32,
}

impl Database {
    /// Classify every definition and index it by id
    pub fn from_raw(raw: RawDatabase) -> Result<Self, DatabaseError> {
        let mut db = Database {
            attack_motions: raw.attack_motions,
            bare_hand_animation_id: raw.bare_hand_animation_id,
            ..Database::default()
        };

        for mut weapon in raw.weapons {
            weapon.classify();
            if db.weapons.insert(weapon.id, weapon.clone()).is_some() {
                return Err(DatabaseError::DuplicateId {
                    kind: "weapon",
                    id: weapon.id,
                });
            }
        }

        for mut armor in raw.armors {
            armor.classify();
            if db.armors.insert(armor.id, armor.clone()).is_some() {
                return Err(DatabaseError::DuplicateId {
                    kind: "armor",
                    id: armor.id,
                });
            }
        }

        for mut skill in raw.skills {
            let id = skill.id;
            skill
                .prepare()
                .map_err(|source| DatabaseError::InvalidSequence { id, source })?;
            if db.skills.insert(id, skill).is_some() {
                return Err(DatabaseError::DuplicateId { kind: "skill", id });
            }
        }

        tracing::debug!(
            "database built: {} weapons, {} armors, {} skills",
            db.weapons.len(),
            db.armors.len(),
            db.skills.len()
        );
        Ok(db)
    }

    pub fn weapon(&self, id: WeaponId) -> Option<&WeaponDef> {
        self.weapons.get(&id)
    }

    pub fn armor(&self, id: ArmorId) -> Option<&ArmorDef> {
        self.armors.get(&id)
    }

    pub fn skill(&self, id: SkillId) -> Option<&SkillDef> {
        self.skills.get(&id)
    }

    /// Attack motion for a weapon type, if one is defined
    pub fn attack_motion(&self, wtype_id: WeaponTypeId) -> Option<AttackMotion> {
        self.attack_motions.get(&wtype_id).copied()
    }

    pub fn bare_hand_animation_id(&self) -> u32 {
        self.bare_hand_animation_id
    }

    /// Insert or replace a skill, preparing it first
    pub fn insert_skill(&mut self, mut skill: SkillDef) -> Result<(), DatabaseError> {
        let id = skill.id;
        skill
            .prepare()
            .map_err(|source| DatabaseError::InvalidSequence { id, source })?;
        self.skills.insert(id, skill);
        Ok(())
    }

    /// Insert or replace an attack motion
    pub fn insert_attack_motion(&mut self, wtype_id: WeaponTypeId, motion: AttackMotion) {
        self.attack_motions.insert(wtype_id, motion);
    }
}
