//! Core types shared across the dual-wield modules

use serde::{Deserialize, Serialize};

/// Identifier of a weapon definition in the database
pub type WeaponId = u32;
/// Identifier of an armor definition in the database
pub type ArmorId = u32;
/// Identifier of a skill definition in the database
pub type SkillId = u32;
/// Identifier of a status effect
pub type StateId = u32;
/// Weapon type id (drives attack motions); 0 is the bare hand
pub type WeaponTypeId = u32;

/// Skill id of the built-in basic attack
pub const BASIC_ATTACK_SKILL_ID: SkillId = 1;

/// One of the two weapon hands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    /// Slot 0
    Main,
    /// Slot 1
    Off,
}

impl Hand {
    /// Equipment slot index of this hand
    pub fn slot_index(self) -> usize {
        match self {
            Hand::Main => 0,
            Hand::Off => 1,
        }
    }

    /// The other hand
    pub fn opposite(self) -> Hand {
        match self {
            Hand::Main => Hand::Off,
            Hand::Off => Hand::Main,
        }
    }
}

/// Basic battle parameters, in database order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamId {
    MaxHp,
    MaxMp,
    Attack,
    Defense,
    MagicAttack,
    MagicDefense,
    Agility,
    Luck,
}

impl ParamId {
    /// Number of basic parameters
    pub const COUNT: usize = 8;

    /// Get all parameters in database order
    pub fn all() -> &'static [ParamId] {
        &[
            ParamId::MaxHp,
            ParamId::MaxMp,
            ParamId::Attack,
            ParamId::Defense,
            ParamId::MagicAttack,
            ParamId::MagicDefense,
            ParamId::Agility,
            ParamId::Luck,
        ]
    }

    /// Index into a parameter array
    pub fn index(self) -> usize {
        self as usize
    }

    /// Short name used by damage formulas (`a.atk`, `b.def`, ...)
    pub fn short_name(self) -> &'static str {
        match self {
            ParamId::MaxHp => "mhp",
            ParamId::MaxMp => "mmp",
            ParamId::Attack => "atk",
            ParamId::Defense => "def",
            ParamId::MagicAttack => "mat",
            ParamId::MagicDefense => "mdf",
            ParamId::Agility => "agi",
            ParamId::Luck => "luk",
        }
    }

    /// Look up a parameter by its formula short name
    pub fn from_short_name(name: &str) -> Option<ParamId> {
        ParamId::all().iter().copied().find(|p| p.short_name() == name)
    }
}

/// A fixed-size array of values indexed by [`ParamId`]
pub type ParamArray = [f64; ParamId::COUNT];

/// Who controls a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatantKind {
    /// Player-controlled party member
    Actor,
    /// Troop member
    Enemy,
}

/// Equipment category of an item, as seen by the slot rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipType {
    Weapon,
    Shield,
    Head,
    Body,
    Accessory,
}

/// What a skill's damage does to its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    #[default]
    None,
    HpDamage,
    MpDamage,
    HpRecover,
    MpRecover,
    HpDrain,
    MpDrain,
}

impl DamageKind {
    /// Whether the formula result is applied as healing
    pub fn is_recover(self) -> bool {
        matches!(self, DamageKind::HpRecover | DamageKind::MpRecover)
    }

    /// Whether this damage targets MP instead of HP
    pub fn is_mp(self) -> bool {
        matches!(
            self,
            DamageKind::MpDamage | DamageKind::MpRecover | DamageKind::MpDrain
        )
    }

    /// Sign applied to the formula result
    pub fn sign(self) -> f64 {
        if self.is_recover() {
            -1.0
        } else {
            1.0
        }
    }
}

/// Round half towards positive infinity, matching the engine's rounding
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hand_opposite() {
        assert_eq!(Hand::Main.opposite(), Hand::Off);
        assert_eq!(Hand::Off.opposite(), Hand::Main);
        assert_eq!(Hand::Off.slot_index(), 1);
    }

    #[test]
    fn test_param_short_names_round_trip() {
        for param in ParamId::all() {
            assert_eq!(ParamId::from_short_name(param.short_name()), Some(*param));
        }
        assert_eq!(ParamId::from_short_name("hp"), None);
    }

    #[test]
    fn test_round_half_up() {
        assert!((round_half_up(2.5) - 3.0).abs() < f64::EPSILON);
        assert!((round_half_up(-2.5) - -2.0).abs() < f64::EPSILON);
        assert!((round_half_up(2.49) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_recover_sign() {
        assert!((DamageKind::HpRecover.sign() + 1.0).abs() < f64::EPSILON);
        assert!((DamageKind::HpDamage.sign() - 1.0).abs() < f64::EPSILON);
        assert!(DamageKind::MpDrain.is_mp());
    }
}
