//! Equipment and skill classification from note annotations
//!
//! Classification runs once when the database is built. The resulting tags
//! are stored on the definitions and never change afterwards.

pub mod notes;

use serde::{Deserialize, Serialize};

const TAG_TWO_HANDED: &str = "TWOHANDED";
const TAG_MAINHAND: &str = "MAINHAND";
const TAG_OFFHAND: &str = "OFFHAND";
const TAG_DUAL_WIELD_SKILL: &str = "DUALWIELD SKILL";
const TAG_MAINHAND_SKILL: &str = "MAINHAND SKILL";
const TAG_OFFHAND_SKILL: &str = "OFFHAND SKILL";

/// How a weapon may be held
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponTag {
    /// No restriction
    #[default]
    Unrestricted,
    /// Occupies the mainhand and blocks an offhand weapon
    TwoHanded,
    /// May never be placed in the offhand
    MainhandOnly,
    /// May never be placed in the mainhand
    OffhandOnly,
}

impl WeaponTag {
    pub fn is_two_handed(self) -> bool {
        self == WeaponTag::TwoHanded
    }

    pub fn is_mainhand_only(self) -> bool {
        self == WeaponTag::MainhandOnly
    }

    pub fn is_offhand_only(self) -> bool {
        self == WeaponTag::OffhandOnly
    }
}

/// Armor annotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ArmorTag {
    /// Usable in the offhand even beside a two-handed mainhand
    pub is_offhand_capable: bool,
}

/// Which hand a skill strikes with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillTag {
    #[default]
    None,
    /// Splits its strikes between both hands like a plain attack
    DualWield,
    /// Every strike uses the mainhand
    MainhandOnly,
    /// Every strike uses the offhand
    OffhandOnly,
}

/// Classify a weapon note
///
/// `<Twohanded>` wins over `<Mainhand>`, which wins over `<Offhand>`, so an
/// offhand-only weapon can never also claim the mainhand.
pub fn classify_weapon(note: &str) -> WeaponTag {
    if notes::has_tag(note, TAG_TWO_HANDED) {
        WeaponTag::TwoHanded
    } else if notes::has_tag(note, TAG_MAINHAND) {
        WeaponTag::MainhandOnly
    } else if notes::has_tag(note, TAG_OFFHAND) {
        WeaponTag::OffhandOnly
    } else {
        WeaponTag::Unrestricted
    }
}

/// Classify an armor note
pub fn classify_armor(note: &str) -> ArmorTag {
    ArmorTag {
        is_offhand_capable: notes::has_tag(note, TAG_OFFHAND),
    }
}

/// Classify a skill note
///
/// Precedence when several tags are present: mainhand, then offhand, then
/// dual wield.
pub fn classify_skill(note: &str) -> SkillTag {
    let found = notes::tags(note);
    let has = |tag: &str| found.iter().any(|t| t == tag);

    let tag = if has(TAG_MAINHAND_SKILL) {
        SkillTag::MainhandOnly
    } else if has(TAG_OFFHAND_SKILL) {
        SkillTag::OffhandOnly
    } else if has(TAG_DUAL_WIELD_SKILL) {
        SkillTag::DualWield
    } else {
        SkillTag::None
    };

    let hand_tags = [TAG_MAINHAND_SKILL, TAG_OFFHAND_SKILL, TAG_DUAL_WIELD_SKILL]
        .iter()
        .filter(|t| has(t))
        .count();
    if hand_tags > 1 {
        tracing::debug!("skill note carries {} hand tags, using {:?}", hand_tags, tag);
    }

    tag
}
