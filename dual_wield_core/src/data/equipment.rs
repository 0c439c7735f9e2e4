//! Weapon and armor definitions

use crate::classify::{classify_armor, classify_weapon, ArmorTag, WeaponTag};
use crate::types::{ArmorId, EquipType, ParamArray, ParamId, WeaponId, WeaponTypeId};
use serde::{Deserialize, Serialize};

/// A weapon as loaded from the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponDef {
    pub id: WeaponId,
    pub name: String,
    /// Weapon type, selects the attack motion
    pub wtype_id: WeaponTypeId,
    /// Battle animation played when striking with this weapon
    #[serde(default = "default_animation_id")]
    pub animation_id: u32,
    /// Flat parameter contributions, in [`ParamId`] order
    #[serde(default)]
    pub params: ParamArray,
    #[serde(default)]
    pub note: String,
    /// Computed from `note` when the database is built
    #[serde(skip)]
    pub tag: WeaponTag,
}

fn default_animation_id() -> u32 {
    1
}

impl WeaponDef {
    /// Create a weapon with no parameters
    pub fn new(id: WeaponId, name: impl Into<String>, wtype_id: WeaponTypeId) -> Self {
        WeaponDef {
            id,
            name: name.into(),
            wtype_id,
            animation_id: default_animation_id(),
            params: [0.0; ParamId::COUNT],
            note: String::new(),
            tag: WeaponTag::Unrestricted,
        }
    }

    /// Set one parameter contribution
    pub fn with_param(mut self, param: ParamId, value: f64) -> Self {
        self.params[param.index()] = value;
        self
    }

    pub fn with_animation(mut self, animation_id: u32) -> Self {
        self.animation_id = animation_id;
        self
    }

    /// Set the note and reclassify
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self.classify();
        self
    }

    /// Recompute the tag from the note
    pub fn classify(&mut self) {
        self.tag = classify_weapon(&self.note);
    }
}

/// An armor (including shields) as loaded from the database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArmorDef {
    pub id: ArmorId,
    pub name: String,
    pub etype: EquipType,
    /// Flat parameter contributions, in [`ParamId`] order
    #[serde(default)]
    pub params: ParamArray,
    #[serde(default)]
    pub note: String,
    /// Computed from `note` when the database is built
    #[serde(skip)]
    pub tag: ArmorTag,
}

impl ArmorDef {
    /// Create an armor with no parameters
    pub fn new(id: ArmorId, name: impl Into<String>, etype: EquipType) -> Self {
        ArmorDef {
            id,
            name: name.into(),
            etype,
            params: [0.0; ParamId::COUNT],
            note: String::new(),
            tag: ArmorTag::default(),
        }
    }

    pub fn with_param(mut self, param: ParamId, value: f64) -> Self {
        self.params[param.index()] = value;
        self
    }

    /// Set the note and reclassify
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self.classify();
        self
    }

    /// Recompute the tag from the note
    pub fn classify(&mut self) {
        self.tag = classify_armor(&self.note);
    }
}

/// Anything that can sit in an equipment slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EquipItem {
    Weapon(WeaponDef),
    Armor(ArmorDef),
}

impl EquipItem {
    /// Equipment category used by the slot rules
    pub fn etype(&self) -> EquipType {
        match self {
            EquipItem::Weapon(_) => EquipType::Weapon,
            EquipItem::Armor(armor) => armor.etype,
        }
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self, EquipItem::Weapon(_))
    }

    /// Get the weapon definition if this is a weapon
    pub fn as_weapon(&self) -> Option<&WeaponDef> {
        match self {
            EquipItem::Weapon(weapon) => Some(weapon),
            EquipItem::Armor(_) => None,
        }
    }

    /// Get the armor definition if this is an armor
    pub fn as_armor(&self) -> Option<&ArmorDef> {
        match self {
            EquipItem::Weapon(_) => None,
            EquipItem::Armor(armor) => Some(armor),
        }
    }

    /// Direct contribution of this item to a parameter
    pub fn param(&self, param: ParamId) -> f64 {
        match self {
            EquipItem::Weapon(weapon) => weapon.params[param.index()],
            EquipItem::Armor(armor) => armor.params[param.index()],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            EquipItem::Weapon(weapon) => &weapon.name,
            EquipItem::Armor(armor) => &armor.name,
        }
    }

    pub fn is_two_handed(&self) -> bool {
        self.as_weapon().map(|w| w.tag.is_two_handed()).unwrap_or(false)
    }

    pub fn is_offhand_capable_armor(&self) -> bool {
        self.as_armor().map(|a| a.tag.is_offhand_capable).unwrap_or(false)
    }
}

impl From<WeaponDef> for EquipItem {
    fn from(weapon: WeaponDef) -> Self {
        EquipItem::Weapon(weapon)
    }
}

impl From<ArmorDef> for EquipItem {
    fn from(armor: ArmorDef) -> Self {
        EquipItem::Armor(armor)
    }
}
