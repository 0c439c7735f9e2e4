//! Conditional equipment bonuses supplied from outside the core

use crate::combatant::Combatant;
use crate::data::EquipItem;
use crate::types::{ArmorId, ParamId, WeaponId};
use std::collections::HashMap;

/// Extra parameter value an equipped item grants under some condition
///
/// Implemented by whatever bonus system the game runs. When none is
/// installed every item's conditional bonus is zero.
pub trait ConditionalBonus: std::fmt::Debug {
    fn bonus(&self, combatant: &Combatant, item: &EquipItem, param: ParamId) -> f64;
}

/// Table lookup key for [`ItemBonusTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKey {
    Weapon(WeaponId),
    Armor(ArmorId),
}

impl ItemKey {
    pub fn of(item: &EquipItem) -> ItemKey {
        match item {
            EquipItem::Weapon(weapon) => ItemKey::Weapon(weapon.id),
            EquipItem::Armor(armor) => ItemKey::Armor(armor.id),
        }
    }
}

/// Fixed per-item bonuses
#[derive(Debug, Clone, Default)]
pub struct ItemBonusTable {
    entries: HashMap<(ItemKey, ParamId), f64>,
}

impl ItemBonusTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: ItemKey, param: ParamId, value: f64) -> Self {
        self.entries.insert((key, param), value);
        self
    }
}

impl ConditionalBonus for ItemBonusTable {
    fn bonus(&self, _combatant: &Combatant, item: &EquipItem, param: ParamId) -> f64 {
        self.entries
            .get(&(ItemKey::of(item), param))
            .copied()
            .unwrap_or(0.0)
    }
}
