//! Equipment - A combatant's equipment slots

use crate::data::{EquipItem, WeaponDef};
use crate::types::{EquipType, Hand, ParamId};
use serde::{Deserialize, Serialize};

/// Number of equipment slots
pub const SLOT_COUNT: usize = 5;

/// Mainhand slot index
pub const MAINHAND_SLOT: usize = 0;
/// Offhand slot index
pub const OFFHAND_SLOT: usize = 1;

/// Slot types for a combatant; the offhand slot holds a weapon when the
/// class grants two weapon slots
pub fn slot_types(dual_wield_slots: bool) -> [EquipType; SLOT_COUNT] {
    let offhand = if dual_wield_slots {
        EquipType::Weapon
    } else {
        EquipType::Shield
    };
    [
        EquipType::Weapon,
        offhand,
        EquipType::Head,
        EquipType::Body,
        EquipType::Accessory,
    ]
}

/// Items currently equipped, by slot index
///
/// Slot 0 is the mainhand and slot 1 the offhand. Legality is enforced by
/// `Combatant::change_equip`; this type only stores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    slots: [Option<EquipItem>; SLOT_COUNT],
}

impl Equipment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Item in a slot, `None` for empty or out of range
    pub fn get(&self, slot: usize) -> Option<&EquipItem> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn main_item(&self) -> Option<&EquipItem> {
        self.get(MAINHAND_SLOT)
    }

    pub fn off_item(&self) -> Option<&EquipItem> {
        self.get(OFFHAND_SLOT)
    }

    /// Item held in a hand
    pub fn hand_item(&self, hand: Hand) -> Option<&EquipItem> {
        self.get(hand.slot_index())
    }

    /// Weapon held in a hand, `None` for a bare hand or a shield
    pub fn hand_weapon(&self, hand: Hand) -> Option<&WeaponDef> {
        self.hand_item(hand).and_then(EquipItem::as_weapon)
    }

    /// All equipped items in slot order
    pub fn items(&self) -> impl Iterator<Item = &EquipItem> {
        self.slots.iter().flatten()
    }

    /// Sum of the items' direct contributions to a parameter
    pub fn param_total(&self, param: ParamId) -> f64 {
        self.items().map(|item| item.param(param)).sum()
    }

    /// Store an item without any rule checks, returning the previous one
    pub(crate) fn replace(&mut self, slot: usize, item: Option<EquipItem>) -> Option<EquipItem> {
        match self.slots.get_mut(slot) {
            Some(entry) => std::mem::replace(entry, item),
            None => None,
        }
    }

    pub(crate) fn take(&mut self, slot: usize) -> Option<EquipItem> {
        self.replace(slot, None)
    }
}
