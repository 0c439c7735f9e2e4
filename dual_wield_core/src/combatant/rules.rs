//! Equip-slot legality and equipment changes

use super::equipment::{slot_types, MAINHAND_SLOT, OFFHAND_SLOT, SLOT_COUNT};
use super::Combatant;
use crate::data::EquipItem;
use crate::types::EquipType;
use thiserror::Error;

/// Equipment change error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquipError {
    #[error("slot {0} does not exist")]
    InvalidSlot(usize),
    #[error("{0:?} equipment is sealed")]
    Sealed(EquipType),
    #[error("{item} cannot be equipped in slot {slot}")]
    IllegalSlot { slot: usize, item: String },
}

impl Combatant {
    /// Whether the class, weapon type and seal rules allow an item at all
    pub fn can_equip(&self, item: &EquipItem) -> bool {
        if self.sealed.contains(&item.etype()) {
            return false;
        }
        match item.as_weapon() {
            Some(weapon) => {
                let type_allowed =
                    self.weapon_types.is_empty() || self.weapon_types.contains(&weapon.wtype_id);
                type_allowed && (!weapon.tag.is_offhand_only() || self.dual_wield_slots)
            }
            None => true,
        }
    }

    /// Whether an item may be placed in a slot given the current equipment
    pub fn can_equip_in_slot(&self, slot: usize, item: &EquipItem) -> bool {
        if slot >= SLOT_COUNT {
            return false;
        }
        let main = self.equipment.main_item();
        let main_two_handed = main.map(EquipItem::is_two_handed).unwrap_or(false);
        let weapon_tag = item.as_weapon().map(|w| w.tag).unwrap_or_default();

        if slot == OFFHAND_SLOT
            && !self.dual_wield_slots
            && main_two_handed
            && !item.is_offhand_capable_armor()
        {
            return false;
        }
        if slot == OFFHAND_SLOT && weapon_tag.is_mainhand_only() {
            return false;
        }
        if slot == MAINHAND_SLOT && weapon_tag.is_offhand_only() {
            return false;
        }

        if self.dual_wield_slots
            && slot == OFFHAND_SLOT
            && matches!(item.etype(), EquipType::Weapon | EquipType::Shield)
        {
            return self.can_equip(item)
                && !item.is_two_handed()
                && (!main_two_handed || item.is_offhand_capable_armor());
        }

        slot_types(self.dual_wield_slots)[slot] == item.etype() && self.can_equip(item)
    }

    /// Place an item in a slot, or empty it with `None`
    ///
    /// Returns every item removed by the change. A two-handed mainhand also
    /// removes an offhand item that is not offhand-capable armor.
    pub fn change_equip(
        &mut self,
        slot: usize,
        item: Option<EquipItem>,
    ) -> Result<Vec<EquipItem>, EquipError> {
        if slot >= SLOT_COUNT {
            return Err(EquipError::InvalidSlot(slot));
        }
        let slot_type = slot_types(self.dual_wield_slots)[slot];
        if self.sealed.contains(&slot_type) {
            return Err(EquipError::Sealed(slot_type));
        }
        if let Some(item) = &item {
            if !self.can_equip_in_slot(slot, item) {
                return Err(EquipError::IllegalSlot {
                    slot,
                    item: item.name().to_string(),
                });
            }
        }

        let mut released: Vec<EquipItem> = self.equipment.replace(slot, item).into_iter().collect();

        let main_two_handed = self
            .equipment
            .main_item()
            .map(EquipItem::is_two_handed)
            .unwrap_or(false);
        let offhand_blocked = self
            .equipment
            .off_item()
            .map(|off| !off.is_offhand_capable_armor())
            .unwrap_or(false);
        if slot == MAINHAND_SLOT && main_two_handed && offhand_blocked {
            released.extend(self.equipment.take(OFFHAND_SLOT));
        }

        tracing::debug!(
            "{} slot {} changed, released {:?}",
            self.name,
            slot,
            released.iter().map(EquipItem::name).collect::<Vec<_>>()
        );
        Ok(released)
    }

    /// Empty a slot, returning the removed item
    pub fn unequip(&mut self, slot: usize) -> Result<Option<EquipItem>, EquipError> {
        Ok(self.change_equip(slot, None)?.into_iter().next())
    }
}
