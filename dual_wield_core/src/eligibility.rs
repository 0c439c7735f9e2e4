//! Dual-wield eligibility queries

use crate::combatant::Combatant;
use crate::config::DualWieldConfig;
use crate::data::EquipItem;
use crate::types::{EquipType, Hand};
use serde::{Deserialize, Serialize};

/// Whether a battle is in progress
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleContext {
    pub in_battle: bool,
}

impl BattleContext {
    pub const IN_BATTLE: BattleContext = BattleContext { in_battle: true };
    pub const FIELD: BattleContext = BattleContext { in_battle: false };
}

/// Class grants two weapon slots
pub fn is_dual_wield_capable(combatant: &Combatant) -> bool {
    combatant.dual_wield_slots
}

/// Offhand slot is empty or holds a weapon
pub fn is_offhand_armed(combatant: &Combatant) -> bool {
    combatant
        .equipment()
        .off_item()
        .map(|item| item.etype() == EquipType::Weapon)
        .unwrap_or(true)
}

/// Two-handed weapon with a usable offhand. Not supported; always false.
pub fn is_monkey_gripping(_combatant: &Combatant) -> bool {
    false
}

/// Not supported; always false.
pub fn can_monkey_grip(_combatant: &Combatant) -> bool {
    false
}

/// Whether the combatant strikes with both hands
///
/// Outside of battle only the class trait is checked, so equipment screens
/// can preview both hands. In battle the mainhand must not be two-handed and
/// the offhand must be armed.
pub fn is_effectively_dual_wielding(combatant: &Combatant, ctx: BattleContext) -> bool {
    if is_monkey_gripping(combatant) {
        return false;
    }
    if !ctx.in_battle {
        return is_dual_wield_capable(combatant);
    }
    let main_two_handed = combatant
        .equipment()
        .main_item()
        .map(EquipItem::is_two_handed)
        .unwrap_or(false);
    is_dual_wield_capable(combatant) && !main_two_handed && is_offhand_armed(combatant)
}

/// Whether the configured disable state is active
pub fn is_disabled(combatant: &Combatant, config: &DualWieldConfig) -> bool {
    config.has_disable_state() && combatant.has_state(config.disable_state_id)
}

/// Extra strikes added to a plain attack
///
/// Dual-wielding with a one-handed mainhand weapon guarantees one extra
/// strike. Other traits may add more; the larger value wins.
pub fn attack_times_add(combatant: &Combatant, ctx: BattleContext, config: &DualWieldConfig) -> u32 {
    let traits = combatant.attack_times_traits;
    if is_disabled(combatant, config) {
        return traits;
    }
    let one_handed_main = combatant
        .equipment()
        .hand_weapon(Hand::Main)
        .map(|w| !w.tag.is_two_handed())
        .unwrap_or(false);
    if is_effectively_dual_wielding(combatant, ctx) && one_handed_main {
        traits.max(1)
    } else {
        traits
    }
}

/// Strikes performed by a plain attack
pub fn strike_count(combatant: &Combatant, ctx: BattleContext, config: &DualWieldConfig) -> u32 {
    1 + attack_times_add(combatant, ctx, config)
}

/// Dual-wield hand cycling applies to this combatant's strikes
pub fn alternates_hands(combatant: &Combatant, ctx: BattleContext, config: &DualWieldConfig) -> bool {
    is_effectively_dual_wielding(combatant, ctx) && !is_disabled(combatant, config)
}

/// Every eligibility answer for one combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualWieldStatus {
    pub capable: bool,
    pub offhand_armed: bool,
    pub dual_wielding: bool,
    pub monkey_gripping: bool,
    pub disabled: bool,
    pub strikes: u32,
}

impl DualWieldStatus {
    pub fn evaluate(combatant: &Combatant, ctx: BattleContext, config: &DualWieldConfig) -> Self {
        DualWieldStatus {
            capable: is_dual_wield_capable(combatant),
            offhand_armed: is_offhand_armed(combatant),
            dual_wielding: is_effectively_dual_wielding(combatant, ctx),
            monkey_gripping: is_monkey_gripping(combatant),
            disabled: is_disabled(combatant, config),
            strikes: strike_count(combatant, ctx, config),
        }
    }
}
