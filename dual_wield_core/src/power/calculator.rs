//! Per-hand attack power
//!
//! Both hands draw on one parameter pool. The pool's own bonus is scaled by
//! the hand's role modifier, while equipment bonuses are added unscaled
//! with the other hand's weapon taken out.

use super::pipeline::ParamInputs;
use super::ParamEnv;
use crate::combatant::Combatant;
use crate::data::EquipItem;
use crate::eligibility::{is_effectively_dual_wielding, is_monkey_gripping};
use crate::types::{EquipType, Hand, ParamId};

/// Direct attack plus conditional bonus of one item
fn item_attack(env: &ParamEnv<'_>, combatant: &Combatant, item: &EquipItem) -> f64 {
    let conditional = env
        .bonus
        .map(|b| b.bonus(combatant, item, ParamId::Attack))
        .unwrap_or(0.0);
    item.param(ParamId::Attack) + conditional
}

/// Attack granted by every equipped item with a direct attack value
pub fn equipment_bonus(env: &ParamEnv<'_>, combatant: &Combatant) -> f64 {
    combatant
        .equipment()
        .items()
        .filter(|item| item.param(ParamId::Attack) != 0.0)
        .map(|item| item_attack(env, combatant, item))
        .sum()
}

/// Attack contributed by the weapon in a hand; shields and bare hands give 0
pub fn hand_contribution(env: &ParamEnv<'_>, combatant: &Combatant, hand: Hand) -> f64 {
    match combatant.equipment().hand_item(hand) {
        Some(item) if item.is_weapon() => item_attack(env, combatant, item),
        _ => 0.0,
    }
}

/// Role modifier of the mainhand
///
/// The dual-wield modifier only applies while both hands are in use: an
/// empty mainhand, or a mainhand paired with a non-shield offhand item.
pub fn mainhand_modifier(env: &ParamEnv<'_>, combatant: &Combatant) -> f64 {
    let equipment = combatant.equipment();
    let main_two_handed = equipment
        .main_item()
        .map(EquipItem::is_two_handed)
        .unwrap_or(false);
    let both_hands_used = equipment.main_item().is_none()
        || equipment
            .off_item()
            .map(|off| off.etype() != EquipType::Shield)
            .unwrap_or(false);

    if is_monkey_gripping(combatant) {
        env.config.dual_wield_modifier
    } else if main_two_handed {
        env.config.two_handed_modifier
    } else if is_effectively_dual_wielding(combatant, env.battle) && both_hands_used {
        env.config.dual_wield_modifier
    } else {
        1.0
    }
}

/// Role modifier of the offhand
pub fn offhand_modifier(env: &ParamEnv<'_>) -> f64 {
    env.config.offhand_modifier * env.config.dual_wield_modifier
}

/// Attack inputs of one hand, derived from the unmodified inputs
pub fn hand_inputs(
    env: &ParamEnv<'_>,
    combatant: &Combatant,
    hand: Hand,
    raw: ParamInputs,
) -> ParamInputs {
    let (modifier, excluded) = match hand {
        Hand::Main => (mainhand_modifier(env, combatant), hand_contribution(env, combatant, Hand::Off)),
        Hand::Off => (offhand_modifier(env), hand_contribution(env, combatant, Hand::Main)),
    };
    scaled(env, combatant, raw, modifier, excluded)
}

/// Attack inputs of the combatant as a whole: the mainhand role with every
/// equipment bonus kept
pub fn overall_inputs(env: &ParamEnv<'_>, combatant: &Combatant, raw: ParamInputs) -> ParamInputs {
    scaled(env, combatant, raw, mainhand_modifier(env, combatant), 0.0)
}

fn scaled(
    env: &ParamEnv<'_>,
    combatant: &Combatant,
    raw: ParamInputs,
    modifier: f64,
    excluded: f64,
) -> ParamInputs {
    let own = combatant.params.plus(ParamId::Attack);
    ParamInputs {
        base: raw.base * modifier,
        plus: own * modifier + (equipment_bonus(env, combatant) - excluded),
        ..raw
    }
}

/// Mainhand attack with the default parameter formula
pub fn mainhand_power(env: &ParamEnv<'_>, combatant: &Combatant) -> f64 {
    hand_power(env, combatant, Hand::Main)
}

/// Offhand attack with the default parameter formula
pub fn offhand_power(env: &ParamEnv<'_>, combatant: &Combatant) -> f64 {
    hand_power(env, combatant, Hand::Off)
}

pub fn hand_power(env: &ParamEnv<'_>, combatant: &Combatant, hand: Hand) -> f64 {
    let raw = ParamInputs::from_pool(combatant, ParamId::Attack);
    let value = hand_inputs(env, combatant, hand, raw).default_value();
    tracing::trace!("{} {:?} attack {}", combatant.name, hand, value);
    value
}
