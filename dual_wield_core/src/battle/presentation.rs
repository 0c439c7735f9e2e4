//! Strike presentation - which weapon's motion and animation to show

use super::result::StrikePresentation;
use crate::combatant::Combatant;
use crate::config::DualWieldConfig;
use crate::data::Database;
use crate::eligibility::{alternates_hands, is_effectively_dual_wielding, BattleContext};
use crate::hand::{is_second_attack, is_second_skill_hit};
use crate::types::Hand;

/// Hand whose weapon is shown for the current strike
///
/// The hand cycle only matters while the combatant alternates hands or is
/// pinned by a hand-locked skill; otherwise actors show their mainhand.
pub fn presented_hand(combatant: &Combatant, battle: BattleContext, config: &DualWieldConfig) -> Option<Hand> {
    if !combatant.is_actor() {
        return None;
    }
    let locked = is_effectively_dual_wielding(combatant, battle) && combatant.hand().locked_hand().is_some();
    if alternates_hands(combatant, battle, config) || locked {
        Some(combatant.hand().strike_hand())
    } else {
        Some(Hand::Main)
    }
}

/// Describe the current strike of a combatant
pub fn present_strike(
    combatant: &Combatant,
    battle: BattleContext,
    config: &DualWieldConfig,
    database: &Database,
) -> StrikePresentation {
    let hand = presented_hand(combatant, battle, config);
    let weapon = hand.and_then(|h| combatant.equipment().hand_weapon(h));

    let (wtype_id, animation_id) = match (hand, weapon) {
        (None, _) => (0, combatant.attack_animation_id),
        (Some(_), Some(weapon)) => (weapon.wtype_id, weapon.animation_id),
        (Some(_), None) => (0, database.bare_hand_animation_id()),
    };

    StrikePresentation {
        hand,
        wtype_id,
        motion: hand.and_then(|_| database.attack_motion(wtype_id)),
        animation_id,
        second_attack: is_second_attack(combatant.kind, combatant.hand()),
        second_skill_hit: is_second_skill_hit(combatant.kind, combatant.hand()),
    }
}
