//! ActionOutcome - What an executed action did

use super::action::CombatantId;
use crate::damage::AttackTerm;
use crate::data::AttackMotion;
use crate::hand::HandPhase;
use crate::types::{Hand, SkillId, WeaponTypeId};
use serde::{Deserialize, Serialize};

/// How the presentation layer should show the current strike
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrikePresentation {
    /// Hand in use; `None` for combatants without hands
    pub hand: Option<Hand>,
    /// Weapon type of that hand, 0 for a bare hand
    pub wtype_id: WeaponTypeId,
    /// Attack motion of the weapon type, if one is defined
    pub motion: Option<AttackMotion>,
    pub animation_id: u32,
    /// Mainhand sprite and animation apply
    pub second_attack: bool,
    /// Offhand skill hit
    pub second_skill_hit: bool,
}

/// Result of one damage application
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeResult {
    pub user: CombatantId,
    pub target: CombatantId,
    /// Hand the damage was computed with
    pub hand: Option<Hand>,
    pub term: AttackTerm,
    /// Attack value fed to the formula
    pub attack: f64,
    /// Damage dealt; negative heals
    pub damage: f64,
    pub hp_before: f64,
    pub hp_after: f64,
    pub is_killing_blow: bool,
}

/// Everything an action emitted, in order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    Motion {
        user: CombatantId,
        presentation: StrikePresentation,
    },
    Animation {
        user: CombatantId,
        animation_id: u32,
        targets: Vec<CombatantId>,
    },
    Strike(StrikeResult),
    /// Target was already dead when its effect came up
    Skipped { target: CombatantId },
    Wait { frames: u32 },
    HandChanged { user: CombatantId, phase: HandPhase },
    Repeated { requested: usize, duplicated: usize },
    Custom { command: String },
}

/// Outcome of `Battle::execute_action`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub user: CombatantId,
    pub skill_id: SkillId,
    pub events: Vec<BattleEvent>,
}

impl ActionOutcome {
    pub fn new(user: CombatantId, skill_id: SkillId) -> Self {
        ActionOutcome {
            user,
            skill_id,
            events: Vec::new(),
        }
    }

    /// Strikes in execution order
    pub fn strikes(&self) -> impl Iterator<Item = &StrikeResult> {
        self.events.iter().filter_map(|event| match event {
            BattleEvent::Strike(strike) => Some(strike),
            _ => None,
        })
    }

    pub fn strike_count(&self) -> usize {
        self.strikes().count()
    }

    /// Hands of every strike, in order
    pub fn hands(&self) -> Vec<Option<Hand>> {
        self.strikes().map(|s| s.hand).collect()
    }

    /// Sum of all strike damage
    pub fn total_damage(&self) -> f64 {
        self.strikes().map(|s| s.damage).sum()
    }

    pub fn killed_any(&self) -> bool {
        self.strikes().any(|s| s.is_killing_blow)
    }

    /// Get a summary string
    pub fn summary(&self) -> String {
        let parts: Vec<String> = self
            .strikes()
            .map(|s| {
                let hand = match s.hand {
                    Some(Hand::Main) => "main",
                    Some(Hand::Off) => "off",
                    None => "-",
                };
                let mut part = format!("{} {:.0} ({})", s.target, s.damage, hand);
                if s.is_killing_blow {
                    part.push_str(" FATAL");
                }
                part
            })
            .collect();

        if parts.is_empty() {
            "No strikes".to_string()
        } else {
            parts.join(", ")
        }
    }
}
