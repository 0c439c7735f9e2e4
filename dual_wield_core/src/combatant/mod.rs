//! Combatant - A party member or troop member taking part in actions

mod equipment;
mod params;
mod rules;

pub use equipment::{slot_types, Equipment, MAINHAND_SLOT, OFFHAND_SLOT, SLOT_COUNT};
pub use params::ParamPool;
pub use rules::EquipError;

use crate::hand::HandCycleState;
use crate::types::{CombatantKind, EquipType, ParamId, StateId, WeaponTypeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One combatant's persistent and transient battle state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    // === Identity ===
    pub name: String,
    pub kind: CombatantKind,
    pub level: u32,

    // === Class traits ===
    /// Class grants two weapon slots
    #[serde(default)]
    pub dual_wield_slots: bool,
    /// Additional strikes from traits other than dual-wielding
    #[serde(default)]
    pub attack_times_traits: u32,
    /// Weapon types the class may equip; empty allows every type
    #[serde(default)]
    pub weapon_types: HashSet<WeaponTypeId>,
    /// Equipment types that cannot be changed
    #[serde(default)]
    pub sealed: HashSet<EquipType>,
    /// Animation used by combatants that strike without weapons
    #[serde(default = "default_attack_animation")]
    pub attack_animation_id: u32,

    // === Parameters ===
    pub params: ParamPool,
    pub hp: f64,
    pub mp: f64,

    // === Equipment ===
    #[serde(default)]
    equipment: Equipment,

    // === Status ===
    #[serde(default)]
    pub states: HashSet<StateId>,

    // === Transient ===
    #[serde(skip)]
    hand: HandCycleState,
}

fn default_attack_animation() -> u32 {
    1
}

impl Combatant {
    fn new(name: impl Into<String>, kind: CombatantKind) -> Self {
        Combatant {
            name: name.into(),
            kind,
            level: 1,
            dual_wield_slots: false,
            attack_times_traits: 0,
            weapon_types: HashSet::new(),
            sealed: HashSet::new(),
            attack_animation_id: default_attack_animation(),
            params: ParamPool::new(kind),
            hp: 1.0,
            mp: 0.0,
            equipment: Equipment::new(),
            states: HashSet::new(),
            hand: HandCycleState::new(),
        }
    }

    /// Create a player-controlled combatant
    pub fn actor(name: impl Into<String>) -> Self {
        Self::new(name, CombatantKind::Actor)
    }

    /// Create a troop member
    pub fn enemy(name: impl Into<String>) -> Self {
        Self::new(name, CombatantKind::Enemy)
    }

    // === Builders ===

    pub fn with_dual_wield_slots(mut self) -> Self {
        self.dual_wield_slots = true;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    /// Set a base parameter; max HP and MP also refill the current value
    pub fn with_base(mut self, param: ParamId, value: f64) -> Self {
        self.params.set_base(param, value);
        match param {
            ParamId::MaxHp => self.hp = value,
            ParamId::MaxMp => self.mp = value,
            _ => {}
        }
        self
    }

    pub fn with_attack_times(mut self, extra: u32) -> Self {
        self.attack_times_traits = extra;
        self
    }

    pub fn with_weapon_types(mut self, types: impl IntoIterator<Item = WeaponTypeId>) -> Self {
        self.weapon_types = types.into_iter().collect();
        self
    }

    pub fn with_attack_animation(mut self, animation_id: u32) -> Self {
        self.attack_animation_id = animation_id;
        self
    }

    pub fn with_state(mut self, state: StateId) -> Self {
        self.states.insert(state);
        self
    }

    pub fn is_actor(&self) -> bool {
        self.kind == CombatantKind::Actor
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    pub fn has_state(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }

    pub fn add_state(&mut self, state: StateId) {
        self.states.insert(state);
    }

    pub fn remove_state(&mut self, state: StateId) {
        self.states.remove(&state);
    }

    pub fn equipment(&self) -> &Equipment {
        &self.equipment
    }

    pub fn hand(&self) -> &HandCycleState {
        &self.hand
    }

    pub fn hand_mut(&mut self) -> &mut HandCycleState {
        &mut self.hand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let actor = Combatant::actor("Ramza")
            .with_dual_wield_slots()
            .with_level(12)
            .with_base(ParamId::MaxHp, 320.0)
            .with_base(ParamId::Attack, 40.0)
            .with_weapon_types([1, 2]);

        assert!(actor.is_actor());
        assert!(actor.dual_wield_slots);
        assert!(actor.is_alive());
        assert!((actor.hp - 320.0).abs() < f64::EPSILON);
        assert!((actor.params.base(ParamId::Attack) - 40.0).abs() < f64::EPSILON);
        assert!(actor.hand().is_idle());
    }

    #[test]
    fn test_states() {
        let mut enemy = Combatant::enemy("Goblin").with_state(4);
        assert!(enemy.has_state(4));
        enemy.remove_state(4);
        assert!(!enemy.has_state(4));
        enemy.add_state(7);
        assert!(enemy.has_state(7));
    }

    #[test]
    fn test_hand_state_is_not_serialized() {
        let mut actor = Combatant::actor("Delita");
        actor.hand_mut().begin_strike();
        let json = serde_json::to_string(&actor).unwrap();
        let restored: Combatant = serde_json::from_str(&json).unwrap();
        assert!(restored.hand().is_idle());
        assert_eq!(restored.name, "Delita");
    }
}
