//! ParamPool - Shared inputs of every parameter calculation

use crate::types::{CombatantKind, ParamArray, ParamId};
use serde::{Deserialize, Serialize};

/// Raw parameter inputs owned by a combatant
///
/// Equipment contributions are not stored here; they are summed from the
/// equipped items whenever a parameter is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamPool {
    /// Class/level base value
    pub base: ParamArray,
    /// Bonus granted outside of equipment (growth items, events)
    pub plus: ParamArray,
    /// Trait multiplier
    pub rate: ParamArray,
    /// Buff/debuff multiplier
    pub buff_rate: ParamArray,
    /// Post-rate flat bonus, only read by custom parameter formulas
    pub flat: ParamArray,
    pub min: ParamArray,
    pub max: ParamArray,
}

impl ParamPool {
    /// Pool with zero base values and the engine's limits for a combatant kind
    pub fn new(kind: CombatantKind) -> Self {
        let mut max = [999.0; ParamId::COUNT];
        match kind {
            CombatantKind::Actor => {
                max[ParamId::MaxHp.index()] = 9999.0;
                max[ParamId::MaxMp.index()] = 9999.0;
            }
            CombatantKind::Enemy => {
                max[ParamId::MaxHp.index()] = 999_999.0;
                max[ParamId::MaxMp.index()] = 9999.0;
            }
        }
        let mut min = [1.0; ParamId::COUNT];
        min[ParamId::MaxMp.index()] = 0.0;

        ParamPool {
            base: [0.0; ParamId::COUNT],
            plus: [0.0; ParamId::COUNT],
            rate: [1.0; ParamId::COUNT],
            buff_rate: [1.0; ParamId::COUNT],
            flat: [0.0; ParamId::COUNT],
            min,
            max,
        }
    }

    pub fn base(&self, param: ParamId) -> f64 {
        self.base[param.index()]
    }

    pub fn plus(&self, param: ParamId) -> f64 {
        self.plus[param.index()]
    }

    pub fn rate(&self, param: ParamId) -> f64 {
        self.rate[param.index()]
    }

    pub fn buff_rate(&self, param: ParamId) -> f64 {
        self.buff_rate[param.index()]
    }

    pub fn flat(&self, param: ParamId) -> f64 {
        self.flat[param.index()]
    }

    pub fn min(&self, param: ParamId) -> f64 {
        self.min[param.index()]
    }

    /// Upper limit, never below the lower limit
    pub fn max(&self, param: ParamId) -> f64 {
        self.max[param.index()].max(self.min(param))
    }

    pub fn set_base(&mut self, param: ParamId, value: f64) {
        self.base[param.index()] = value;
    }

    pub fn add_plus(&mut self, param: ParamId, value: f64) {
        self.plus[param.index()] += value;
    }

    pub fn set_rate(&mut self, param: ParamId, value: f64) {
        self.rate[param.index()] = value;
    }

    pub fn set_buff_rate(&mut self, param: ParamId, value: f64) {
        self.buff_rate[param.index()] = value;
    }
}
