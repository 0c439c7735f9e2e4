//! Attack power per hand and the parameter pipeline that serves it

mod bonus;
pub mod calculator;
mod pipeline;

pub use bonus::{ConditionalBonus, ItemBonusTable, ItemKey};
pub use calculator::{equipment_bonus, hand_contribution, mainhand_power, offhand_power};
pub use pipeline::{
    BaseParamResolver, CustomFormulaResolver, HandPowerResolver, ParamInputs, ParamPipeline,
    ParamPipelineBuilder, ParamResolver,
};

use crate::config::DualWieldConfig;
use crate::eligibility::BattleContext;

/// Read-only context shared by every parameter calculation
#[derive(Debug, Clone, Copy)]
pub struct ParamEnv<'a> {
    pub battle: BattleContext,
    pub config: &'a DualWieldConfig,
    /// Conditional equipment bonuses; `None` counts as zero
    pub bonus: Option<&'a dyn ConditionalBonus>,
}
