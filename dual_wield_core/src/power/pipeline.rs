//! Parameter resolution pipeline
//!
//! A parameter is computed in two steps: a resolver first gathers its
//! [`ParamInputs`], then evaluates them to a value. Resolvers wrap one
//! another and may replace either step:
//!
//! ```text
//! HandPowerResolver      replaces the attack inputs of actors
//!   CustomFormulaResolver  replaces evaluation for configured parameters
//!     BaseParamResolver      pool + equipment, default formula
//! ```

use super::calculator;
use super::{ConditionalBonus, ParamEnv};
use crate::combatant::Combatant;
use crate::config::DualWieldConfig;
use crate::eligibility::BattleContext;
use crate::formula::{Bindings, Formula, Operand, ParamInput, StatSnapshot};
use crate::types::{round_half_up, Hand, ParamId};
use std::collections::HashMap;

/// Everything a parameter formula reads
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamInputs {
    pub base: f64,
    pub plus: f64,
    pub rate: f64,
    pub buff_rate: f64,
    pub flat: f64,
    pub min: f64,
    pub max: f64,
}

impl ParamInputs {
    /// Inputs straight from the combatant's pool, without equipment
    pub fn from_pool(combatant: &Combatant, param: ParamId) -> Self {
        let pool = &combatant.params;
        ParamInputs {
            base: pool.base(param),
            plus: pool.plus(param),
            rate: pool.rate(param),
            buff_rate: pool.buff_rate(param),
            flat: pool.flat(param),
            min: pool.min(param),
            max: pool.max(param),
        }
    }

    /// `(base + plus) * rate * buff_rate`, rounded and clamped
    pub fn default_value(&self) -> f64 {
        self.finish((self.base + self.plus) * self.rate * self.buff_rate)
    }

    /// Round and clamp a raw value; non-finite values fall to the minimum
    pub fn finish(&self, value: f64) -> f64 {
        if !value.is_finite() {
            return self.min;
        }
        round_half_up(value).clamp(self.min, self.max)
    }
}

impl Bindings for ParamInputs {
    fn operand(&self, operand: Operand) -> Option<f64> {
        match operand {
            Operand::Input(input) => Some(match input {
                ParamInput::Base => self.base,
                ParamInput::Plus => self.plus,
                ParamInput::Rate => self.rate,
                ParamInput::BuffRate => self.buff_rate,
                ParamInput::Flat => self.flat,
                ParamInput::Min => self.min,
                ParamInput::Max => self.max,
            }),
            _ => None,
        }
    }
}

/// One stage of parameter resolution
pub trait ParamResolver: std::fmt::Debug {
    /// Gather the inputs of a parameter
    fn inputs(&self, env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> ParamInputs;

    /// Turn inputs into the parameter value
    fn evaluate(
        &self,
        env: &ParamEnv<'_>,
        combatant: &Combatant,
        param: ParamId,
        inputs: ParamInputs,
    ) -> f64;

    fn resolve(&self, env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> f64 {
        let inputs = self.inputs(env, combatant, param);
        self.evaluate(env, combatant, param, inputs)
    }

    /// Attack of one hand, evaluated by this stage
    fn hand_power(&self, env: &ParamEnv<'_>, combatant: &Combatant, hand: Hand) -> f64 {
        let raw = self.inputs(env, combatant, ParamId::Attack);
        let inputs = calculator::hand_inputs(env, combatant, hand, raw);
        self.evaluate(env, combatant, ParamId::Attack, inputs)
    }
}

impl<R: ParamResolver + ?Sized> ParamResolver for Box<R> {
    fn inputs(&self, env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> ParamInputs {
        (**self).inputs(env, combatant, param)
    }

    fn evaluate(
        &self,
        env: &ParamEnv<'_>,
        combatant: &Combatant,
        param: ParamId,
        inputs: ParamInputs,
    ) -> f64 {
        (**self).evaluate(env, combatant, param, inputs)
    }

    fn resolve(&self, env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> f64 {
        (**self).resolve(env, combatant, param)
    }

    fn hand_power(&self, env: &ParamEnv<'_>, combatant: &Combatant, hand: Hand) -> f64 {
        (**self).hand_power(env, combatant, hand)
    }
}

/// Pool values plus direct equipment contributions
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseParamResolver;

impl ParamResolver for BaseParamResolver {
    fn inputs(&self, _env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> ParamInputs {
        let mut inputs = ParamInputs::from_pool(combatant, param);
        inputs.plus += combatant.equipment().param_total(param);
        inputs
    }

    fn evaluate(
        &self,
        _env: &ParamEnv<'_>,
        _combatant: &Combatant,
        _param: ParamId,
        inputs: ParamInputs,
    ) -> f64 {
        inputs.default_value()
    }
}

/// Replaces the default formula for selected parameters
///
/// A formula that fails to evaluate falls back to the wrapped stage.
#[derive(Debug)]
pub struct CustomFormulaResolver<R> {
    inner: R,
    formulas: HashMap<ParamId, Formula>,
}

impl<R: ParamResolver> CustomFormulaResolver<R> {
    pub fn new(inner: R, formulas: HashMap<ParamId, Formula>) -> Self {
        CustomFormulaResolver { inner, formulas }
    }
}

impl<R: ParamResolver> ParamResolver for CustomFormulaResolver<R> {
    fn inputs(&self, env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> ParamInputs {
        self.inner.inputs(env, combatant, param)
    }

    fn evaluate(
        &self,
        env: &ParamEnv<'_>,
        combatant: &Combatant,
        param: ParamId,
        inputs: ParamInputs,
    ) -> f64 {
        let Some(formula) = self.formulas.get(&param) else {
            return self.inner.evaluate(env, combatant, param, inputs);
        };
        match formula.evaluate(&inputs) {
            Ok(value) if value.is_finite() => inputs.finish(value),
            Ok(value) => {
                tracing::warn!("{} formula for {} produced {}", param.short_name(), combatant.name, value);
                self.inner.evaluate(env, combatant, param, inputs)
            }
            Err(e) => {
                tracing::warn!("{} formula for {} failed: {}", param.short_name(), combatant.name, e);
                self.inner.evaluate(env, combatant, param, inputs)
            }
        }
    }
}

/// Routes the attack parameter of actors through the hand calculators
#[derive(Debug)]
pub struct HandPowerResolver<R> {
    inner: R,
}

impl<R: ParamResolver> HandPowerResolver<R> {
    pub fn new(inner: R) -> Self {
        HandPowerResolver { inner }
    }
}

impl<R: ParamResolver> ParamResolver for HandPowerResolver<R> {
    fn inputs(&self, env: &ParamEnv<'_>, combatant: &Combatant, param: ParamId) -> ParamInputs {
        let raw = self.inner.inputs(env, combatant, param);
        if param == ParamId::Attack && combatant.is_actor() {
            calculator::overall_inputs(env, combatant, raw)
        } else {
            raw
        }
    }

    fn evaluate(
        &self,
        env: &ParamEnv<'_>,
        combatant: &Combatant,
        param: ParamId,
        inputs: ParamInputs,
    ) -> f64 {
        self.inner.evaluate(env, combatant, param, inputs)
    }

    fn hand_power(&self, env: &ParamEnv<'_>, combatant: &Combatant, hand: Hand) -> f64 {
        // Hand inputs start from the unmodified attack inputs
        self.inner.hand_power(env, combatant, hand)
    }
}

/// The assembled resolver chain with its settings
#[derive(Debug)]
pub struct ParamPipeline {
    resolver: Box<dyn ParamResolver>,
    config: DualWieldConfig,
    bonus: Option<Box<dyn ConditionalBonus>>,
}

impl ParamPipeline {
    pub fn builder() -> ParamPipelineBuilder {
        ParamPipelineBuilder::default()
    }

    pub fn config(&self) -> &DualWieldConfig {
        &self.config
    }

    pub fn env(&self, battle: BattleContext) -> ParamEnv<'_> {
        ParamEnv {
            battle,
            config: &self.config,
            bonus: self.bonus.as_deref(),
        }
    }

    /// Final value of a parameter
    pub fn param(&self, combatant: &Combatant, param: ParamId, battle: BattleContext) -> f64 {
        self.resolver.resolve(&self.env(battle), combatant, param)
    }

    /// Attack of one hand
    pub fn hand_power(&self, combatant: &Combatant, hand: Hand, battle: BattleContext) -> f64 {
        let value = self.resolver.hand_power(&self.env(battle), combatant, hand);
        tracing::trace!("{} {:?} attack {}", combatant.name, hand, value);
        value
    }

    pub fn mainhand_power(&self, combatant: &Combatant, battle: BattleContext) -> f64 {
        self.hand_power(combatant, Hand::Main, battle)
    }

    pub fn offhand_power(&self, combatant: &Combatant, battle: BattleContext) -> f64 {
        self.hand_power(combatant, Hand::Off, battle)
    }

    /// Every readable stat of a combatant for formula evaluation
    pub fn snapshot(&self, combatant: &Combatant, battle: BattleContext) -> StatSnapshot {
        let env = self.env(battle);
        let mut params = [0.0; ParamId::COUNT];
        for param in ParamId::all() {
            params[param.index()] = self.resolver.resolve(&env, combatant, *param);
        }
        StatSnapshot {
            params,
            hp: combatant.hp,
            mp: combatant.mp,
            level: f64::from(combatant.level),
        }
    }
}

impl Default for ParamPipeline {
    fn default() -> Self {
        ParamPipeline::builder().build()
    }
}

/// Explicit composition of a [`ParamPipeline`]
#[derive(Debug)]
pub struct ParamPipelineBuilder {
    config: DualWieldConfig,
    formulas: HashMap<ParamId, Formula>,
    bonus: Option<Box<dyn ConditionalBonus>>,
    hand_power: bool,
}

impl Default for ParamPipelineBuilder {
    fn default() -> Self {
        ParamPipelineBuilder {
            config: DualWieldConfig::default(),
            formulas: HashMap::new(),
            bonus: None,
            hand_power: true,
        }
    }
}

impl ParamPipelineBuilder {
    pub fn config(mut self, config: DualWieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Replace the default formula of one parameter
    pub fn custom_formula(mut self, param: ParamId, formula: impl Into<Formula>) -> Self {
        self.formulas.insert(param, formula.into());
        self
    }

    /// Install the conditional equipment bonus source
    pub fn conditional_bonus(mut self, bonus: impl ConditionalBonus + 'static) -> Self {
        self.bonus = Some(Box::new(bonus));
        self
    }

    /// Leave the attack parameter to the lower stages
    pub fn without_hand_power(mut self) -> Self {
        self.hand_power = false;
        self
    }

    pub fn build(self) -> ParamPipeline {
        let mut resolver: Box<dyn ParamResolver> = Box::new(BaseParamResolver);
        if !self.formulas.is_empty() {
            resolver = Box::new(CustomFormulaResolver::new(resolver, self.formulas));
        }
        if self.hand_power {
            resolver = Box::new(HandPowerResolver::new(resolver));
        }
        tracing::debug!("parameter pipeline built: {:?}", resolver);
        ParamPipeline {
            resolver,
            config: self.config,
            bonus: self.bonus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{MAINHAND_SLOT, OFFHAND_SLOT};
    use crate::data::WeaponDef;

    fn dual_wielder() -> Combatant {
        let mut actor = Combatant::actor("Ninja")
            .with_dual_wield_slots()
            .with_base(ParamId::Attack, 40.0)
            .with_base(ParamId::Defense, 12.0);
        actor
            .change_equip(MAINHAND_SLOT, Some(WeaponDef::new(1, "Sword", 2).with_param(ParamId::Attack, 20.0).into()))
            .unwrap();
        actor
            .change_equip(OFFHAND_SLOT, Some(WeaponDef::new(2, "Dagger", 1).with_param(ParamId::Attack, 10.0).into()))
            .unwrap();
        actor
    }

    #[test]
    fn test_base_pipeline_includes_equipment() {
        let pipeline = ParamPipeline::builder().without_hand_power().build();
        let actor = dual_wielder();
        let atk = pipeline.param(&actor, ParamId::Attack, BattleContext::IN_BATTLE);
        assert!((atk - 70.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hand_power_overrides_only_attack() {
        let config = DualWieldConfig {
            dual_wield_modifier: 0.5,
            ..DualWieldConfig::default()
        };
        let pipeline = ParamPipeline::builder().config(config).build();
        let actor = dual_wielder();
        // 40 * 0.5 + 30
        let atk = pipeline.param(&actor, ParamId::Attack, BattleContext::IN_BATTLE);
        assert!((atk - 50.0).abs() < f64::EPSILON);
        let def = pipeline.param(&actor, ParamId::Defense, BattleContext::IN_BATTLE);
        assert!((def - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enemy_attack_untouched() {
        let config = DualWieldConfig {
            dual_wield_modifier: 0.5,
            ..DualWieldConfig::default()
        };
        let pipeline = ParamPipeline::builder().config(config).build();
        let enemy = Combatant::enemy("Goblin")
            .with_dual_wield_slots()
            .with_base(ParamId::Attack, 40.0);
        let atk = pipeline.param(&enemy, ParamId::Attack, BattleContext::IN_BATTLE);
        assert!((atk - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_custom_formula_is_wrapped() {
        let pipeline = ParamPipeline::builder()
            .custom_formula(ParamId::Attack, "(base + plus) * rate * buff_rate + flat + 5")
            .build();
        let mut actor = dual_wielder();
        actor.params.flat[ParamId::Attack.index()] = 3.0;

        // overall: 40 + 30 + 3 + 5
        let atk = pipeline.param(&actor, ParamId::Attack, BattleContext::IN_BATTLE);
        assert!((atk - 78.0).abs() < f64::EPSILON);
        // mainhand: 40 + (30 - 10) + 3 + 5
        let main = pipeline.mainhand_power(&actor, BattleContext::IN_BATTLE);
        assert!((main - 68.0).abs() < f64::EPSILON);
        // offhand: 30 + (30 - 20) + 3 + 5
        let off = pipeline.offhand_power(&actor, BattleContext::IN_BATTLE);
        assert!((off - 48.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_broken_custom_formula_falls_back() {
        let pipeline = ParamPipeline::builder()
            .custom_formula(ParamId::Defense, "base / 0")
            .build();
        let actor = dual_wielder();
        let def = pipeline.param(&actor, ParamId::Defense, BattleContext::IN_BATTLE);
        assert!((def - 12.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pipeline_agrees_with_calculator() {
        let pipeline = ParamPipeline::default();
        let actor = dual_wielder();
        let env = pipeline.env(BattleContext::IN_BATTLE);
        assert!(
            (pipeline.mainhand_power(&actor, BattleContext::IN_BATTLE) - calculator::mainhand_power(&env, &actor)).abs()
                < f64::EPSILON
        );
        assert!(
            (pipeline.offhand_power(&actor, BattleContext::IN_BATTLE) - calculator::offhand_power(&env, &actor)).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn test_snapshot() {
        let pipeline = ParamPipeline::default();
        let actor = dual_wielder().with_level(7);
        let snapshot = pipeline.snapshot(&actor, BattleContext::IN_BATTLE);
        assert!((snapshot.level - 7.0).abs() < f64::EPSILON);
        assert!((snapshot.params[ParamId::Attack.index()] - 70.0).abs() < f64::EPSILON);
    }
}
