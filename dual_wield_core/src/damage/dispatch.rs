//! Damage dispatch - evaluate a skill's formula with the right hand's attack

use super::variance::apply_variance;
use crate::classify::SkillTag;
use crate::combatant::Combatant;
use crate::data::SkillDef;
use crate::eligibility::{alternates_hands, is_effectively_dual_wielding, BattleContext};
use crate::formula::FormulaContext;
use crate::power::ParamPipeline;
use crate::types::{round_half_up, Hand, ParamId};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Where the attacker's attack term comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackTerm {
    /// Power of one hand
    Hand(Hand),
    /// The combatant's overall attack parameter
    Overall,
}

/// Read-only state a damage formula may depend on
#[derive(Debug, Clone, Copy)]
pub struct DamageContext<'a> {
    pub pipeline: &'a ParamPipeline,
    pub battle: BattleContext,
    pub variables: &'a HashMap<u32, f64>,
    pub switches: &'a HashSet<u32>,
}

/// Outcome of one damage evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DamageRoll {
    pub term: AttackTerm,
    /// Attack value fed to the formula
    pub attack: f64,
    /// Final damage; negative heals
    pub value: f64,
}

/// Pick the attack term for a skill
///
/// Hand-locked skills read their hand without touching the hand cycle, and
/// fall back to the overall attack unless the user is dual-wielding right
/// now (a two-handed mainhand or a shield in the offhand counts as not).
/// Dual-wield skills and the basic attack follow the cycle while the user
/// alternates hands. Anything else reads the mainhand for actors.
pub fn select_attack_term(skill: &SkillDef, user: &Combatant, ctx: &DamageContext<'_>) -> AttackTerm {
    let forced = |hand: Hand| {
        if is_effectively_dual_wielding(user, ctx.battle) {
            AttackTerm::Hand(hand)
        } else {
            AttackTerm::Overall
        }
    };
    let cycling = alternates_hands(user, ctx.battle, ctx.pipeline.config());

    match skill.tag {
        SkillTag::MainhandOnly => forced(Hand::Main),
        SkillTag::OffhandOnly => forced(Hand::Off),
        SkillTag::DualWield if cycling => AttackTerm::Hand(user.hand().strike_hand()),
        _ if skill.is_basic_attack() && cycling => AttackTerm::Hand(user.hand().strike_hand()),
        _ if user.is_actor() => AttackTerm::Hand(Hand::Main),
        _ => AttackTerm::Overall,
    }
}

/// Attack value of a term
pub fn attack_value(term: AttackTerm, user: &Combatant, ctx: &DamageContext<'_>) -> f64 {
    match term {
        AttackTerm::Hand(hand) if user.is_actor() => ctx.pipeline.hand_power(user, hand, ctx.battle),
        _ => ctx.pipeline.param(user, ParamId::Attack, ctx.battle),
    }
}

/// Evaluate a skill's damage against one target
///
/// Never fails: a formula that cannot be evaluated deals no damage.
pub fn resolve_damage(
    skill: &SkillDef,
    user: &Combatant,
    target: &Combatant,
    ctx: &DamageContext<'_>,
    rng: &mut impl Rng,
) -> DamageRoll {
    let term = select_attack_term(skill, user, ctx);
    let attack = attack_value(term, user, ctx);

    let formula_ctx = FormulaContext {
        user: ctx
            .pipeline
            .snapshot(user, ctx.battle)
            .with_param(ParamId::Attack, attack),
        target: ctx.pipeline.snapshot(target, ctx.battle),
        variables: ctx.variables,
        switches: ctx.switches,
    };

    let base = match skill.damage.formula.evaluate(&formula_ctx) {
        Ok(value) if value.is_nan() => {
            tracing::warn!("skill {} formula '{}' produced NaN", skill.id, skill.damage.formula.source());
            0.0
        }
        Ok(value) => value.max(0.0) * skill.damage.kind.sign(),
        Err(e) => {
            tracing::warn!("skill {} formula '{}' failed: {}", skill.id, skill.damage.formula.source(), e);
            0.0
        }
    };

    let value = round_half_up(apply_variance(base, skill.damage.variance, rng));
    tracing::trace!(
        "{} -> {}: skill {} {:?} attack {} damage {}",
        user.name,
        target.name,
        skill.id,
        term,
        attack,
        value
    );
    DamageRoll { term, attack, value }
}
