//! Action execution

use super::action::{Action, CombatantId};
use super::presentation::present_strike;
use super::result::{ActionOutcome, BattleEvent, StrikeResult};
use super::{Battle, BattleError};
use crate::classify::SkillTag;
use crate::damage::{resolve_damage, select_attack_term, AttackTerm, DamageContext, DamageRoll};
use crate::data::SkillDef;
use crate::eligibility::{alternates_hands, attack_times_add};
use crate::hand::HandCycleState;
use crate::sequence::{ActionSequence, SequenceStep};
use crate::types::{DamageKind, ParamId};
use rand::Rng;

/// Per-action bookkeeping
struct ActionRun<'a> {
    user: CombatantId,
    skill: &'a SkillDef,
    targets: &'a [CombatantId],
    outcome: ActionOutcome,
}

impl Battle {
    /// Run one action to completion
    ///
    /// Every combatant's hand cycle is reset afterwards, including when the
    /// action is rejected.
    pub fn execute_action(&mut self, action: &Action, rng: &mut impl Rng) -> Result<ActionOutcome, BattleError> {
        let result = self.run_action(action, rng);
        self.reset_hands();
        match &result {
            Ok(outcome) => tracing::debug!("{} skill {}: {}", action.user, action.skill_id, outcome.summary()),
            Err(e) => tracing::warn!("action by {} rejected: {}", action.user, e),
        }
        result
    }

    fn run_action(&mut self, action: &Action, rng: &mut impl Rng) -> Result<ActionOutcome, BattleError> {
        let skill = self
            .database
            .skill(action.skill_id)
            .cloned()
            .ok_or(BattleError::UnknownSkill(action.skill_id))?;
        let user = self
            .combatant(action.user)
            .ok_or(BattleError::UnknownCombatant(action.user))?;
        if !user.is_alive() {
            return Err(BattleError::CannotAct(action.user));
        }
        if let Some(missing) = action.targets.iter().find(|t| self.combatant(**t).is_none()) {
            return Err(BattleError::UnknownCombatant(*missing));
        }

        let mut run = ActionRun {
            user: action.user,
            skill: &skill,
            targets: &action.targets,
            outcome: ActionOutcome::new(action.user, skill.id),
        };

        for step in &skill.steps.setup {
            self.run_step(&mut run, step.clone(), None, rng);
        }

        if skill.has_sequence() {
            let mut sequence = ActionSequence::new(skill.steps.target.iter().cloned());
            while let Some(step) = sequence.next_step() {
                self.run_step(&mut run, step, Some(&mut sequence), rng);
            }
        } else {
            self.run_default(&mut run, rng);
            // Only injected hand steps remain in an unscripted target list
            for step in &skill.steps.target {
                self.run_step(&mut run, step.clone(), None, rng);
            }
        }

        for step in &skill.steps.finish {
            self.run_step(&mut run, step.clone(), None, rng);
        }
        Ok(run.outcome)
    }

    /// Strikes of a skill without a scripted sequence
    fn run_default(&mut self, run: &mut ActionRun<'_>, rng: &mut impl Rng) {
        let Some(user) = self.combatant(run.user) else {
            return;
        };
        let cycles = alternates_hands(user, self.context, self.config())
            && (run.skill.is_basic_attack() || run.skill.tag == SkillTag::DualWield);
        let repeats = if run.skill.is_basic_attack() {
            run.skill.repeats.max(1) + attack_times_add(user, self.context, self.config())
        } else {
            run.skill.repeats.max(1)
        };
        tracing::debug!("{} strikes {} times, cycling hands: {}", user.name, repeats, cycles);

        // Each target takes every repeat before the next target is struck
        for &target in run.targets {
            for _ in 0..repeats {
                if !self.combatant(target).map(|t| t.is_alive()).unwrap_or(false) {
                    run.outcome.events.push(BattleEvent::Skipped { target });
                    break;
                }
                if cycles {
                    self.update_hand(run.user, |hand| {
                        hand.begin_strike();
                    });
                }
                if let Some(user) = self.combatant(run.user) {
                    let presentation = present_strike(user, self.context, self.config(), &self.database);
                    run.outcome.events.push(BattleEvent::Motion {
                        user: run.user,
                        presentation,
                    });
                    run.outcome.events.push(BattleEvent::Animation {
                        user: run.user,
                        animation_id: presentation.animation_id,
                        targets: vec![target],
                    });
                }
                self.strike(run, target, rng);
                if cycles {
                    self.update_hand(run.user, HandCycleState::finish_strike);
                }
            }
        }
    }

    fn run_step(
        &mut self,
        run: &mut ActionRun<'_>,
        step: SequenceStep,
        sequence: Option<&mut ActionSequence>,
        rng: &mut impl Rng,
    ) {
        match step {
            SequenceStep::MotionAttack => {
                if let Some(user) = self.combatant(run.user) {
                    let presentation = present_strike(user, self.context, self.config(), &self.database);
                    run.outcome.events.push(BattleEvent::Motion {
                        user: run.user,
                        presentation,
                    });
                }
            }
            SequenceStep::AttackAnimation => {
                if let Some(user) = self.combatant(run.user) {
                    let presentation = present_strike(user, self.context, self.config(), &self.database);
                    let targets = run
                        .targets
                        .iter()
                        .copied()
                        .filter(|t| self.combatant(*t).map(|c| c.is_alive()).unwrap_or(false))
                        .collect();
                    run.outcome.events.push(BattleEvent::Animation {
                        user: run.user,
                        animation_id: presentation.animation_id,
                        targets,
                    });
                }
            }
            SequenceStep::ActionEffect => {
                for &target in run.targets {
                    self.strike(run, target, rng);
                }
            }
            SequenceStep::Wait { frames } => run.outcome.events.push(BattleEvent::Wait { frames }),
            SequenceStep::SwitchHand => self.change_hand(run, HandCycleState::switch),
            SequenceStep::SetHand { hand } => self.change_hand(run, |h| h.set(hand)),
            SequenceStep::LockHand { hand } => self.change_hand(run, |h| h.lock_to(hand)),
            SequenceStep::UnlockHand => self.change_hand(run, HandCycleState::unlock),
            SequenceStep::ResetHand => self.change_hand(run, HandCycleState::reset),
            SequenceStep::RepeatPerHand { steps } => {
                let enabled = self
                    .combatant(run.user)
                    .map(|u| alternates_hands(u, self.context, self.config()))
                    .unwrap_or(false);
                match sequence {
                    Some(sequence) => {
                        let duplicated = sequence.repeat_per_hand(steps, enabled);
                        run.outcome.events.push(BattleEvent::Repeated {
                            requested: steps,
                            duplicated,
                        });
                    }
                    None => tracing::debug!("repeat per hand outside a target sequence ignored"),
                }
            }
            SequenceStep::Custom { command } => run.outcome.events.push(BattleEvent::Custom { command }),
        }
    }

    fn update_hand(&mut self, id: CombatantId, update: impl FnOnce(&mut HandCycleState)) {
        if let Some(combatant) = self.combatant_mut(id) {
            update(combatant.hand_mut());
        }
    }

    fn change_hand(&mut self, run: &mut ActionRun<'_>, update: impl FnOnce(&mut HandCycleState)) {
        self.update_hand(run.user, update);
        if let Some(user) = self.combatant(run.user) {
            run.outcome.events.push(BattleEvent::HandChanged {
                user: run.user,
                phase: user.hand().phase(),
            });
        }
    }

    /// Apply the skill's damage to one target
    fn strike(&mut self, run: &mut ActionRun<'_>, target: CombatantId, rng: &mut impl Rng) {
        let (Some(user), Some(victim)) = (self.combatant(run.user), self.combatant(target)) else {
            return;
        };
        if !victim.is_alive() {
            run.outcome.events.push(BattleEvent::Skipped { target });
            return;
        }

        let ctx = DamageContext {
            pipeline: &self.pipeline,
            battle: self.context,
            variables: &self.variables,
            switches: &self.switches,
        };
        let kind = run.skill.damage.kind;
        let roll = if kind == DamageKind::None {
            DamageRoll {
                term: select_attack_term(run.skill, user, &ctx),
                attack: 0.0,
                value: 0.0,
            }
        } else {
            resolve_damage(run.skill, user, victim, &ctx, rng)
        };

        let (pool, limit) = if kind.is_mp() {
            (victim.mp, self.pipeline.param(victim, ParamId::MaxMp, self.context))
        } else {
            (victim.hp, self.pipeline.param(victim, ParamId::MaxHp, self.context))
        };
        let user_limit = if kind.is_mp() {
            self.pipeline.param(user, ParamId::MaxMp, self.context)
        } else {
            self.pipeline.param(user, ParamId::MaxHp, self.context)
        };
        let hp_before = victim.hp;
        let remaining = (pool - roll.value).clamp(0.0, limit);
        let drained = pool - remaining;

        if let Some(victim) = self.combatant_mut(target) {
            if kind.is_mp() {
                victim.mp = remaining;
            } else {
                victim.hp = remaining;
            }
        }
        if matches!(kind, DamageKind::HpDrain | DamageKind::MpDrain) && drained > 0.0 {
            if let Some(user) = self.combatant_mut(run.user) {
                if kind.is_mp() {
                    user.mp = (user.mp + drained).min(user_limit);
                } else {
                    user.hp = (user.hp + drained).min(user_limit);
                }
            }
        }

        let hp_after = self.combatant(target).map(|t| t.hp).unwrap_or(0.0);
        let hand = match roll.term {
            AttackTerm::Hand(hand) => Some(hand),
            AttackTerm::Overall => None,
        };
        run.outcome.events.push(BattleEvent::Strike(StrikeResult {
            user: run.user,
            target,
            hand,
            term: roll.term,
            attack: roll.attack,
            damage: roll.value,
            hp_before,
            hp_after,
            is_killing_blow: hp_before > 0.0 && hp_after <= 0.0,
        }));
    }
}
