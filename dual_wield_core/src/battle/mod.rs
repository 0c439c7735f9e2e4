//! Battle - combatants, shared state and action execution
//!
//! One action runs to completion before the next begins. When an action
//! ends, successfully or not, every combatant's hand cycle is reset.

mod action;
mod execute;
mod presentation;
mod result;

pub use action::{Action, CombatantId, Side};
pub use presentation::{present_strike, presented_hand};
pub use result::{ActionOutcome, BattleEvent, StrikePresentation, StrikeResult};

use crate::combatant::Combatant;
use crate::config::DualWieldConfig;
use crate::data::Database;
use crate::eligibility::{BattleContext, DualWieldStatus};
use crate::hand::{is_second_attack, is_second_skill_hit};
use crate::power::ParamPipeline;
use crate::types::{Hand, SkillId};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Action rejected before it could run
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BattleError {
    #[error("unknown skill {0}")]
    UnknownSkill(SkillId),
    #[error("unknown combatant {0}")]
    UnknownCombatant(CombatantId),
    #[error("{0} cannot act")]
    CannotAct(CombatantId),
}

/// A party facing a troop
#[derive(Debug)]
pub struct Battle {
    party: Vec<Combatant>,
    troop: Vec<Combatant>,
    database: Database,
    pipeline: ParamPipeline,
    context: BattleContext,
    /// Game variables readable as `v[n]`
    pub variables: HashMap<u32, f64>,
    /// Game switches readable as `s[n]`
    pub switches: HashSet<u32>,
}

impl Battle {
    pub fn new(database: Database, pipeline: ParamPipeline) -> Self {
        Battle {
            party: Vec::new(),
            troop: Vec::new(),
            database,
            pipeline,
            context: BattleContext::FIELD,
            variables: HashMap::new(),
            switches: HashSet::new(),
        }
    }

    pub fn add_actor(&mut self, actor: Combatant) -> CombatantId {
        self.party.push(actor);
        CombatantId::party(self.party.len() - 1)
    }

    pub fn add_enemy(&mut self, enemy: Combatant) -> CombatantId {
        self.troop.push(enemy);
        CombatantId::troop(self.troop.len() - 1)
    }

    /// Enter battle mode
    pub fn start(&mut self) {
        self.context = BattleContext::IN_BATTLE;
        self.reset_hands();
        tracing::debug!("battle started: {} vs {}", self.party.len(), self.troop.len());
    }

    /// Leave battle mode
    pub fn end(&mut self) {
        self.context = BattleContext::FIELD;
        self.reset_hands();
        tracing::debug!("battle ended");
    }

    pub fn context(&self) -> BattleContext {
        self.context
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn pipeline(&self) -> &ParamPipeline {
        &self.pipeline
    }

    pub fn config(&self) -> &DualWieldConfig {
        self.pipeline.config()
    }

    pub fn party(&self) -> &[Combatant] {
        &self.party
    }

    pub fn troop(&self) -> &[Combatant] {
        &self.troop
    }

    pub fn combatant(&self, id: CombatantId) -> Option<&Combatant> {
        match id.side {
            Side::Party => self.party.get(id.index),
            Side::Troop => self.troop.get(id.index),
        }
    }

    pub fn combatant_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        match id.side {
            Side::Party => self.party.get_mut(id.index),
            Side::Troop => self.troop.get_mut(id.index),
        }
    }

    /// Every eligibility answer for a combatant in the current mode
    pub fn status(&self, id: CombatantId) -> Option<DualWieldStatus> {
        self.combatant(id)
            .map(|c| DualWieldStatus::evaluate(c, self.context, self.config()))
    }

    pub fn is_second_attack(&self, id: CombatantId) -> bool {
        self.combatant(id)
            .map(|c| is_second_attack(c.kind, c.hand()))
            .unwrap_or(false)
    }

    pub fn is_second_skill_hit(&self, id: CombatantId) -> bool {
        self.combatant(id)
            .map(|c| is_second_skill_hit(c.kind, c.hand()))
            .unwrap_or(false)
    }

    /// Attack of one hand, for equipment comparison screens
    pub fn hand_power(&self, id: CombatantId, hand: Hand) -> Option<f64> {
        self.combatant(id)
            .map(|c| self.pipeline.hand_power(c, hand, self.context))
    }

    /// Clear the hand cycle of every combatant on both sides
    pub fn reset_hands(&mut self) {
        for combatant in self.party.iter_mut().chain(self.troop.iter_mut()) {
            combatant.hand_mut().reset();
        }
    }
}
