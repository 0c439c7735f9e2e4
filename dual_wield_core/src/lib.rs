//! dual_wield_core - Dual-wield attack resolution for turn-based combat
//!
//! This library provides:
//! - Classification: weapon, armor and skill tags from note annotations
//! - Eligibility: whether a combatant currently strikes with both hands
//! - HandCycleState: which hand the current strike uses
//! - Power: per-hand attack values and the parameter pipeline
//! - Damage: formula evaluation with the right hand's attack
//! - Battle: action execution with scripted sequences

pub mod battle;
pub mod classify;
pub mod combatant;
pub mod config;
pub mod damage;
pub mod data;
pub mod eligibility;
pub mod formula;
pub mod hand;
pub mod power;
pub mod prelude;
pub mod sequence;
pub mod types;

// Re-export core types for convenience
pub use battle::{Action, ActionOutcome, Battle, BattleError, BattleEvent, CombatantId, StrikeResult};
pub use classify::{classify_armor, classify_skill, classify_weapon, ArmorTag, SkillTag, WeaponTag};
pub use combatant::{Combatant, EquipError, Equipment};
pub use config::{default_database, ConfigError, DualWieldConfig};
pub use damage::{resolve_damage, DamageRoll};
pub use data::{ArmorDef, Database, EquipItem, SkillDef, WeaponDef};
pub use eligibility::{BattleContext, DualWieldStatus};
pub use hand::{HandCycleState, HandPhase};
pub use power::{ParamPipeline, ParamResolver};
pub use sequence::{ActionSequence, SequenceStep};
pub use types::{CombatantKind, Hand, ParamId};
