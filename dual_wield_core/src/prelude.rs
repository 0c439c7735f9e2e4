//! Prelude module for convenient imports
//!
//! ```rust
//! use dual_wield_core::prelude::*;
//! ```

// Core types
pub use crate::types::{CombatantKind, DamageKind, EquipType, Hand, ParamId};

// Definitions
pub use crate::data::{ArmorDef, Database, EquipItem, SkillDef, WeaponDef};

// Combatants
pub use crate::combatant::{Combatant, EquipError, MAINHAND_SLOT, OFFHAND_SLOT};
pub use crate::hand::{HandCycleState, HandPhase};

// Eligibility
pub use crate::eligibility::{is_effectively_dual_wielding, BattleContext, DualWieldStatus};

// Power and damage
pub use crate::damage::{AttackTerm, DamageRoll};
pub use crate::power::{ConditionalBonus, ParamPipeline};

// Battle
pub use crate::battle::{Action, ActionOutcome, Battle, BattleError, BattleEvent, CombatantId};

// Config
pub use crate::config::{default_database, DualWieldConfig};
