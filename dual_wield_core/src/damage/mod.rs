//! Damage system - hand-aware formula dispatch and variance

mod dispatch;
mod variance;

pub use dispatch::{attack_value, resolve_damage, select_attack_term, AttackTerm, DamageContext, DamageRoll};
pub use variance::apply_variance;
