//! Formula evaluation against an explicit read-only context

use super::parser::{BinaryOp, Expr, MathFn, Operand, Stat, Subject, UnaryOp};
use super::FormulaError;
use crate::types::{round_half_up, ParamArray, ParamId};
use std::collections::{HashMap, HashSet};

/// Source of operand values for evaluation
pub trait Bindings {
    /// Value of an operand, `None` if the context cannot provide it
    fn operand(&self, operand: Operand) -> Option<f64>;
}

/// Frozen view of one combatant's readable stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatSnapshot {
    pub params: ParamArray,
    pub hp: f64,
    pub mp: f64,
    pub level: f64,
}

impl StatSnapshot {
    pub fn get(&self, stat: Stat) -> f64 {
        match stat {
            Stat::Param(param) => self.params[param.index()],
            Stat::Hp => self.hp,
            Stat::Mp => self.mp,
            Stat::Level => self.level,
        }
    }

    /// Replace one parameter value
    pub fn with_param(mut self, param: ParamId, value: f64) -> Self {
        self.params[param.index()] = value;
        self
    }
}

/// Everything a damage formula may reference
#[derive(Debug, Clone, Copy)]
pub struct FormulaContext<'a> {
    pub user: StatSnapshot,
    pub target: StatSnapshot,
    pub variables: &'a HashMap<u32, f64>,
    pub switches: &'a HashSet<u32>,
}

impl Bindings for FormulaContext<'_> {
    fn operand(&self, operand: Operand) -> Option<f64> {
        match operand {
            Operand::Stat { subject: Subject::User, stat } => Some(self.user.get(stat)),
            Operand::Stat { subject: Subject::Target, stat } => Some(self.target.get(stat)),
            // Unset variables read as zero
            Operand::Variable(id) => Some(self.variables.get(&id).copied().unwrap_or(0.0)),
            Operand::Switch(id) => Some(if self.switches.contains(&id) { 1.0 } else { 0.0 }),
            Operand::Input(_) => None,
        }
    }
}

/// A plain name-to-value table, mostly for parameter formulas and tests
impl Bindings for HashMap<Operand, f64> {
    fn operand(&self, operand: Operand) -> Option<f64> {
        self.get(&operand).copied()
    }
}

fn truthy(value: f64) -> bool {
    value != 0.0 && !value.is_nan()
}

fn flag(value: bool) -> f64 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Evaluate an expression
pub fn evaluate(expr: &Expr, bindings: &dyn Bindings) -> Result<f64, FormulaError> {
    match expr {
        Expr::Number(value) => Ok(*value),
        Expr::Operand(operand) => bindings
            .operand(*operand)
            .ok_or(FormulaError::MissingOperand(*operand)),
        Expr::Unary { op, expr } => {
            let value = evaluate(expr, bindings)?;
            Ok(match op {
                UnaryOp::Neg => -value,
                UnaryOp::Not => flag(!truthy(value)),
            })
        }
        Expr::Binary { op, lhs, rhs } => {
            let l = evaluate(lhs, bindings)?;
            // Short-circuit like the engine's scripting language
            match op {
                BinaryOp::And if !truthy(l) => return Ok(l),
                BinaryOp::Or if truthy(l) => return Ok(l),
                _ => {}
            }
            let r = evaluate(rhs, bindings)?;
            match op {
                BinaryOp::Add => Ok(l + r),
                BinaryOp::Sub => Ok(l - r),
                BinaryOp::Mul => Ok(l * r),
                BinaryOp::Div | BinaryOp::Rem if r == 0.0 => Err(FormulaError::DivisionByZero),
                BinaryOp::Div => Ok(l / r),
                BinaryOp::Rem => Ok(l % r),
                BinaryOp::Lt => Ok(flag(l < r)),
                BinaryOp::Le => Ok(flag(l <= r)),
                BinaryOp::Gt => Ok(flag(l > r)),
                BinaryOp::Ge => Ok(flag(l >= r)),
                BinaryOp::Eq => Ok(flag(l == r)),
                BinaryOp::NotEq => Ok(flag(l != r)),
                BinaryOp::And | BinaryOp::Or => Ok(r),
            }
        }
        Expr::Conditional {
            cond,
            then,
            otherwise,
        } => {
            if truthy(evaluate(cond, bindings)?) {
                evaluate(then, bindings)
            } else {
                evaluate(otherwise, bindings)
            }
        }
        Expr::Call { func, args } => {
            let values = args
                .iter()
                .map(|a| evaluate(a, bindings))
                .collect::<Result<Vec<_>, _>>()?;
            // Calls built by hand skip the parser's arity check
            let first = values.first().copied().ok_or_else(|| FormulaError::Arity {
                func: func.name().to_string(),
                got: 0,
            })?;
            Ok(match func {
                MathFn::Max => values.iter().copied().fold(first, f64::max),
                MathFn::Min => values.iter().copied().fold(first, f64::min),
                MathFn::Floor => first.floor(),
                MathFn::Ceil => first.ceil(),
                MathFn::Round => round_half_up(first),
                MathFn::Abs => first.abs(),
            })
        }
    }
}
