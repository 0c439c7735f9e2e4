//! Damage and parameter formulas
//!
//! Formula text from the database is parsed once into an [`Expr`] tree.
//! Evaluation reads every value through [`Bindings`], so the caller decides
//! what each name means before the formula runs. The attacker's attack term
//! is resolved this way by the damage dispatcher.
//!
//! ## Examples
//!
//! ```
//! use dual_wield_core::formula::{Formula, Operand, Stat, Subject};
//! use dual_wield_core::types::ParamId;
//! use std::collections::HashMap;
//!
//! let formula = Formula::new("a.atk * 4 - b.def * 2");
//! let target_def = Operand::Stat {
//!     subject: Subject::Target,
//!     stat: Stat::Param(ParamId::Defense),
//! };
//! let table = HashMap::from([(Operand::USER_ATTACK, 30.0), (target_def, 10.0)]);
//! assert_eq!(formula.evaluate(&table), Ok(100.0));
//! ```

mod eval;
mod lexer;
mod parser;

pub use eval::{evaluate, Bindings, FormulaContext, StatSnapshot};
pub use parser::{parse, BinaryOp, Expr, MathFn, Operand, ParamInput, Stat, Subject, UnaryOp};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Formula parse or evaluation error
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("formula is empty")]
    Empty,
    #[error("unexpected character '{ch}' at {pos}")]
    UnexpectedChar { ch: char, pos: usize },
    #[error("invalid number literal '{0}'")]
    InvalidNumber(String),
    #[error("unexpected token {0}")]
    UnexpectedToken(String),
    #[error("unexpected end of formula")]
    UnexpectedEnd,
    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),
    #[error("{func} called with {got} arguments")]
    Arity { func: String, got: usize },
    #[error("operand {0:?} is not available")]
    MissingOperand(Operand),
    #[error("division by zero")]
    DivisionByZero,
}

/// Formula text together with its parsed form
///
/// Parsing never fails construction: an invalid formula keeps its error and
/// reports it on every evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Formula {
    source: String,
    compiled: Result<Expr, FormulaError>,
}

impl Formula {
    /// Parse formula text
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let compiled = parse(&source);
        Formula { source, compiled }
    }

    /// The original text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Parsed expression, if the text was valid
    pub fn expr(&self) -> Result<&Expr, &FormulaError> {
        self.compiled.as_ref()
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Whether the formula reads an operand
    pub fn references(&self, operand: Operand) -> bool {
        self.compiled
            .as_ref()
            .map(|e| e.references(operand))
            .unwrap_or(false)
    }

    /// Evaluate against a set of bindings
    pub fn evaluate(&self, bindings: &dyn Bindings) -> Result<f64, FormulaError> {
        match &self.compiled {
            Ok(expr) => evaluate(expr, bindings),
            Err(e) => Err(e.clone()),
        }
    }
}

impl Default for Formula {
    fn default() -> Self {
        Formula::new("0")
    }
}

impl From<String> for Formula {
    fn from(source: String) -> Self {
        Formula::new(source)
    }
}

impl From<&str> for Formula {
    fn from(source: &str) -> Self {
        Formula::new(source)
    }
}

impl From<Formula> for String {
    fn from(formula: Formula) -> Self {
        formula.source
    }
}
