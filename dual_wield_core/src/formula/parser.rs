//! Recursive-descent parser producing the formula AST

use super::lexer::{tokenize, Token};
use super::FormulaError;
use crate::types::ParamId;

/// Which side of the action an operand reads from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subject {
    /// `a`, `user`, `subject`
    User,
    /// `b`, `target`
    Target,
}

/// A readable property of a combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stat {
    Param(ParamId),
    Hp,
    Mp,
    Level,
}

/// A named value the formula reads from its context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operand {
    Stat { subject: Subject, stat: Stat },
    /// `v[n]`
    Variable(u32),
    /// `s[n]`, 1 when on
    Switch(u32),
    /// Bare input name of a parameter formula (`base`, `plus`, ...)
    Input(ParamInput),
}

/// Inputs readable by a custom parameter formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamInput {
    Base,
    Plus,
    Rate,
    BuffRate,
    Flat,
    Min,
    Max,
}

impl ParamInput {
    pub fn from_name(name: &str) -> Option<ParamInput> {
        match name {
            "base" => Some(ParamInput::Base),
            "plus" => Some(ParamInput::Plus),
            "rate" => Some(ParamInput::Rate),
            "buff_rate" => Some(ParamInput::BuffRate),
            "flat" => Some(ParamInput::Flat),
            "min" => Some(ParamInput::Min),
            "max" => Some(ParamInput::Max),
            _ => None,
        }
    }
}

impl Operand {
    /// The attacker's attack parameter, resolved through the hand calculators
    pub const USER_ATTACK: Operand = Operand::Stat {
        subject: Subject::User,
        stat: Stat::Param(ParamId::Attack),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    NotEq,
    And,
    Or,
}

/// Supported `Math.*` functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathFn {
    Max,
    Min,
    Floor,
    Ceil,
    Round,
    Abs,
}

impl MathFn {
    pub fn name(self) -> &'static str {
        match self {
            MathFn::Max => "max",
            MathFn::Min => "min",
            MathFn::Floor => "floor",
            MathFn::Ceil => "ceil",
            MathFn::Round => "round",
            MathFn::Abs => "abs",
        }
    }
}

/// Parsed formula expression
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Operand(Operand),
    Unary {
        op: UnaryOp,
        expr: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Conditional {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    Call {
        func: MathFn,
        args: Vec<Expr>,
    },
}

impl Expr {
    /// Check if the expression reads an operand anywhere
    pub fn references(&self, operand: Operand) -> bool {
        match self {
            Expr::Number(_) => false,
            Expr::Operand(op) => *op == operand,
            Expr::Unary { expr, .. } => expr.references(operand),
            Expr::Binary { lhs, rhs, .. } => lhs.references(operand) || rhs.references(operand),
            Expr::Conditional {
                cond,
                then,
                otherwise,
            } => {
                cond.references(operand) || then.references(operand) || otherwise.references(operand)
            }
            Expr::Call { args, .. } => args.iter().any(|a| a.references(operand)),
        }
    }
}

/// Parse formula text into an expression
pub fn parse(source: &str) -> Result<Expr, FormulaError> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(FormulaError::Empty);
    }
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.conditional()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(FormulaError::UnexpectedToken(format!("{:?}", token))),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), FormulaError> {
        match self.advance() {
            Some(ref token) if *token == expected => Ok(()),
            Some(token) => Err(FormulaError::UnexpectedToken(format!("{:?}", token))),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn conditional(&mut self) -> Result<Expr, FormulaError> {
        let cond = self.logical_or()?;
        if self.eat(&Token::Question) {
            let then = self.conditional()?;
            self.expect(Token::Colon)?;
            let otherwise = self.conditional()?;
            return Ok(Expr::Conditional {
                cond: Box::new(cond),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }
        Ok(cond)
    }

    fn binary_level(
        &mut self,
        next: fn(&mut Self) -> Result<Expr, FormulaError>,
        ops: &[(Token, BinaryOp)],
    ) -> Result<Expr, FormulaError> {
        let mut lhs = next(self)?;
        'outer: loop {
            for (token, op) in ops {
                if self.eat(token) {
                    let rhs = next(self)?;
                    lhs = Expr::Binary {
                        op: *op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    };
                    continue 'outer;
                }
            }
            return Ok(lhs);
        }
    }

    fn logical_or(&mut self) -> Result<Expr, FormulaError> {
        self.binary_level(Self::logical_and, &[(Token::Or, BinaryOp::Or)])
    }

    fn logical_and(&mut self) -> Result<Expr, FormulaError> {
        self.binary_level(Self::equality, &[(Token::And, BinaryOp::And)])
    }

    fn equality(&mut self) -> Result<Expr, FormulaError> {
        self.binary_level(
            Self::comparison,
            &[(Token::Eq, BinaryOp::Eq), (Token::NotEq, BinaryOp::NotEq)],
        )
    }

    fn comparison(&mut self) -> Result<Expr, FormulaError> {
        self.binary_level(
            Self::additive,
            &[
                (Token::Le, BinaryOp::Le),
                (Token::Ge, BinaryOp::Ge),
                (Token::Lt, BinaryOp::Lt),
                (Token::Gt, BinaryOp::Gt),
            ],
        )
    }

    fn additive(&mut self) -> Result<Expr, FormulaError> {
        self.binary_level(
            Self::multiplicative,
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
        )
    }

    fn multiplicative(&mut self) -> Result<Expr, FormulaError> {
        self.binary_level(
            Self::unary,
            &[
                (Token::Star, BinaryOp::Mul),
                (Token::Slash, BinaryOp::Div),
                (Token::Percent, BinaryOp::Rem),
            ],
        )
    }

    fn unary(&mut self) -> Result<Expr, FormulaError> {
        if self.eat(&Token::Minus) {
            let expr = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Neg,
                expr: Box::new(expr),
            });
        }
        if self.eat(&Token::Not) {
            let expr = self.unary()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                expr: Box::new(expr),
            });
        }
        if self.eat(&Token::Plus) {
            return self.unary();
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, FormulaError> {
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Number(value)),
            Some(Token::LParen) => {
                let expr = self.conditional()?;
                self.expect(Token::RParen)?;
                Ok(expr)
            }
            Some(Token::Ident(name)) => self.identifier(&name),
            Some(token) => Err(FormulaError::UnexpectedToken(format!("{:?}", token))),
            None => Err(FormulaError::UnexpectedEnd),
        }
    }

    fn identifier(&mut self, name: &str) -> Result<Expr, FormulaError> {
        match name {
            "a" | "user" | "subject" => self.member(Subject::User),
            "b" | "target" => self.member(Subject::Target),
            "v" => Ok(Expr::Operand(Operand::Variable(self.index()?))),
            "s" => Ok(Expr::Operand(Operand::Switch(self.index()?))),
            "Math" => self.math_call(),
            "true" => Ok(Expr::Number(1.0)),
            "false" => Ok(Expr::Number(0.0)),
            other => ParamInput::from_name(other)
                .map(|input| Expr::Operand(Operand::Input(input)))
                .ok_or_else(|| FormulaError::UnknownIdentifier(other.to_string())),
        }
    }

    fn member(&mut self, subject: Subject) -> Result<Expr, FormulaError> {
        self.expect(Token::Dot)?;
        let name = match self.advance() {
            Some(Token::Ident(name)) => name,
            Some(token) => return Err(FormulaError::UnexpectedToken(format!("{:?}", token))),
            None => return Err(FormulaError::UnexpectedEnd),
        };
        let stat = match name.as_str() {
            "hp" => Stat::Hp,
            "mp" => Stat::Mp,
            "level" => Stat::Level,
            other => Stat::Param(
                ParamId::from_short_name(other)
                    .ok_or_else(|| FormulaError::UnknownIdentifier(other.to_string()))?,
            ),
        };
        Ok(Expr::Operand(Operand::Stat { subject, stat }))
    }

    fn index(&mut self) -> Result<u32, FormulaError> {
        self.expect(Token::LBracket)?;
        let index = match self.advance() {
            Some(Token::Number(value)) if value >= 0.0 && value.fract() == 0.0 => value as u32,
            Some(token) => return Err(FormulaError::UnexpectedToken(format!("{:?}", token))),
            None => return Err(FormulaError::UnexpectedEnd),
        };
        self.expect(Token::RBracket)?;
        Ok(index)
    }

    fn math_call(&mut self) -> Result<Expr, FormulaError> {
        self.expect(Token::Dot)?;
        let name = match self.advance() {
            Some(Token::Ident(name)) => name,
            Some(token) => return Err(FormulaError::UnexpectedToken(format!("{:?}", token))),
            None => return Err(FormulaError::UnexpectedEnd),
        };
        let func = match name.as_str() {
            "max" => MathFn::Max,
            "min" => MathFn::Min,
            "floor" => MathFn::Floor,
            "ceil" => MathFn::Ceil,
            "round" => MathFn::Round,
            "abs" => MathFn::Abs,
            other => return Err(FormulaError::UnknownIdentifier(format!("Math.{}", other))),
        };

        self.expect(Token::LParen)?;
        let mut args = Vec::new();
        if !self.eat(&Token::RParen) {
            loop {
                args.push(self.conditional()?);
                if self.eat(&Token::Comma) {
                    continue;
                }
                self.expect(Token::RParen)?;
                break;
            }
        }

        let arity_ok = match func {
            MathFn::Max | MathFn::Min => !args.is_empty(),
            _ => args.len() == 1,
        };
        if !arity_ok {
            return Err(FormulaError::Arity {
                func: name,
                got: args.len(),
            });
        }
        Ok(Expr::Call { func, args })
    }
}
