//! Formula tokens

use crate::error::EvalError;
use cellflow_core::CellName;
use std::fmt;

/// Binary arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Map a character to its operator
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// The operator's symbol
    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// `*` and `/`, which bind tighter than `+` and `-`
    pub fn is_multiplicative(self) -> bool {
        matches!(self, Operator::Multiply | Operator::Divide)
    }

    /// Apply the operator; only division can fail
    pub fn apply(self, left: f64, right: f64) -> Result<f64, EvalError> {
        match self {
            Operator::Add => Ok(left + right),
            Operator::Subtract => Ok(left - right),
            Operator::Multiply => Ok(left * right),
            Operator::Divide if right == 0.0 => Err(EvalError::DivisionByZero),
            Operator::Divide => Ok(left / right),
        }
    }
}

/// A single formula token in canonical form
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LeftParen,
    RightParen,
    Operator(Operator),
    /// Cell name, already uppercased
    Variable(CellName),
    /// Non-negative literal
    Number(f64),
}

impl Token {
    /// Numbers and variables
    pub fn is_operand(&self) -> bool {
        matches!(self, Token::Number(_) | Token::Variable(_))
    }

    /// Whether this token may follow `(` or an operator
    pub(crate) fn starts_operand(&self) -> bool {
        self.is_operand() || matches!(self, Token::LeftParen)
    }

    /// Whether this token may follow an operand or `)`
    pub(crate) fn continues_operand(&self) -> bool {
        matches!(self, Token::Operator(_) | Token::RightParen)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::LeftParen => f.write_str("("),
            Token::RightParen => f.write_str(")"),
            Token::Operator(op) => write!(f, "{}", op.symbol()),
            Token::Variable(name) => write!(f, "{name}"),
            Token::Number(n) => write!(f, "{n}"),
        }
    }
}
