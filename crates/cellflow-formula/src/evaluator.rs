//! Formula evaluator
//!
//! Evaluates a validated token stream with an operand stack and an operator
//! stack. A pending `*` or `/` reduces as soon as its right operand is known;
//! a pending `+` or `-` waits for a precedence boundary (`)`, the end of the
//! formula, or another `+`/`-`). Both binary precedence levels associate to
//! the left.

use crate::error::{EvalError, LookupError};
use crate::token::{Operator, Token};
use cellflow_core::CellName;

/// Resolves variables to numbers during evaluation
///
/// Implementations must fail for names they cannot resolve instead of
/// substituting a default. Any `Fn(&CellName) -> Result<f64, LookupError>`
/// is a lookup.
pub trait Lookup {
    /// Resolve a normalized variable name
    fn lookup(&self, name: &CellName) -> Result<f64, LookupError>;
}

impl<F> Lookup for F
where
    F: Fn(&CellName) -> Result<f64, LookupError>,
{
    fn lookup(&self, name: &CellName) -> Result<f64, LookupError> {
        self(name)
    }
}

/// Outcome of an evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    Number(f64),
    Error(EvalError),
}

impl FormulaValue {
    /// The number, if evaluation succeeded
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) => Some(*n),
            FormulaValue::Error(_) => None,
        }
    }

    /// Check if this is an error
    pub fn is_error(&self) -> bool {
        matches!(self, FormulaValue::Error(_))
    }

    /// Get the error if this is one
    pub fn get_error(&self) -> Option<&EvalError> {
        match self {
            FormulaValue::Error(e) => Some(e),
            FormulaValue::Number(_) => None,
        }
    }
}

impl From<Result<f64, EvalError>> for FormulaValue {
    fn from(result: Result<f64, EvalError>) -> Self {
        match result {
            Ok(n) => FormulaValue::Number(n),
            Err(e) => FormulaValue::Error(e),
        }
    }
}

/// Evaluate a token stream
///
/// Streams from [`tokenize`](crate::tokenize) (usually through
/// [`Expression`](crate::Expression)) always evaluate to a number or a
/// division/lookup error. A hand-built stream that breaks the grammar
/// evaluates to [`EvalError::Malformed`].
pub fn evaluate<L: Lookup + ?Sized>(tokens: &[Token], lookup: &L) -> FormulaValue {
    run(tokens, lookup).into()
}

fn run<L: Lookup + ?Sized>(tokens: &[Token], lookup: &L) -> Result<f64, EvalError> {
    let mut machine = Machine::default();

    for token in tokens {
        match token {
            Token::Number(n) => machine.push_operand(*n)?,
            Token::Variable(name) => machine.push_operand(lookup.lookup(name)?)?,
            Token::Operator(op) if op.is_multiplicative() => {
                machine.operators.push(Pending::Operator(*op));
            }
            Token::Operator(op) => {
                machine.reduce_additive()?;
                machine.operators.push(Pending::Operator(*op));
            }
            Token::LeftParen => machine.operators.push(Pending::Open),
            Token::RightParen => {
                machine.reduce_additive()?;
                if machine.operators.pop() != Some(Pending::Open) {
                    return Err(EvalError::Malformed);
                }
                // The parenthesized value is the right operand of any `*` or `/` before it
                let value = machine.pop_operand()?;
                machine.push_operand(value)?;
            }
        }
    }

    machine.reduce_additive()?;
    let value = machine.pop_operand()?;
    if !machine.operators.is_empty() || !machine.operands.is_empty() {
        return Err(EvalError::Malformed);
    }
    Ok(value)
}

/// Entry on the operator stack
#[derive(Debug, Clone, Copy, PartialEq)]
enum Pending {
    Open,
    Operator(Operator),
}

#[derive(Debug, Default)]
struct Machine {
    operands: Vec<f64>,
    operators: Vec<Pending>,
}

impl Machine {
    /// Push a newly available operand, reducing a pending `*` or `/`
    fn push_operand(&mut self, value: f64) -> Result<(), EvalError> {
        match self.operators.last() {
            Some(&Pending::Operator(op)) if op.is_multiplicative() => {
                self.operators.pop();
                let left = self.pop_operand()?;
                self.operands.push(op.apply(left, value)?);
            }
            _ => self.operands.push(value),
        }
        Ok(())
    }

    /// Reduce a pending `+` or `-`, if one is on top
    fn reduce_additive(&mut self) -> Result<(), EvalError> {
        if let Some(&Pending::Operator(op)) = self.operators.last() {
            if !op.is_multiplicative() {
                self.operators.pop();
                let right = self.pop_operand()?;
                let left = self.pop_operand()?;
                self.operands.push(op.apply(left, right)?);
            }
        }
        Ok(())
    }

    fn pop_operand(&mut self) -> Result<f64, EvalError> {
        self.operands.pop().ok_or(EvalError::Malformed)
    }
}
