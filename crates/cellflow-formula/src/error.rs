//! Formula error types
//!
//! [`FormulaError`] is raised while building an [`Expression`](crate::Expression)
//! and never afterwards. [`EvalError`] is not raised at all: evaluation
//! returns it inside [`FormulaValue::Error`](crate::FormulaValue::Error).

use cellflow_core::CellName;
use thiserror::Error;

/// Result type for formula construction
pub type FormulaResult<T> = std::result::Result<T, FormulaError>;

/// Grammar violations found while building an expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormulaError {
    /// Nothing but whitespace
    #[error("Formula contains no tokens")]
    Empty,

    /// A span that is not a parenthesis, operator, variable or number
    #[error("Invalid token '{token}' at position {position}")]
    InvalidToken { token: String, position: usize },

    /// A literal too large to represent as a finite number
    #[error("Numeric literal '{0}' is out of range")]
    LiteralOutOfRange(String),

    /// A `)` with no open `(` before it
    #[error("Closing parenthesis at position {position} has no matching opening parenthesis")]
    UnbalancedClose { position: usize },

    /// More `(` than `)` at the end of the formula
    #[error("{missing} opening parenthesis(es) never closed")]
    UnclosedParen { missing: usize },

    /// The first token is an operator or `)`
    #[error("Formula must start with a number, a variable, or '(' but starts with '{0}'")]
    InvalidStart(String),

    /// The last token is an operator or `(`
    #[error("Formula must end with a number, a variable, or ')' but ends with '{0}'")]
    InvalidEnd(String),

    /// An operator or `)` right after `(` or an operator
    #[error("Expected a number, a variable, or '(' after '{after}', found '{found}'")]
    ExpectedOperand { after: String, found: String },

    /// An operand or `(` right after an operand or `)`
    #[error("Expected an operator or ')' after '{after}', found '{found}'")]
    ExpectedOperator { after: String, found: String },
}

/// Why a [`Lookup`](crate::Lookup) could not produce a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// Nothing is bound to the name
    #[error("Value of variable {0} was not found")]
    Undefined(CellName),

    /// The name is bound, but not to a number
    #[error("Variable {0} does not hold a number")]
    NotNumeric(CellName),
}

/// Why an evaluation produced no number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// A division whose right operand evaluated to zero
    #[error("Division by zero")]
    DivisionByZero,

    /// A variable that could not be resolved
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// A token stream that does not follow the formula grammar
    #[error("Malformed token stream")]
    Malformed,
}

impl EvalError {
    /// Human readable reason, as carried by an error-valued cell
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
