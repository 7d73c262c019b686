//! Canonical formula expressions

use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::{self, FormulaValue, Lookup};
use crate::parser::tokenize;
use crate::token::Token;
use cellflow_core::CellName;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// A validated arithmetic expression
///
/// Built once from formula text (without the leading `=`). The canonical
/// string renders literals with default number formatting, uppercases
/// variables and drops whitespace, so `a1 + 5.000` and `A1+5` are the same
/// expression. Equality and hashing use the canonical string.
#[derive(Debug, Clone)]
pub struct Expression {
    tokens: Vec<Token>,
    canonical: String,
    variables: BTreeSet<CellName>,
}

impl Expression {
    /// Parse and validate formula text
    ///
    /// # Example
    /// ```rust
    /// use cellflow_formula::Expression;
    ///
    /// let expr = Expression::parse("5 + 6e5 + 7e-4 - 5.000").unwrap();
    /// assert_eq!(expr.as_str(), "5+600000+0.0007-5");
    /// ```
    pub fn parse(formula: &str) -> FormulaResult<Self> {
        let tokens = tokenize(formula)?;
        let canonical = tokens.iter().map(ToString::to_string).collect();
        let variables = tokens
            .iter()
            .filter_map(|token| match token {
                Token::Variable(name) => Some(name.clone()),
                _ => None,
            })
            .collect();

        Ok(Self {
            tokens,
            canonical,
            variables,
        })
    }

    /// The canonical token stream
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Distinct variables referenced by the expression
    pub fn variables(&self) -> &BTreeSet<CellName> {
        &self.variables
    }

    /// The canonical string
    pub fn as_str(&self) -> &str {
        &self.canonical
    }

    /// Evaluate against a lookup; never fails outward
    pub fn evaluate<L: Lookup + ?Sized>(&self, lookup: &L) -> FormulaValue {
        evaluator::evaluate(&self.tokens, lookup)
    }
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for Expression {}

impl Hash for Expression {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical)
    }
}

impl FromStr for Expression {
    type Err = FormulaError;

    fn from_str(s: &str) -> FormulaResult<Self> {
        Self::parse(s)
    }
}
