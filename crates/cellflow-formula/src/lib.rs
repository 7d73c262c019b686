//! # cellflow-formula
//!
//! Expression engine and dependency bookkeeping for cellflow.
//!
//! This crate provides:
//! - Tokenizing and validating infix arithmetic (`+ - * /`, parentheses,
//!   non-negative literals, cell-name variables)
//! - [`Expression`], the canonical, immutable form of a validated formula
//! - Evaluation against a [`Lookup`] that never fails outward: problems become
//!   [`FormulaValue::Error`]
//! - [`DependencyRegistry`], the producer/consumer relation between cells
//!
//! ## Example
//!
//! ```rust
//! use cellflow_formula::{Expression, FormulaValue, LookupError};
//! use cellflow_core::CellName;
//!
//! let expr = Expression::parse("a1 * (2 + 3)").unwrap();
//! assert_eq!(expr.as_str(), "A1*(2+3)");
//!
//! let value = expr.evaluate(&|_: &CellName| Ok::<f64, LookupError>(4.0));
//! assert_eq!(value, FormulaValue::Number(20.0));
//! ```

pub mod dependency;
pub mod error;
pub mod evaluator;
pub mod expression;
pub mod parser;
pub mod token;

pub use dependency::{DependencyRegistry, NodeId};
pub use error::{EvalError, FormulaError, FormulaResult, LookupError};
pub use evaluator::{evaluate, FormulaValue, Lookup};
pub use expression::Expression;
pub use parser::tokenize;
pub use token::{Operator, Token};
