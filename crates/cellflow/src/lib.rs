//! # cellflow
//!
//! An incremental evaluation engine for named, formula-capable cells.
//!
//! Cells are named like `A1` or `AB12`. A cell holds a number, text, or a
//! formula over `+ - * /`, parentheses, numbers and other cells. Changing a
//! cell refreshes every cell that depends on it, in dependency order, and an
//! edit that would make a cell depend on itself is rejected without changing
//! anything.
//!
//! ## Features
//!
//! - Bidirectional dependency tracking ([`DependencyRegistry`])
//! - Validated, canonical formula expressions ([`Expression`])
//! - Evaluation errors as values instead of failures ([`CellValue::Error`])
//! - All-or-nothing edits with cycle detection ([`Sheet::set_content`])
//!
//! ## Example
//!
//! ```rust
//! use cellflow::prelude::*;
//!
//! let mut sheet = Sheet::new();
//! sheet.set_content("A1", "5").unwrap();
//! sheet.set_content("B1", "=a1 * 2").unwrap();
//!
//! assert_eq!(sheet.value("B1").unwrap().as_number(), Some(10.0));
//! assert_eq!(sheet.string_form("B1").unwrap(), "=A1*2");
//!
//! // B1 already reads A1, so A1 may not read B1
//! assert!(sheet.set_content("A1", "=B1").is_err());
//! ```

pub mod cell;
pub mod error;
pub mod prelude;
pub mod sheet;

pub use cell::{Cell, CellContent, CellValue};
pub use error::{Error, Result};
pub use sheet::Sheet;

// Re-export core types
pub use cellflow_core::{is_valid_name, normalize_name, CellName};

// Re-export formula types
pub use cellflow_formula::{
    tokenize, DependencyRegistry, EvalError, Expression, FormulaError, FormulaResult,
    FormulaValue, Lookup, LookupError, NodeId, Operator, Token,
};
