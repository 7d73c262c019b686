//! Error types for sheet operations

use cellflow_core::CellName;
use cellflow_formula::FormulaError;
use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by [`Sheet`](crate::Sheet) operations
///
/// Evaluation problems are not errors here: they are stored as
/// [`CellValue::Error`](crate::CellValue::Error).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cell name that is not letters followed by digits
    #[error("Invalid cell name: '{0}'")]
    InvalidName(String),

    /// Formula text that does not follow the grammar
    #[error("Formula format error: {0}")]
    Formula(#[from] FormulaError),

    /// An edit that would make a cell depend on itself
    #[error("Circular reference detected involving cell {0}")]
    CircularReference(CellName),
}

impl From<cellflow_core::Error> for Error {
    fn from(err: cellflow_core::Error) -> Self {
        match err {
            cellflow_core::Error::InvalidName(name) => Error::InvalidName(name),
        }
    }
}
