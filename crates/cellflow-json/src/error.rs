//! JSON error types

use cellflow::CellName;
use thiserror::Error;

/// Result type for JSON operations
pub type JsonResult<T> = std::result::Result<T, JsonError>;

/// Errors that can occur while saving or loading a sheet
#[derive(Debug, Error)]
pub enum JsonError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed document
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two entries that name the same cell, possibly in different case
    #[error("Cell {0} appears more than once")]
    DuplicateCell(CellName),

    /// A stored cell the sheet refused
    #[error("Sheet error: {0}")]
    Sheet(#[from] cellflow::Error),
}
