//! Error types for cellflow-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in cellflow-core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A cell name that is not letters followed by digits
    #[error("Invalid cell name: '{0}'")]
    InvalidName(String),
}
