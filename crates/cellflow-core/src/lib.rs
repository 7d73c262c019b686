//! # cellflow-core
//!
//! Core types shared by every cellflow crate:
//! - [`CellName`] - a validated, normalized cell name such as `A1` or `xy42`
//! - [`normalize_name`] - the one place where case folding of names happens
//! - [`Error`] - naming errors
//!
//! ## Example
//!
//! ```rust
//! use cellflow_core::CellName;
//!
//! let name = CellName::parse("ab12").unwrap();
//! assert_eq!(name.as_str(), "AB12");
//! assert!(CellName::parse("12ab").is_err());
//! ```

pub mod error;
pub mod name;

pub use error::{Error, Result};
pub use name::{is_valid_name, normalize_name, CellName};
