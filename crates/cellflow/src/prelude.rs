//! Prelude module - common imports for cellflow users
//!
//! ```rust
//! use cellflow::prelude::*;
//! ```

pub use crate::{
    // Cell types
    Cell,
    CellContent,
    CellName,
    CellValue,

    // Error types
    Error,
    EvalError,
    FormulaError,
    LookupError,
    Result,

    // Main types
    Expression,
    Sheet,
};
