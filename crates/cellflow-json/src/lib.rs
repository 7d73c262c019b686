//! # cellflow-json
//!
//! JSON save and load for cellflow sheets.
//!
//! A sheet is stored as the string form of each non-empty cell:
//!
//! ```json
//! {"Cells": {"A1": {"StringForm": "5"}, "B1": {"StringForm": "=A1+2"}}}
//! ```
//!
//! Loading replays every entry through [`Sheet::set_content`](cellflow::Sheet::set_content),
//! so a loaded sheet obeys the same rules as one built by hand.

mod document;
mod error;
mod options;
mod reader;
mod writer;

pub use error::{JsonError, JsonResult};
pub use options::JsonWriteOptions;
pub use reader::JsonReader;
pub use writer::JsonWriter;
