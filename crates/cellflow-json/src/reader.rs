//! JSON reader

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::document::SheetDocument;
use crate::error::{JsonError, JsonResult};
use cellflow::{CellName, Sheet};
use std::collections::BTreeSet;
use tracing::debug;

/// JSON sheet reader
pub struct JsonReader;

impl JsonReader {
    /// Read a sheet from a JSON file
    pub fn read_file<P: AsRef<Path>>(path: P) -> JsonResult<Sheet> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let sheet = Self::read(BufReader::new(file))?;
        debug!(path = %path.display(), cells = sheet.len(), "loaded sheet");
        Ok(sheet)
    }

    /// Read a sheet from a reader
    ///
    /// Every stored string form goes through [`Sheet::set_content`], so the
    /// result does not depend on entry order. Two entries for the same cell
    /// (including names that differ only in case) fail the load with
    /// [`JsonError::DuplicateCell`], as does any entry the sheet rejects (a
    /// bad name, a malformed formula, a circular reference). The returned
    /// sheet is marked as unchanged.
    pub fn read<R: Read>(reader: R) -> JsonResult<Sheet> {
        let document: SheetDocument = serde_json::from_reader(reader)?;

        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(document.cells.0.len());
        for (name, entry) in document.cells.0 {
            let name = CellName::parse(&name).map_err(cellflow::Error::from)?;
            if !seen.insert(name.clone()) {
                return Err(JsonError::DuplicateCell(name));
            }
            entries.push((name, entry));
        }

        let mut sheet = Sheet::new();
        for (name, entry) in &entries {
            sheet.set_content(name.as_str(), &entry.string_form)?;
        }
        sheet.mark_saved();

        Ok(sheet)
    }
}
