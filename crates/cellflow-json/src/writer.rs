//! JSON writer

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::document::{CellEntries, CellEntry, SheetDocument};
use crate::error::JsonResult;
use crate::options::JsonWriteOptions;
use cellflow::Sheet;
use tracing::debug;

/// JSON sheet writer
pub struct JsonWriter;

impl JsonWriter {
    /// Write a sheet to a JSON file and mark it as saved
    pub fn write_file<P: AsRef<Path>>(
        sheet: &mut Sheet,
        path: P,
        options: &JsonWriteOptions,
    ) -> JsonResult<()> {
        let path = path.as_ref();
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write(sheet, &mut writer, options)?;
        writer.flush()?;

        sheet.mark_saved();
        debug!(path = %path.display(), cells = sheet.len(), "saved sheet");
        Ok(())
    }

    /// Write a sheet to a writer
    ///
    /// Each non-empty cell is stored as its string form, in name order.
    pub fn write<W: Write>(sheet: &Sheet, writer: W, options: &JsonWriteOptions) -> JsonResult<()> {
        let document = SheetDocument {
            cells: CellEntries(
                sheet
                    .iter()
                    .map(|(name, cell)| {
                        let entry = CellEntry {
                            string_form: cell.content().to_string(),
                        };
                        (name.to_string(), entry)
                    })
                    .collect(),
            ),
        };

        if options.pretty {
            serde_json::to_writer_pretty(writer, &document)?;
        } else {
            serde_json::to_writer(writer, &document)?;
        }
        Ok(())
    }
}
