//! On-disk document shape

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct SheetDocument {
    #[serde(rename = "Cells")]
    pub cells: CellEntries,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct CellEntry {
    #[serde(rename = "StringForm")]
    pub string_form: String,
}

/// The `Cells` object as written, in document order and with repeated keys
/// kept, so the reader can reject collisions instead of losing entries
#[derive(Debug, Default)]
pub(crate) struct CellEntries(pub Vec<(String, CellEntry)>);

impl Serialize for CellEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, entry) in &self.0 {
            map.serialize_entry(name, entry)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CellEntries {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = CellEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from cell names to cell entries")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<CellEntries, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some(pair) = access.next_entry::<String, CellEntry>()? {
                    entries.push(pair);
                }
                Ok(CellEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}
