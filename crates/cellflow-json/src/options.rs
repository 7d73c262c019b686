//! JSON options

/// Options for writing JSON files
#[derive(Debug, Clone)]
pub struct JsonWriteOptions {
    /// Indent the document (default: true)
    pub pretty: bool,
}

impl Default for JsonWriteOptions {
    fn default() -> Self {
        Self { pretty: true }
    }
}
