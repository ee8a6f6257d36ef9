use std::path::PathBuf;

use serde_json::Value;
use tracing::info;

use crate::{RawRecord, SheetDocument, SheetStore, StoreError};

/// Sheet persisted as a single JSON document on disk, for local deployments
/// and development. The file holds the same header-plus-rows blob the HTTP
/// store exchanges; a file that does not exist yet reads as an empty table.
pub struct FileSheetStore {
    path: PathBuf,
}

impl FileSheetStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Sheet file store at {}", path.display());
        Self { path }
    }
}

impl SheetStore for FileSheetStore {
    fn read_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))?;
        let doc: SheetDocument = serde_json::from_str(&raw)
            .map_err(|e| StoreError::Malformed(format!("{}: {e}", self.path.display())))?;
        Ok(doc.into_records())
    }

    fn overwrite_all(&self, header: &[String], rows: &[Vec<Value>]) -> Result<(), StoreError> {
        let doc = SheetDocument {
            header: header.to_vec(),
            rows: rows.to_vec(),
        };
        let raw = serde_json::to_string_pretty(&doc)
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", self.path.display())))
    }
}
