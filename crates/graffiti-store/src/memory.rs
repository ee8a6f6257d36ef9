use std::sync::Mutex;

use serde_json::Value;

use crate::{RawRecord, SheetDocument, SheetStore, StoreError};

/// In-memory sheet, primarily for tests. Several sessions can share one
/// instance through an `Arc` to reproduce the concurrent-session
/// last-writer-wins behavior of the real backing store.
#[derive(Debug, Default)]
pub struct MemorySheetStore {
    doc: Mutex<SheetDocument>,
}

impl SheetStore for MemorySheetStore {
    fn read_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let doc = self
            .doc
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("sheet lock poisoned: {e}")))?;
        Ok(doc.clone().into_records())
    }

    fn overwrite_all(&self, header: &[String], rows: &[Vec<Value>]) -> Result<(), StoreError> {
        let mut doc = self
            .doc
            .lock()
            .map_err(|e| StoreError::Unavailable(format!("sheet lock poisoned: {e}")))?;
        *doc = SheetDocument {
            header: header.to_vec(),
            rows: rows.to_vec(),
        };
        Ok(())
    }
}
