pub mod file;
pub mod http;
pub mod memory;
pub mod table;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One fetched data row, keyed by header column name. Columns absent from
/// the stored header are simply absent from the map.
pub type RawRecord = serde_json::Map<String, Value>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing connection could not be established or a write was
    /// rejected. Fatal when hit at session start; there is no retry.
    #[error("backing store unavailable: {0}")]
    Unavailable(String),
    /// The store answered, but with something that is not a sheet document.
    #[error("backing store returned malformed data: {0}")]
    Malformed(String),
}

/// The whole-table blob as it travels to and from a backing store: one
/// header row plus all data rows, cells as JSON scalars.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetDocument {
    pub header: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl SheetDocument {
    /// Zip each data row against the header. Short rows yield records with
    /// missing keys (filled with defaults at normalization); surplus cells
    /// beyond the header are dropped.
    pub fn into_records(self) -> Vec<RawRecord> {
        let header = self.header;
        self.rows
            .into_iter()
            .map(|row| {
                header
                    .iter()
                    .zip(row)
                    .map(|(name, cell)| (name.clone(), cell))
                    .collect()
            })
            .collect()
    }
}

/// A tabular backing store reduced to its two primitives: fetch every row,
/// or replace the entire table. There is no row-level addressing and no
/// transaction — every overwrite is last-writer-wins against concurrent
/// sessions.
pub trait SheetStore: Send + Sync {
    fn read_all_records(&self) -> Result<Vec<RawRecord>, StoreError>;
    fn overwrite_all(&self, header: &[String], rows: &[Vec<Value>]) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn short_rows_become_partial_records() {
        let doc = SheetDocument {
            header: vec!["reporter".into(), "notes".into()],
            rows: vec![vec![json!("Sam")]],
        };
        let records = doc.into_records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("reporter"), Some(&json!("Sam")));
        assert!(records[0].get("notes").is_none());
    }

    #[test]
    fn surplus_cells_are_dropped() {
        let doc = SheetDocument {
            header: vec!["reporter".into()],
            rows: vec![vec![json!("Sam"), json!("stray")]],
        };
        let records = doc.into_records();
        assert_eq!(records[0].len(), 1);
    }
}
