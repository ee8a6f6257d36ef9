use std::sync::Arc;

use tracing::info;

use graffiti_store::table::ReportTable;
use graffiti_store::{SheetStore, StoreError};

/// Session-scoped context: the backing store handle plus the table snapshot
/// loaded when the session began. The snapshot is never refreshed during
/// the session's lifetime, and every save writes the whole table back — two
/// sessions over the same store therefore race last-writer-wins (the later
/// save silently replaces the earlier one's rows). That is deliberate
/// compatibility behavior, not something this layer papers over.
pub struct Session {
    store: Arc<dyn SheetStore>,
    table: ReportTable,
}

impl Session {
    /// Load the full table from the backing store. An unreachable store is
    /// fatal here; there is no retry.
    pub fn start(store: Arc<dyn SheetStore>) -> Result<Self, StoreError> {
        let table = ReportTable::load(store.as_ref())?;
        info!("Session started with {} reports", table.len());
        Ok(Self { store, table })
    }

    pub fn table(&self) -> &ReportTable {
        &self.table
    }

    pub(crate) fn parts_mut(&mut self) -> (&Arc<dyn SheetStore>, &mut ReportTable) {
        (&self.store, &mut self.table)
    }
}
