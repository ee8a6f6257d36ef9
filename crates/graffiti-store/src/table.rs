use serde_json::Value;
use tracing::debug;

use graffiti_types::models::{REQUIRED_COLUMNS, Report, ReportStatus};

use crate::{RawRecord, SheetStore, StoreError};

/// The in-memory report table: the canonical session-scoped copy of the
/// backing sheet. Loaded once at session start, mutated in memory, and
/// written back wholesale after every mutation. Row position doubles as the
/// report identifier, so table order is load order and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTable {
    reports: Vec<Report>,
}

impl ReportTable {
    /// Fetch every persisted row and normalize it into a `Report`, filling
    /// typed defaults ("" for text, 0.0 for lat/lng) for any column the
    /// stored header was missing.
    pub fn load(store: &dyn SheetStore) -> Result<Self, StoreError> {
        let records = store.read_all_records()?;
        let reports = records.into_iter().map(normalize_record).collect::<Vec<_>>();
        debug!("Loaded {} report rows", reports.len());
        Ok(Self { reports })
    }

    /// Replace the entire backing table with this table's contents. Full
    /// header + all data rows, no diffing; a concurrent session's
    /// intervening save is silently overwritten.
    pub fn save(&self, store: &dyn SheetStore) -> Result<(), StoreError> {
        let header: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        let rows: Vec<Vec<Value>> = self.reports.iter().map(report_cells).collect();
        store.overwrite_all(&header, &rows)?;
        debug!("Saved {} report rows", rows.len());
        Ok(())
    }

    /// Add a row in memory. Does not persist; the caller must `save`.
    pub fn append(&mut self, report: Report) {
        self.reports.push(report);
    }

    /// Drop the last row. Used to back out an append whose save failed.
    pub fn pop(&mut self) -> Option<Report> {
        self.reports.pop()
    }

    pub fn get(&self, index: usize) -> Option<&Report> {
        self.reports.get(index)
    }

    /// Mutate the row at `index` in place. Does not persist.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Report> {
        self.reports.get_mut(index)
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Missing cells get typed defaults; numeric cells in text columns are
/// stringified rather than rejected (spreadsheets love turning "38.99" into
/// a number), and anything unparseable in lat/lng reads as 0.0.
fn normalize_record(record: RawRecord) -> Report {
    Report {
        reporter: text_cell(&record, "reporter"),
        location: text_cell(&record, "location"),
        location_desc: text_cell(&record, "location_desc"),
        notes: text_cell(&record, "notes"),
        status: ReportStatus::parse_cell(&text_cell(&record, "status")),
        lat: number_cell(&record, "lat"),
        lng: number_cell(&record, "lng"),
        remover: text_cell(&record, "remover"),
        before_image: text_cell(&record, "before_image"),
        after_image: text_cell(&record, "after_image"),
    }
}

fn text_cell(record: &RawRecord, column: &str) -> String {
    match record.get(column) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_cell(record: &RawRecord, column: &str) -> f64 {
    match record.get(column) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn report_cells(report: &Report) -> Vec<Value> {
    vec![
        Value::from(report.reporter.clone()),
        Value::from(report.location.clone()),
        Value::from(report.location_desc.clone()),
        Value::from(report.notes.clone()),
        Value::from(report.status.as_str()),
        Value::from(report.lat),
        Value::from(report.lng),
        Value::from(report.remover.clone()),
        Value::from(report.before_image.clone()),
        Value::from(report.after_image.clone()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySheetStore;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> RawRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn missing_columns_get_typed_defaults() {
        let report = normalize_record(record(&[("reporter", json!("Sam"))]));
        assert_eq!(report.reporter, "Sam");
        assert_eq!(report.location, "");
        assert_eq!(report.notes, "");
        assert_eq!(report.status, ReportStatus::Reported);
        assert_eq!(report.lat, 0.0);
        assert_eq!(report.lng, 0.0);
        assert_eq!(report.before_image, "");
    }

    #[test]
    fn numeric_text_cells_are_stringified() {
        let report = normalize_record(record(&[
            ("notes", json!(42)),
            ("lat", json!("38.99")),
            ("lng", json!("not a number")),
        ]));
        assert_eq!(report.notes, "42");
        assert_eq!(report.lat, 38.99);
        assert_eq!(report.lng, 0.0);
    }

    #[test]
    fn unknown_status_reads_as_reported() {
        let report = normalize_record(record(&[("status", json!("Pending"))]));
        assert_eq!(report.status, ReportStatus::Reported);
    }

    #[test]
    fn save_load_round_trip() {
        let store = MemorySheetStore::default();
        let mut table = ReportTable::default();
        table.append(Report {
            reporter: "Sam".into(),
            location: "38.99000, -77.02000".into(),
            location_desc: "Wall".into(),
            notes: "tag".into(),
            status: ReportStatus::Reported,
            lat: 38.99,
            lng: -77.02,
            remover: String::new(),
            before_image: String::new(),
            after_image: String::new(),
        });
        table.save(&store).unwrap();

        let reloaded = ReportTable::load(&store).unwrap();
        assert_eq!(reloaded, table);
    }

    #[test]
    fn empty_store_loads_empty_table() {
        let store = MemorySheetStore::default();
        let table = ReportTable::load(&store).unwrap();
        assert!(table.is_empty());
    }
}
