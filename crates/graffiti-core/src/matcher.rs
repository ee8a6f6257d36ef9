//! Resolves a raw map click into either a candidate location for a new
//! report or a reference to an existing one.
//!
//! Matching is exact-match-after-rounding to 5 decimal places (~1 meter),
//! not a distance threshold: two points 0.9m apart that round to different
//! 5th-decimal digits will not match. The same 5-decimal rendering is the
//! display string persisted in the `location` column, so a click and its
//! stored report always agree textually.

use graffiti_store::table::ReportTable;

/// Render a coordinate pair the way it is shown to users and persisted.
pub fn format_location(lat: f64, lng: f64) -> String {
    format!("{lat:.5}, {lng:.5}")
}

/// What a map click resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClickTarget {
    /// No stored report rounds to this coordinate.
    NewLocation { lat: f64, lng: f64 },
    /// Row index of the matching report.
    Existing(usize),
}

/// First row whose coordinate rounds to the same 5-decimal pair as the
/// click, in table order. Ties (two reports at the same spot) resolve to
/// the earlier row.
pub fn find_nearest(table: &ReportTable, lat: f64, lng: f64) -> Option<usize> {
    let target = rounding_key(lat, lng);
    table
        .reports()
        .iter()
        .position(|r| rounding_key(r.lat, r.lng) == target)
}

pub fn classify_click(table: &ReportTable, lat: f64, lng: f64) -> ClickTarget {
    match find_nearest(table, lat, lng) {
        Some(index) => ClickTarget::Existing(index),
        None => ClickTarget::NewLocation { lat, lng },
    }
}

/// Integer key after scaling to the 5th decimal, so equality is exact.
fn rounding_key(lat: f64, lng: f64) -> (i64, i64) {
    (((lat * 1e5).round()) as i64, ((lng * 1e5).round()) as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use graffiti_types::models::{Report, ReportStatus};

    fn report_at(lat: f64, lng: f64) -> Report {
        Report {
            reporter: "x".into(),
            location: format_location(lat, lng),
            location_desc: String::new(),
            notes: String::new(),
            status: ReportStatus::Reported,
            lat,
            lng,
            remover: String::new(),
            before_image: String::new(),
            after_image: String::new(),
        }
    }

    fn table_with(reports: Vec<Report>) -> ReportTable {
        let mut table = ReportTable::default();
        for r in reports {
            table.append(r);
        }
        table
    }

    #[test]
    fn formats_to_five_decimals() {
        assert_eq!(format_location(38.9907, -77.0261), "38.99070, -77.02610");
        assert_eq!(format_location(0.0, 0.0), "0.00000, 0.00000");
    }

    #[test]
    fn matches_when_rounding_agrees() {
        let table = table_with(vec![report_at(38.99070, -77.02610)]);
        // Differs only past the 5th decimal
        assert_eq!(find_nearest(&table, 38.990701, -77.026102), Some(0));
    }

    #[test]
    fn no_match_when_fifth_decimal_differs() {
        let table = table_with(vec![report_at(38.99070, -77.02610)]);
        assert_eq!(find_nearest(&table, 38.99071, -77.02610), None);
    }

    #[test]
    fn tie_break_is_first_in_table_order() {
        let table = table_with(vec![
            report_at(38.99070, -77.02610),
            report_at(38.99070, -77.02610),
        ]);
        assert_eq!(find_nearest(&table, 38.99070, -77.02610), Some(0));
    }

    #[test]
    fn classify_falls_back_to_new_location() {
        let table = table_with(vec![report_at(38.99070, -77.02610)]);
        assert_eq!(
            classify_click(&table, 10.0, 10.0),
            ClickTarget::NewLocation { lat: 10.0, lng: 10.0 }
        );
        assert_eq!(
            classify_click(&table, 38.99070, -77.02610),
            ClickTarget::Existing(0)
        );
    }
}
