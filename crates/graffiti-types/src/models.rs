use serde::{Deserialize, Serialize};

/// Canonical column order of the backing sheet. Every persisted row carries
/// exactly these ten cells; rows fetched with columns missing are filled with
/// typed defaults on load.
pub const REQUIRED_COLUMNS: [&str; 10] = [
    "reporter",
    "location",
    "location_desc",
    "notes",
    "status",
    "lat",
    "lng",
    "remover",
    "before_image",
    "after_image",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Reported,
    Removed,
}

impl ReportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Reported => "Reported",
            ReportStatus::Removed => "Removed",
        }
    }

    /// Lenient parse for cells coming back from the sheet: only the exact
    /// text "Removed" means removed, anything else (including blank cells
    /// from rows that predate the status column) reads as Reported.
    pub fn parse_cell(text: &str) -> Self {
        if text == "Removed" {
            ReportStatus::Removed
        } else {
            ReportStatus::Reported
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One graffiti incident. Identity is positional: a report is addressed by
/// its row index in the table, there is no independent durable key. The
/// `location` field holds the display string ("lat, lng" to 5 decimals)
/// persisted alongside the raw coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub reporter: String,
    pub location: String,
    pub location_desc: String,
    pub notes: String,
    pub status: ReportStatus,
    pub lat: f64,
    pub lng: f64,
    /// Empty unless status is Removed.
    pub remover: String,
    /// Base64 photo taken at submission; "" = no photo. Write-once.
    pub before_image: String,
    /// Base64 photo taken after removal; "" = no photo. Never cleared once set.
    pub after_image: String,
}
