use serde::{Deserialize, Serialize};

use crate::models::ReportStatus;

// -- Map interaction --

/// A click coordinate forwarded from the map widget. The widget reports at
/// most one "last clicked" point per render; a submission with no click at
/// all simply omits it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MapClick {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClickResponse {
    /// No report rounds to this coordinate; the formatted location is the
    /// candidate for a new submission.
    NewLocation { lat: f64, lng: f64, location: String },
    /// An existing report matched within rounding tolerance.
    Existing { index: usize },
}

// -- Submit --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhotoUpload {
    pub filename: String,
    /// Raw image bytes, base64-encoded for transport.
    pub data: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitReportRequest {
    pub reporter: String,
    #[serde(default)]
    pub location_desc: String,
    #[serde(default)]
    pub notes: String,
    pub click: Option<MapClick>,
    pub before_photo: Option<PhotoUpload>,
}

// -- Update --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: ReportStatus,
    #[serde(default)]
    pub remover: String,
    pub after_photo: Option<PhotoUpload>,
}

// -- Views --

/// One row of the history view. Photo blobs are served from their own
/// endpoint, so the listing only carries presence flags.
#[derive(Debug, Serialize)]
pub struct ReportView {
    pub index: usize,
    pub reporter: String,
    pub location: String,
    pub location_desc: String,
    pub notes: String,
    pub status: ReportStatus,
    pub lat: f64,
    pub lng: f64,
    pub remover: String,
    pub has_before_photo: bool,
    pub has_after_photo: bool,
}

/// A Reported row offered in the update workflow, with the selection label
/// shown in the picker.
#[derive(Debug, Serialize)]
pub struct ActiveReport {
    pub index: usize,
    pub label: String,
}

/// Map marker definition handed to the map widget.
#[derive(Debug, Serialize)]
pub struct Marker {
    pub lat: f64,
    pub lng: f64,
    pub tooltip: String,
    pub color: String,
}

/// Status breakdown for the chart view.
#[derive(Debug, Serialize)]
pub struct StatusCount {
    pub status: ReportStatus,
    pub count: usize,
}

// -- Errors --

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}
