//! The two legal report transitions: creation (always status Reported) and
//! the status update used by the removal workflow. Both are atomic against
//! the in-memory table: a failed persist rolls the mutation back, so the
//! session never holds a row the store does not.

use thiserror::Error;
use tracing::info;

use graffiti_store::StoreError;
use graffiti_types::api::MapClick;
use graffiti_types::models::{Report, ReportStatus};

use crate::matcher;
use crate::photo::{self, PhotoData, PhotoError};
use crate::session::Session;

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("reporter name is required")]
    MissingReporter,
    #[error("you must select a location on the map")]
    MissingLocation,
    #[error(transparent)]
    Photo(#[from] PhotoError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Error)]
pub enum UpdateError {
    /// The index does not reference a currently Reported row. The update
    /// surface is only ever populated with Reported rows, so this guards
    /// against a stale selection, not a user mistake.
    #[error("no active report at row {0}")]
    InvalidIndex(usize),
    #[error(transparent)]
    Photo(#[from] PhotoError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A validated submission in the making. Text fields arrive untrimmed;
/// `click` is whatever the map last emitted, if anything.
#[derive(Debug)]
pub struct NewReport {
    pub reporter: String,
    pub location_desc: String,
    pub notes: String,
    pub click: Option<MapClick>,
    pub before_photo: Option<PhotoData>,
}

impl Session {
    /// Create a report. New reports are always Reported, with an empty
    /// remover and no after-photo; the before-photo is fixed here and never
    /// modified afterwards.
    pub fn submit(&mut self, new: NewReport) -> Result<Report, SubmitError> {
        let reporter = new.reporter.trim();
        if reporter.is_empty() {
            return Err(SubmitError::MissingReporter);
        }
        let click = new.click.ok_or(SubmitError::MissingLocation)?;

        let before_image = match &new.before_photo {
            Some(photo) => photo::encode_upload(&photo.filename, &photo.bytes)?,
            None => String::new(),
        };

        let report = Report {
            reporter: reporter.to_string(),
            location: matcher::format_location(click.lat, click.lng),
            location_desc: new.location_desc.trim().to_string(),
            notes: new.notes.trim().to_string(),
            status: ReportStatus::Reported,
            lat: click.lat,
            lng: click.lng,
            remover: String::new(),
            before_image,
            after_image: String::new(),
        };

        let (store, table) = self.parts_mut();
        table.append(report.clone());
        if let Err(e) = table.save(store.as_ref()) {
            table.pop();
            return Err(e.into());
        }

        info!("Report submitted by {} at {}", report.reporter, report.location);
        Ok(report)
    }

    /// Apply a status update to the Reported row at `index`.
    ///
    /// Moving to Removed records the remover and, only when an after-photo
    /// accompanies the update, overwrites the after-image — omitting the
    /// photo leaves any prior after-image in place. Moving (back) to
    /// Reported forces the remover empty. No other field is touched.
    pub fn update_status(
        &mut self,
        index: usize,
        new_status: ReportStatus,
        remover: &str,
        after_photo: Option<PhotoData>,
    ) -> Result<(), UpdateError> {
        // Encode before touching the table so a bad upload changes nothing.
        let encoded = match &after_photo {
            Some(photo) => Some(photo::encode_upload(&photo.filename, &photo.bytes)?),
            None => None,
        };

        let previous = match self.table().get(index) {
            Some(row) if row.status == ReportStatus::Reported => row.clone(),
            _ => return Err(UpdateError::InvalidIndex(index)),
        };

        let (store, table) = self.parts_mut();
        if let Some(row) = table.get_mut(index) {
            row.status = new_status;
            match new_status {
                ReportStatus::Removed => {
                    row.remover = remover.trim().to_string();
                    if let Some(image) = encoded {
                        row.after_image = image;
                    }
                }
                ReportStatus::Reported => row.remover.clear(),
            }
        }

        if let Err(e) = table.save(store.as_ref()) {
            if let Some(row) = table.get_mut(index) {
                *row = previous;
            }
            return Err(e.into());
        }

        info!("Report #{index} updated to {new_status}");
        Ok(())
    }
}
