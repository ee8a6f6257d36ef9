use serde_json::Value;
use tracing::info;

use crate::{RawRecord, SheetDocument, SheetStore, StoreError};

/// Sheet held by a remote spreadsheet service, addressed by URL and
/// authorized with a bearer token from the secret configuration. The
/// service exposes the same two primitives as every other store: GET the
/// whole document, PUT a full replacement. Calls are blocking; route
/// handlers run them under `spawn_blocking`.
pub struct HttpSheetStore {
    client: reqwest::blocking::Client,
    url: String,
    token: String,
}

impl HttpSheetStore {
    pub fn new(url: impl Into<String>, token: impl Into<String>) -> Result<Self, StoreError> {
        let client = reqwest::blocking::Client::builder()
            .build()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let url = url.into();
        info!("Sheet service store at {}", url);
        Ok(Self {
            client,
            url,
            token: token.into(),
        })
    }
}

impl SheetStore for HttpSheetStore {
    fn read_all_records(&self) -> Result<Vec<RawRecord>, StoreError> {
        let response = self
            .client
            .get(&self.url)
            .bearer_auth(&self.token)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        let doc: SheetDocument = response
            .json()
            .map_err(|e| StoreError::Malformed(e.to_string()))?;
        Ok(doc.into_records())
    }

    fn overwrite_all(&self, header: &[String], rows: &[Vec<Value>]) -> Result<(), StoreError> {
        let doc = SheetDocument {
            header: header.to_vec(),
            rows: rows.to_vec(),
        };
        self.client
            .put(&self.url)
            .bearer_auth(&self.token)
            .json(&doc)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}
