//! The photo boundary: binary image bytes become base64 text before they
//! enter a report row, and come back out as bytes for display. The empty
//! string is the sentinel for "no photo".

use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use thiserror::Error;

const ACCEPTED_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("unsupported photo format '{0}': only jpg, jpeg and png are accepted")]
    UnsupportedFormat(String),
    #[error("photo data is not valid base64: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),
    #[error("no photo stored")]
    Empty,
}

/// An uploaded photo: original filename (for the format check) plus raw bytes.
#[derive(Debug, Clone)]
pub struct PhotoData {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Validate the upload's extension and encode its bytes for storage.
/// Format filtering is by extension only; the bytes are not inspected.
pub fn encode_upload(filename: &str, bytes: &[u8]) -> Result<String, PhotoError> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(PhotoError::UnsupportedFormat(filename.to_string()));
    }
    Ok(B64.encode(bytes))
}

/// Decode a stored photo cell back to image bytes. Callers check for the
/// empty sentinel before display; hitting it here is `Empty`.
pub fn decode_image(encoded: &str) -> Result<Vec<u8>, PhotoError> {
    if encoded.is_empty() {
        return Err(PhotoError::Empty);
    }
    Ok(B64.decode(encoded)?)
}

/// Content type for serving a decoded photo, sniffed from magic bytes.
pub fn sniff_content_type(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8]) {
        "image/jpeg"
    } else {
        "application/octet-stream"
    }
}
