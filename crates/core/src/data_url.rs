//! Decoding of `data:` URLs posted by browser clients.
//!
//! The payload after the first comma is always treated as standard
//! base64; the header is only inspected for an optional MIME type.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Errors from [`decode_data_url`].
#[derive(Debug, thiserror::Error)]
pub enum DataUrlError {
    #[error("data URL has no ',' separating header and payload")]
    MissingSeparator,

    #[error("data URL payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// A decoded data URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedDataUrl {
    /// MIME type from the header, e.g. `image/png`.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

/// Decode `data:<mime>;base64,<payload>` into raw bytes.
pub fn decode_data_url(url: &str) -> Result<DecodedDataUrl, DataUrlError> {
    let (header, payload) = url.split_once(',').ok_or(DataUrlError::MissingSeparator)?;

    let mime = header
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.split(';').next())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD.decode(compact)?;

    Ok(DecodedDataUrl { mime, bytes })
}
