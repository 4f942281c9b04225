//! Payload compression and the `#layout=` URL fragment.
//!
//! The record is serialized to compact JSON and compressed with lz-string's
//! URI-component alphabet, which only uses characters that survive a URL
//! fragment unescaped.  Compressed payloads carry a `~` prefix so the viewer
//! can tell them apart from raw JSON.

use thiserror::Error;
use tracing::debug;

use super::record::{LayoutRecord, LAYOUT_VERSION};

/// Marks a compressed payload.
pub const LZ_PREFIX: char = '~';

/// URL fragment key the payload is stored under.
pub const LAYOUT_FRAGMENT: &str = "#layout=";

/// Errors produced while decoding a layout payload.
///
/// Encoding itself only fails if the record cannot be serialized.
#[derive(Debug, Error)]
pub enum EncodingError {
    /// The URL has no `#layout=` fragment.
    #[error("URL has no #layout= fragment")]
    MissingFragment,

    /// A `~` payload did not decompress to text.
    #[error("compressed layout payload is corrupt")]
    Decompress,

    /// The (decompressed) payload is not a valid layout record.
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The record declares a format this crate does not understand.
    #[error("unsupported layout version {0} (expected 1)")]
    UnsupportedVersion(u32),
}

/// Text compressor used for the URL payload.
#[cfg_attr(test, mockall::automock)]
pub trait PayloadCompressor {
    /// Compresses `json`.  An empty string means "not compressible".
    fn compress(&self, json: &str) -> String;

    /// Reverses [`PayloadCompressor::compress`]; `None` for corrupt input.
    fn decompress(&self, token: &str) -> Option<String>;
}

/// lz-string `compressToEncodedURIComponent` / `decompressFromEncodedURIComponent`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LzCompressor;

impl PayloadCompressor for LzCompressor {
    fn compress(&self, json: &str) -> String {
        lz_str::compress_to_encoded_uri_component(json)
    }

    fn decompress(&self, token: &str) -> Option<String> {
        let wide = lz_str::decompress_from_encoded_uri_component(token)?;
        String::from_utf16(&wide).ok()
    }
}

/// Serializes and compresses `record` into a fragment payload.
///
/// # Errors
///
/// Returns [`EncodingError::Json`] if the record cannot be serialized.
pub fn encode_payload(record: &LayoutRecord) -> Result<String, EncodingError> {
    encode_payload_with(record, &LzCompressor)
}

/// Same as [`encode_payload`] with an explicit compressor.
///
/// Falls back to the raw JSON when the compressor produces nothing.
pub fn encode_payload_with(
    record: &LayoutRecord,
    compressor: &dyn PayloadCompressor,
) -> Result<String, EncodingError> {
    let json = serde_json::to_string(record)?;
    let token = compressor.compress(&json);
    if token.is_empty() {
        debug!("layout compression produced nothing; using raw JSON ({} bytes)", json.len());
        return Ok(json);
    }
    debug!("layout payload compressed {} → {} bytes", json.len(), token.len() + 1);
    Ok(format!("{LZ_PREFIX}{token}"))
}

/// Builds `{base_url}#layout={payload}`.
///
/// # Errors
///
/// See [`encode_payload`].
pub fn build_url(base_url: &str, record: &LayoutRecord) -> Result<String, EncodingError> {
    Ok(format!("{base_url}{LAYOUT_FRAGMENT}{}", encode_payload(record)?))
}

/// Decodes a bare payload (the part after `#layout=`).
///
/// # Errors
///
/// [`EncodingError::Decompress`] for a corrupt `~` token,
/// [`EncodingError::Json`] for malformed JSON and
/// [`EncodingError::UnsupportedVersion`] for a record with `v != 1`.
pub fn decode_payload(payload: &str) -> Result<LayoutRecord, EncodingError> {
    decode_payload_with(payload, &LzCompressor)
}

/// Same as [`decode_payload`] with an explicit compressor.
pub fn decode_payload_with(
    payload: &str,
    compressor: &dyn PayloadCompressor,
) -> Result<LayoutRecord, EncodingError> {
    let record: LayoutRecord = match payload.strip_prefix(LZ_PREFIX) {
        Some(token) => {
            let json = compressor.decompress(token).ok_or(EncodingError::Decompress)?;
            serde_json::from_str(&json)?
        }
        None => serde_json::from_str(payload)?,
    };

    if record.v != LAYOUT_VERSION {
        return Err(EncodingError::UnsupportedVersion(record.v));
    }
    Ok(record)
}

/// Decodes a full layout URL.
///
/// # Errors
///
/// [`EncodingError::MissingFragment`] when the URL has no `#layout=`, plus
/// everything [`decode_payload`] returns.
pub fn decode_layout_url(url: &str) -> Result<LayoutRecord, EncodingError> {
    let (_, payload) = url
        .split_once(LAYOUT_FRAGMENT)
        .ok_or(EncodingError::MissingFragment)?;
    decode_payload(payload)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
