//! JSON codec for persisted values.
//!
//! Collections are stored as a single JSON array per key. The codec is kept
//! behind two functions so the store never touches `serde_json` directly.

use serde::Serialize;
use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to decode value: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Encode a value as compact JSON.
///
/// # Errors
///
/// Returns [`CodecError::Encode`] if the value cannot be represented as JSON
/// (e.g. a map with non-string keys).
pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<String, CodecError> {
    serde_json::to_string(value).map_err(CodecError::Encode)
}

/// Decode JSON into `T`.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if `raw` is not valid JSON or does not
/// match the shape of `T`.
pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, CodecError> {
    serde_json::from_str(raw).map_err(CodecError::Decode)
}

#[cfg(test)]
#[path = "codec_test.rs"]
mod tests;
