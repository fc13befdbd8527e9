//! Store error taxonomy.
//!
//! `Malformed` and `Unavailable` describe read-path faults; the collection
//! API logs and swallows them. `NotFound`, `Duplicate` and `Invalid` are
//! returned to callers that need to react to them.

use crate::backend::StorageError;
use crate::codec::CodecError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("{key}: record not found: {id}")]
    NotFound { key: String, id: String },
    #[error("{key}: conflicts with existing record {existing_id}")]
    Duplicate { key: String, existing_id: String },
    #[error("{key}: malformed payload: {source}")]
    Malformed {
        key: String,
        #[source]
        source: CodecError,
    },
    #[error("storage unavailable")]
    Unavailable,
    #[error("{key}: storage failure: {source}")]
    Backend {
        key: String,
        #[source]
        source: StorageError,
    },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

impl StoreError {
    pub(crate) fn from_storage(key: &str, source: StorageError) -> Self {
        match source {
            StorageError::Unavailable => Self::Unavailable,
            source => Self::Backend { key: key.to_owned(), source },
        }
    }
}

/// A record failed validation after a create or a patch merge.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    Empty { field: &'static str },
    #[error("{field} exceeds {max} characters")]
    TooLong { field: &'static str, max: usize },
    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ValidationError {
    /// Fail with [`ValidationError::Empty`] when `value` is blank.
    ///
    /// # Errors
    ///
    /// Returns `Empty` for whitespace-only input.
    pub fn require(field: &'static str, value: &str) -> Result<(), Self> {
        if value.trim().is_empty() {
            return Err(Self::Empty { field });
        }
        Ok(())
    }

    /// Fail with [`ValidationError::TooLong`] when `value` exceeds `max` chars.
    ///
    /// # Errors
    ///
    /// Returns `TooLong` when the char count is above `max`.
    pub fn max_len(field: &'static str, value: &str, max: usize) -> Result<(), Self> {
        if value.chars().count() > max {
            return Err(Self::TooLong { field, max });
        }
        Ok(())
    }
}
