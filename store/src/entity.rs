//! Entity contract and the stored record envelope.
//!
//! DESIGN
//! ======
//! A [`Record`] pairs store-owned metadata (`id`, `createdAt`) with the
//! domain payload. The payload is flattened on the wire, so a stored event
//! looks like `{"id": .., "createdAt": .., "name": .., ...}`, but only the
//! payload is reachable through a patch: ids and creation times cannot be
//! rewritten by an update.

use std::ops::Deref;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A domain payload that can live in a collection.
pub trait Entity: Serialize + DeserializeOwned + Clone {
    /// Typed partial update. Fields left as `None` keep their prior value.
    type Patch;

    /// Shallow-merge `patch` into `self`.
    fn merge(&mut self, patch: Self::Patch);

    /// Check the payload before it is persisted (on create and after merge).
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

/// Entities removed by flipping a flag instead of deleting the record.
pub trait SoftDelete: Entity {
    fn is_active(&self) -> bool;
    fn set_active(&mut self, active: bool);
}

/// A persisted entity together with its store-owned metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    id: String,
    #[serde(rename = "createdAt")]
    created_at: String,
    #[serde(flatten)]
    pub item: T,
}

impl<T> Record<T> {
    /// Build a record with explicit metadata. Intended for static catalogs and
    /// fixtures; records created through a [`crate::Collection`] get theirs
    /// generated.
    pub fn new(id: impl Into<String>, created_at: impl Into<String>, item: T) -> Self {
        let (id, created_at) = (id.into(), created_at.into());
        Self { id, created_at, item }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn created_at(&self) -> &str {
        &self.created_at
    }

    #[must_use]
    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T> Deref for Record<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.item
    }
}
