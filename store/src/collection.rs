//! Generic persisted collections.
//!
//! DESIGN
//! ======
//! Every mutation is a full cycle: read the whole array for the key, change
//! it in memory, write the whole array back. There is no append log and no
//! lock across the cycle, so two writers racing on one key are
//! last-writer-wins. The store assumes a single active writer.
//!
//! ERROR HANDLING
//! ==============
//! Read faults (unavailable backend, malformed JSON) degrade to an empty
//! collection. A malformed key is removed when `clear_corrupt` is set so
//! the next write starts from a clean slate. Write faults are logged and
//! dropped. Validation and uniqueness failures are returned.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use time::OffsetDateTime;
use tracing::{debug, error, warn};

use crate::backend::{MemoryStorage, Storage, StorageError};
use crate::codec;
use crate::document::Document;
use crate::entity::{Entity, Record, SoftDelete};
use crate::error::StoreError;
use crate::id;

// =============================================================================
// STORE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Remove a key whose payload fails to decode.
    pub clear_corrupt: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { clear_corrupt: true }
    }
}

/// Handle to a storage backend. Cheap to clone; all clones share the backend.
#[derive(Clone)]
pub struct LocalStore {
    storage: Arc<dyn Storage>,
    options: StoreOptions,
}

impl fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalStore")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl LocalStore {
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_options(storage, StoreOptions::default())
    }

    #[must_use]
    pub fn with_options(storage: Arc<dyn Storage>, options: StoreOptions) -> Self {
        Self { storage, options }
    }

    /// A store over a fresh [`MemoryStorage`].
    #[must_use]
    pub fn memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    #[must_use]
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// Typed handle to the collection stored under `key`.
    #[must_use]
    pub fn collection<T: Entity>(&self, key: &'static str) -> Collection<T> {
        Collection { store: self.clone(), key, _marker: PhantomData }
    }

    /// Typed handle to the single document stored under `key`.
    #[must_use]
    pub fn document<T: Serialize + DeserializeOwned>(&self, key: &'static str) -> Document<T> {
        Document::new(self.clone(), key)
    }

    /// Keys currently present. Empty when the backend is unavailable.
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        match self.storage.keys() {
            Ok(keys) => keys,
            Err(StorageError::Unavailable) => Vec::new(),
            Err(err) => {
                error!(error = %err, "failed to list storage keys");
                Vec::new()
            }
        }
    }

    /// Raw payload for `key`, bypassing decoding. Fails closed like reads.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        match self.storage.get_item(key) {
            Ok(raw) => raw,
            Err(err) => {
                self.report_read_fault(key, &StoreError::from_storage(key, err));
                None
            }
        }
    }

    /// Decode the value under `key`, recovering from every read fault.
    pub(crate) fn load<V: DeserializeOwned>(&self, key: &str) -> Option<V> {
        match self.try_load(key) {
            Ok(value) => value,
            Err(err) => {
                self.report_read_fault(key, &err);
                None
            }
        }
    }

    fn try_load<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, StoreError> {
        let raw = self
            .storage
            .get_item(key)
            .map_err(|err| StoreError::from_storage(key, err))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        codec::decode(&raw)
            .map(Some)
            .map_err(|source| StoreError::Malformed { key: key.to_owned(), source })
    }

    fn report_read_fault(&self, key: &str, err: &StoreError) {
        match err {
            StoreError::Unavailable => debug!(key, "storage unavailable, reading as empty"),
            StoreError::Malformed { .. } => {
                warn!(key, error = %err, "discarding malformed payload");
                if self.options.clear_corrupt {
                    self.remove(key);
                }
            }
            _ => error!(key, error = %err, "storage read failed, reading as empty"),
        }
    }

    /// Encode and write `value` under `key`. Failures are logged, not returned.
    pub(crate) fn save<V: Serialize + ?Sized>(&self, key: &str, value: &V) {
        let raw = match codec::encode(value) {
            Ok(raw) => raw,
            Err(err) => {
                error!(key, error = %err, "failed to encode payload, write dropped");
                return;
            }
        };
        if let Err(err) = self.storage.set_item(key, &raw) {
            Self::report_write_fault(key, &err);
        }
    }

    pub(crate) fn remove(&self, key: &str) {
        if let Err(err) = self.storage.remove_item(key) {
            Self::report_write_fault(key, &err);
        }
    }

    fn report_write_fault(key: &str, err: &StorageError) {
        match err {
            StorageError::Unavailable => debug!(key, "storage unavailable, write skipped"),
            _ => error!(key, error = %err, "storage write failed, write dropped"),
        }
    }
}

// =============================================================================
// COLLECTION
// =============================================================================

/// Typed, ordered collection of [`Record`]s under one storage key.
pub struct Collection<T> {
    store: LocalStore,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self { store: self.store.clone(), key: self.key, _marker: PhantomData }
    }
}

impl<T> fmt::Debug for Collection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Collection").field("key", &self.key).finish()
    }
}

impl<T: Entity> Collection<T> {
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    // -------------------------------------------------------------------------
    // READ
    // -------------------------------------------------------------------------

    /// All records in stored order. Empty if the key was never written.
    #[must_use]
    pub fn list(&self) -> Vec<Record<T>> {
        self.store.load(self.key).unwrap_or_default()
    }

    /// Records matching `predicate`, in stored order.
    pub fn find(&self, predicate: impl Fn(&Record<T>) -> bool) -> Vec<Record<T>> {
        self.list().into_iter().filter(|r| predicate(r)).collect()
    }

    /// First record matching `predicate`.
    pub fn find_one(&self, predicate: impl Fn(&Record<T>) -> bool) -> Option<Record<T>> {
        self.list().into_iter().find(|r| predicate(r))
    }

    #[must_use]
    pub fn get_by_id(&self, id: &str) -> Option<Record<T>> {
        self.find_one(|r| r.id() == id)
    }

    /// Like [`Collection::get_by_id`], for callers that treat absence as an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] when no record has `id`.
    pub fn require(&self, id: &str) -> Result<Record<T>, StoreError> {
        self.get_by_id(id)
            .ok_or_else(|| StoreError::NotFound { key: self.key.to_owned(), id: id.to_owned() })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.list().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list().is_empty()
    }

    // -------------------------------------------------------------------------
    // CREATE
    // -------------------------------------------------------------------------

    /// Validate `item`, assign an id and `createdAt`, append and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] if `item` fails validation.
    pub fn create(&self, item: T) -> Result<Record<T>, StoreError> {
        self.create_unique(item, |_| false)
    }

    /// [`Collection::create`] guarded by a uniqueness rule. The rule is
    /// checked against the same snapshot the new record is appended to.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Duplicate`] with the id of the first record for
    /// which `conflicts` holds, or [`StoreError::Invalid`] on validation failure.
    pub fn create_unique(&self, item: T, conflicts: impl Fn(&Record<T>) -> bool) -> Result<Record<T>, StoreError> {
        item.validate()?;

        let mut records = self.list();
        if let Some(existing) = records.iter().find(|r| conflicts(r)) {
            return Err(StoreError::Duplicate { key: self.key.to_owned(), existing_id: existing.id().to_owned() });
        }

        let now = OffsetDateTime::now_utc();
        let mut id = id::generate_id(now);
        while records.iter().any(|r| r.id() == id) {
            id = id::generate_id(now);
        }

        let record = Record::new(id, id::format_timestamp(now), item);
        records.push(record.clone());
        self.store.save(self.key, &records);
        debug!(key = self.key, id = record.id(), "record created");
        Ok(record)
    }

    // -------------------------------------------------------------------------
    // UPDATE
    // -------------------------------------------------------------------------

    /// Merge `patch` into the record with `id`. `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] if the merged record fails validation;
    /// storage is left untouched in that case.
    pub fn update(&self, id: &str, patch: T::Patch) -> Result<Option<Record<T>>, StoreError> {
        self.apply(id, true, |item| item.merge(patch))
    }

    /// Run `change` against the record with `id` and persist the result.
    /// Used for updates that depend on the current value (toggles, counters).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] if the changed record fails validation.
    pub fn modify(&self, id: &str, change: impl FnOnce(&mut T)) -> Result<Option<Record<T>>, StoreError> {
        self.apply(id, true, change)
    }

    fn apply(&self, id: &str, validate: bool, change: impl FnOnce(&mut T)) -> Result<Option<Record<T>>, StoreError> {
        let mut records = self.list();
        let Some(pos) = records.iter().position(|r| r.id() == id) else {
            debug!(key = self.key, id, "update target not found");
            return Ok(None);
        };

        let mut item = records[pos].item.clone();
        change(&mut item);
        if validate {
            item.validate()?;
        }
        records[pos].item = item;

        let updated = records[pos].clone();
        self.store.save(self.key, &records);
        debug!(key = self.key, id, "record updated");
        Ok(Some(updated))
    }

    // -------------------------------------------------------------------------
    // DELETE
    // -------------------------------------------------------------------------

    /// Remove the record with `id`. Returns whether the collection shrank.
    #[must_use = "false means no record had this id"]
    pub fn hard_delete(&self, id: &str) -> bool {
        self.remove_where(|r| r.id() == id) > 0
    }

    /// Remove every record matching `predicate`. Returns how many went.
    pub fn remove_where(&self, predicate: impl Fn(&Record<T>) -> bool) -> usize {
        let mut records = self.list();
        let before = records.len();
        records.retain(|r| !predicate(r));
        let removed = before - records.len();
        if removed > 0 {
            self.store.save(self.key, &records);
            debug!(key = self.key, removed, "records removed");
        }
        removed
    }

    /// Overwrite the whole collection.
    pub fn replace_all(&self, records: &[Record<T>]) {
        self.store.save(self.key, records);
        debug!(key = self.key, count = records.len(), "collection replaced");
    }

    /// Drop the collection key entirely.
    pub fn clear(&self) {
        self.store.remove(self.key);
        debug!(key = self.key, "collection cleared");
    }
}

impl<T: SoftDelete> Collection<T> {
    /// Mark the record inactive. Returns whether it was found.
    #[must_use = "false means no record had this id"]
    pub fn soft_delete(&self, id: &str) -> bool {
        self.set_active(id, false)
    }

    /// Undo [`Collection::soft_delete`]. Returns whether it was found.
    #[must_use = "false means no record had this id"]
    pub fn restore(&self, id: &str) -> bool {
        self.set_active(id, true)
    }

    /// Records whose active flag is set, in stored order.
    #[must_use]
    pub fn list_active(&self) -> Vec<Record<T>> {
        self.find(|r| r.is_active())
    }

    fn set_active(&self, id: &str, active: bool) -> bool {
        match self.apply(id, false, |item| item.set_active(active)) {
            Ok(found) => found.is_some(),
            Err(err) => {
                warn!(key = self.key, id, error = %err, "failed to toggle active flag");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "collection_test.rs"]
mod tests;
