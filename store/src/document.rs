//! Single-object storage for id-less values such as per-user settings.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::collection::LocalStore;

pub struct Document<T> {
    store: LocalStore,
    key: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> fmt::Debug for Document<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document").field("key", &self.key).finish()
    }
}

impl<T: Serialize + DeserializeOwned> Document<T> {
    pub(crate) fn new(store: LocalStore, key: &'static str) -> Self {
        Self { store, key, _marker: PhantomData }
    }

    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Stored value, or `None` if never written or unreadable.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.store.load(self.key)
    }

    pub fn set(&self, value: &T) {
        self.store.save(self.key, value);
        debug!(key = self.key, "document written");
    }

    pub fn clear(&self) {
        self.store.remove(self.key);
    }
}

impl<T: Serialize + DeserializeOwned + Default> Document<T> {
    #[must_use]
    pub fn get_or_default(&self) -> T {
        self.get().unwrap_or_default()
    }
}
