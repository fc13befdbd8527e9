//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is what every service function receives. It holds the store
//! handle and the few switches that change façade behavior. Cloning is
//! cheap: the store is an `Arc` around its backend.

use store::LocalStore;

use crate::config::{CommunityConfig, ConfigError};

#[derive(Debug, Clone)]
pub struct AppState {
    pub store: LocalStore,
    /// Merge the static sample catalog into event listings.
    pub seed_events: bool,
}

impl AppState {
    #[must_use]
    pub fn new(store: LocalStore, seed_events: bool) -> Self {
        Self { store, seed_events }
    }

    /// Open the configured backend and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] if the backend cannot be opened.
    pub fn from_config(config: &CommunityConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.open_store()?, config.seed_events))
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
