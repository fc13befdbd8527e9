//! Community configuration parsed from environment variables.

use std::path::PathBuf;
use std::sync::Arc;

use store::{FileStorage, LocalStore, MemoryStorage, StorageError, StoreOptions};

pub const DEFAULT_DATA_DIR: &str = "./data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown VB_STORAGE: {0} (expected 'file' or 'memory')")]
    UnknownBackend(String),
    #[error("invalid boolean for {var}: {value}")]
    InvalidBool { var: &'static str, value: String },
    #[error("failed to open data directory: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommunityConfig {
    pub backend: StorageBackend,
    pub data_dir: PathBuf,
    pub clear_corrupt: bool,
    pub seed_events: bool,
}

impl Default for CommunityConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            clear_corrupt: true,
            seed_events: true,
        }
    }
}

impl CommunityConfig {
    /// Build typed config from environment variables.
    ///
    /// Optional:
    /// - `VB_STORAGE`: `file` (default) or `memory`
    /// - `VB_DATA_DIR`: directory for the file backend, default `./data`
    /// - `VB_CLEAR_CORRUPT`: drop keys holding malformed JSON, default `true`
    /// - `VB_SEED_EVENTS`: merge the sample event catalog into listings, default `true`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for unrecognized backend or boolean values.
    pub fn from_env() -> Result<Self, ConfigError> {
        let backend = parse_backend(std::env::var("VB_STORAGE").ok().as_deref())?;
        let data_dir = std::env::var("VB_DATA_DIR").map_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR), PathBuf::from);
        let clear_corrupt = parse_bool("VB_CLEAR_CORRUPT", std::env::var("VB_CLEAR_CORRUPT").ok().as_deref(), true)?;
        let seed_events = parse_bool("VB_SEED_EVENTS", std::env::var("VB_SEED_EVENTS").ok().as_deref(), true)?;

        Ok(Self { backend, data_dir, clear_corrupt, seed_events })
    }

    /// Open the configured storage backend.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Storage`] if the data directory cannot be created.
    pub fn open_store(&self) -> Result<LocalStore, ConfigError> {
        let options = StoreOptions { clear_corrupt: self.clear_corrupt };
        let store = match self.backend {
            StorageBackend::File => LocalStore::with_options(Arc::new(FileStorage::open(&self.data_dir)?), options),
            StorageBackend::Memory => LocalStore::with_options(Arc::new(MemoryStorage::new()), options),
        };
        Ok(store)
    }
}

fn parse_backend(raw: Option<&str>) -> Result<StorageBackend, ConfigError> {
    match raw.unwrap_or("file") {
        "file" => Ok(StorageBackend::File),
        "memory" => Ok(StorageBackend::Memory),
        other => Err(ConfigError::UnknownBackend(other.to_owned())),
    }
}

fn parse_bool(var: &'static str, raw: Option<&str>, default: bool) -> Result<bool, ConfigError> {
    let Some(raw) = raw else {
        return Ok(default);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool { var, value: raw.to_owned() }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
