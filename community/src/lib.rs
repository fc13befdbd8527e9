//! Beach-volleyball community: domain façades over the local collection store.
//!
//! ARCHITECTURE
//! ============
//! `store` owns persistence. This crate adds one service module per entity
//! (events, favorites, participation, comments, practice requests, news,
//! venues, inquiries, settings). Services are free functions over
//! [`state::AppState`]; they hold no state of their own and receive the
//! acting user as an explicit [`identity::Actor`].

pub mod config;
pub mod error;
pub mod identity;
pub mod services;
pub mod state;

pub use config::{CommunityConfig, ConfigError, StorageBackend};
pub use error::{ErrorCode, ServiceError};
pub use identity::{Actor, Role};
pub use state::AppState;
