//! Local collection store: typed CRUD over named, persisted record lists.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every community feature (events, venues, favorites, comments, requests,
//! news, inquiries) keeps its data as one serialized JSON array under a
//! string key, the way a browser `localStorage` would. This crate owns that
//! layout so feature code only ever sees typed [`Record`]s.
//!
//! DESIGN
//! ======
//! - [`Storage`] is the string key/value surface (memory, file, unavailable).
//! - [`codec`] turns record lists into JSON and back.
//! - [`Collection`] performs full read-modify-write cycles per mutation.
//! - [`Document`] stores a single id-less object (settings).
//!
//! ERROR HANDLING
//! ==============
//! Reads fail closed: unreadable or malformed storage yields an empty
//! collection and a log line, never an error. Only business-rule failures
//! (validation, façade-supplied uniqueness conflicts) reach the caller.

pub mod backend;
pub mod codec;
pub mod collection;
pub mod document;
pub mod entity;
pub mod error;
pub mod id;

pub use backend::{FileStorage, MemoryStorage, Storage, StorageError, UnavailableStorage};
pub use codec::CodecError;
pub use collection::{Collection, LocalStore, StoreOptions};
pub use document::Document;
pub use entity::{Entity, Record, SoftDelete};
pub use error::{StoreError, ValidationError};
