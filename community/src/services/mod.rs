//! Domain façades over the local collection store.
//!
//! ARCHITECTURE
//! ============
//! One module per persisted collection. Each module owns its storage key,
//! its entity and patch types, and the authorization and ordering rules
//! for that entity. Modules call each other only through public functions
//! (practice-request approval adjusts event headcounts and records the
//! participation, for example).

pub mod comments;
pub mod events;
pub mod favorites;
pub mod inquiries;
pub mod news;
pub mod participation;
pub mod practice_requests;
pub mod settings;
pub mod venues;

/// Sort newest-first by `key`, keeping later-stored records first on ties.
pub(crate) fn newest_first<T>(mut items: Vec<T>, key: impl Fn(&T) -> &str) -> Vec<T> {
    items.reverse();
    items.sort_by(|a, b| key(b).cmp(key(a)));
    items
}
