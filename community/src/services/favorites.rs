//! Favorite events, per user.
//!
//! A favorite snapshots the event's display fields so the list renders
//! without resolving each event. Favoriting twice is a no-op.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, StoreError, id};
use tracing::info;

use super::events::{self, EventType};
use super::newest_first;
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const FAVORITES_KEY: &str = "favorite_events";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub user_id: String,
    pub event_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(rename = "event_date")]
    pub event_date: String,
    pub venue: String,
    pub favorited_at: String,
}

impl Entity for Favorite {
    type Patch = Infallible;

    fn merge(&mut self, patch: Infallible) {
        match patch {}
    }
}

fn favorites(state: &AppState) -> Collection<Favorite> {
    state.store.collection(FAVORITES_KEY)
}

/// Favorite an event. Returns the existing entry if already favorited.
///
/// # Errors
///
/// Returns `NotFound` if the event does not exist.
pub fn add_favorite(state: &AppState, actor: &Actor, event_id: &str) -> Result<Record<Favorite>, ServiceError> {
    let event = events::get_event(state, event_id)?;
    let favorite = Favorite {
        user_id: actor.user_id.clone(),
        event_id: event.id().to_owned(),
        name: event.name.clone(),
        kind: event.kind,
        event_date: event.event_date.clone(),
        venue: event.venue.clone(),
        favorited_at: id::now_timestamp(),
    };

    let collection = favorites(state);
    match collection.create_unique(favorite, |f| f.user_id == actor.user_id && f.event_id == event_id) {
        Ok(record) => {
            info!(user_id = %actor.user_id, event_id, "event favorited");
            Ok(record)
        }
        Err(StoreError::Duplicate { existing_id, .. }) => {
            collection.require(&existing_id).map_err(ServiceError::from)
        }
        Err(err) => Err(err.into()),
    }
}

/// Remove a favorite. Returns whether one existed.
pub fn remove_favorite(state: &AppState, actor: &Actor, event_id: &str) -> bool {
    favorites(state).remove_where(|f| f.user_id == actor.user_id && f.event_id == event_id) > 0
}

/// Flip the favorite state. Returns `true` when the event is now a favorite.
///
/// # Errors
///
/// Returns `NotFound` if adding a favorite for a missing event.
pub fn toggle_favorite(state: &AppState, actor: &Actor, event_id: &str) -> Result<bool, ServiceError> {
    if remove_favorite(state, actor, event_id) {
        return Ok(false);
    }
    add_favorite(state, actor, event_id)?;
    Ok(true)
}

#[must_use]
pub fn is_favorite(state: &AppState, actor: &Actor, event_id: &str) -> bool {
    favorites(state)
        .find_one(|f| f.user_id == actor.user_id && f.event_id == event_id)
        .is_some()
}

/// The actor's favorites, most recently favorited first.
#[must_use]
pub fn list_favorites(state: &AppState, actor: &Actor) -> Vec<Record<Favorite>> {
    let mine = favorites(state).find(|f| f.user_id == actor.user_id);
    newest_first(mine, |f| f.favorited_at.as_str())
}

#[cfg(test)]
#[path = "favorites_test.rs"]
mod tests;
