//! Event participation, per user.
//!
//! DESIGN
//! ======
//! Tournaments are joined directly with [`register`]. Practice sessions are
//! joined through an approved practice request; approval calls
//! [`record_participation`] on the requester's behalf. Both paths keep the
//! event's participant count in step with the entries stored here.

use std::convert::Infallible;

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, StoreError, id};
use tracing::info;

use super::events::{self, Event, EventType};
use super::practice_requests;
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const PARTICIPATION_KEY: &str = "participating_events";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participation {
    pub user_id: String,
    pub event_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: EventType,
    #[serde(rename = "event_date")]
    pub event_date: String,
    pub venue: String,
    pub registered_at: String,
}

impl Entity for Participation {
    type Patch = Infallible;

    fn merge(&mut self, patch: Infallible) {
        match patch {}
    }
}

fn entries(state: &AppState) -> Collection<Participation> {
    state.store.collection(PARTICIPATION_KEY)
}

/// Join a tournament. Registering twice returns the existing entry.
///
/// # Errors
///
/// Returns `NotFound`, `ApprovalRequired` for practice sessions, or
/// `EventClosed` when the event is full, closed or cancelled.
pub fn register(state: &AppState, actor: &Actor, event_id: &str) -> Result<Record<Participation>, ServiceError> {
    let event = events::get_event(state, event_id)?;
    if event.kind == EventType::Practice {
        return Err(ServiceError::ApprovalRequired { event_id: event_id.to_owned() });
    }
    if let Some(existing) = find_entry(state, &actor.user_id, event_id) {
        return Ok(existing);
    }
    events::ensure_open(&event)?;
    record_participation(state, &actor.user_id, &event)
}

/// Bump the event headcount and store a participation entry for `user_id`.
/// Idempotent: an existing entry is returned unchanged. The headcount is
/// taken first so a full event leaves no entry behind.
///
/// # Errors
///
/// Returns `EventClosed` if the event is at capacity, or `Invalid` if the
/// event record no longer validates.
pub fn record_participation(
    state: &AppState,
    user_id: &str,
    event: &Record<Event>,
) -> Result<Record<Participation>, ServiceError> {
    if let Some(existing) = find_entry(state, user_id, event.id()) {
        return Ok(existing);
    }
    events::adjust_participants(state, event.id(), 1)?;

    let entry = Participation {
        user_id: user_id.to_owned(),
        event_id: event.id().to_owned(),
        name: event.name.clone(),
        kind: event.kind,
        event_date: event.event_date.clone(),
        venue: event.venue.clone(),
        registered_at: id::now_timestamp(),
    };

    let collection = entries(state);
    match collection.create_unique(entry, |p| p.user_id == user_id && p.event_id == event.id()) {
        Ok(record) => {
            info!(user_id, event_id = event.id(), "participation recorded");
            Ok(record)
        }
        Err(err) => {
            events::adjust_participants(state, event.id(), -1)?;
            match err {
                StoreError::Duplicate { existing_id, .. } => collection.require(&existing_id).map_err(ServiceError::from),
                other => Err(other.into()),
            }
        }
    }
}

/// Leave an event. Returns whether the actor was registered.
///
/// Leaving a practice session also withdraws the approved request that
/// admitted the actor, so they can ask to join again later.
///
/// # Errors
///
/// Returns `Invalid` if the event record no longer validates.
pub fn unregister(state: &AppState, actor: &Actor, event_id: &str) -> Result<bool, ServiceError> {
    let removed = entries(state).remove_where(|p| p.user_id == actor.user_id && p.event_id == event_id);
    if removed == 0 {
        return Ok(false);
    }
    events::adjust_participants(state, event_id, -1)?;
    practice_requests::withdraw_approved(state, &actor.user_id, event_id);
    info!(user_id = %actor.user_id, event_id, "participation cancelled");
    Ok(true)
}

fn find_entry(state: &AppState, user_id: &str, event_id: &str) -> Option<Record<Participation>> {
    entries(state).find_one(|p| p.user_id == user_id && p.event_id == event_id)
}

#[must_use]
pub fn is_registered(state: &AppState, actor: &Actor, event_id: &str) -> bool {
    find_entry(state, &actor.user_id, event_id).is_some()
}

/// The actor's events, soonest first.
#[must_use]
pub fn list_participating(state: &AppState, actor: &Actor) -> Vec<Record<Participation>> {
    let mut mine = entries(state).find(|p| p.user_id == actor.user_id);
    mine.sort_by(|a, b| a.event_date.cmp(&b.event_date));
    mine
}

#[cfg(test)]
#[path = "participation_test.rs"]
mod tests;
