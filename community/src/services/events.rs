//! Event service: tournaments and practice sessions.
//!
//! DESIGN
//! ======
//! User-created events live in `created_events`. A static sample catalog is
//! merged in at read time (when `AppState::seed_events` is set) and is
//! read-only: updates, cancellation and deletion only apply to created
//! events. Listings are sorted by date, soonest first.
//!
//! CAPACITY
//! ========
//! `full` is derived, never patched: while an event is open its status is
//! `full` exactly when `participants` has reached `maxParticipants`, and
//! `recruiting` otherwise. `participants` never exceeds capacity; a join
//! that would overbook fails with `EventClosed`.

use serde::{Deserialize, Serialize};
use store::{Entity, Record, ValidationError};
use time::{Date, Month};
use tracing::info;

use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const EVENTS_KEY: &str = "created_events";

const MAX_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 2000;
const SEED_ORGANIZER_ID: &str = "organizer-demo";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Tournament,
    Practice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Recruiting,
    Full,
    Closed,
    Cancelled,
}

impl EventStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recruiting => "recruiting",
            Self::Full => "full",
            Self::Closed => "closed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub name: String,
    #[serde(rename = "event_date")]
    pub event_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    pub venue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefecture: Option<String>,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub organizer_id: String,
    #[serde(default)]
    pub organizer_name: String,
    pub status: EventStatus,
    #[serde(default)]
    pub participants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub venue: Option<String>,
    pub prefecture: Option<String>,
    pub status: Option<EventStatus>,
    pub max_participants: Option<u32>,
    pub description: Option<String>,
}

impl Entity for Event {
    type Patch = EventPatch;

    fn merge(&mut self, patch: EventPatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(event_date) = patch.event_date {
            self.event_date = event_date;
        }
        if let Some(start_time) = patch.start_time {
            self.start_time = Some(start_time);
        }
        if let Some(venue) = patch.venue {
            self.venue = venue;
        }
        if let Some(prefecture) = patch.prefecture {
            self.prefecture = Some(prefecture);
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(max) = patch.max_participants {
            self.max_participants = Some(max);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        ValidationError::max_len("name", &self.name, MAX_NAME_LEN)?;
        ValidationError::require("venue", &self.venue)?;
        ValidationError::max_len("description", &self.description, MAX_DESCRIPTION_LEN)?;
        validate_date("event_date", &self.event_date)?;
        if let Some(start_time) = &self.start_time {
            validate_time("startTime", start_time)?;
        }
        match self.max_participants {
            Some(0) => Err(ValidationError::Invalid { field: "maxParticipants", reason: "must be positive".into() }),
            Some(max) if self.participants > max => Err(ValidationError::Invalid {
                field: "participants",
                reason: format!("{} exceeds capacity {max}", self.participants),
            }),
            _ => Ok(()),
        }
    }
}

/// Input for [`create_event`]. Organizer and status are filled in.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub name: String,
    pub event_date: String,
    pub start_time: Option<String>,
    pub venue: String,
    pub prefecture: Option<String>,
    pub kind: EventType,
    pub max_participants: Option<u32>,
    pub description: String,
}

/// Listing filter. Every `None` matches everything. Dates are inclusive.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub kind: Option<EventType>,
    pub organizer_id: Option<String>,
    pub status: Option<EventStatus>,
    pub from_date: Option<String>,
    pub to_date: Option<String>,
}

impl EventFilter {
    fn matches(&self, event: &Event) -> bool {
        self.kind.is_none_or(|kind| event.kind == kind)
            && self.organizer_id.as_deref().is_none_or(|id| event.organizer_id == id)
            && self.status.is_none_or(|status| event.status == status)
            && self.from_date.as_deref().is_none_or(|from| event.event_date.as_str() >= from)
            && self.to_date.as_deref().is_none_or(|to| event.event_date.as_str() <= to)
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

/// `YYYY-MM-DD` naming a real calendar day.
fn validate_date(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::Invalid { field, reason: format!("expected YYYY-MM-DD, got {value:?}") };
    let parts: Vec<&str> = value.split('-').collect();
    let [year, month, day] = parts.as_slice() else {
        return Err(invalid());
    };
    if year.len() != 4 || month.len() != 2 || day.len() != 2 {
        return Err(invalid());
    }
    let (Ok(year), Ok(month), Ok(day)) = (year.parse::<i32>(), month.parse::<u8>(), day.parse::<u8>()) else {
        return Err(invalid());
    };
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())?;
    Ok(())
}

/// `HH:MM`, 24-hour.
fn validate_time(field: &'static str, value: &str) -> Result<(), ValidationError> {
    let invalid = || ValidationError::Invalid { field, reason: format!("expected HH:MM, got {value:?}") };
    let Some((hour, minute)) = value.split_once(':') else {
        return Err(invalid());
    };
    if hour.len() != 2 || minute.len() != 2 {
        return Err(invalid());
    }
    match (hour.parse::<u8>(), minute.parse::<u8>()) {
        (Ok(h), Ok(m)) if h < 24 && m < 60 => Ok(()),
        _ => Err(invalid()),
    }
}

// =============================================================================
// SEED CATALOG
// =============================================================================

fn seed(id: &str, name: &str, date: &str, venue: &str, prefecture: &str, kind: EventType, max: u32) -> Record<Event> {
    Record::new(
        id,
        "2026-01-01T00:00:00.000Z",
        Event {
            name: name.to_owned(),
            event_date: date.to_owned(),
            start_time: Some("09:00".to_owned()),
            venue: venue.to_owned(),
            prefecture: Some(prefecture.to_owned()),
            kind,
            organizer_id: SEED_ORGANIZER_ID.to_owned(),
            organizer_name: "Beach Volley Community".to_owned(),
            status: EventStatus::Recruiting,
            participants: 0,
            max_participants: Some(max),
            description: String::new(),
        },
    )
}

/// Sample events shown alongside user-created ones.
#[must_use]
pub fn seed_events() -> Vec<Record<Event>> {
    vec![
        seed("seed-1", "湘南ビーチバレーオープン", "2026-07-18", "鵠沼海岸", "神奈川県", EventType::Tournament, 32),
        seed("seed-2", "お台場サマーカップ", "2026-08-08", "お台場海浜公園", "東京都", EventType::Tournament, 24),
        seed("seed-3", "初心者向け練習会", "2026-06-13", "鵠沼海岸", "神奈川県", EventType::Practice, 12),
        seed("seed-4", "平日夕方練習会", "2026-06-17", "須磨海岸", "兵庫県", EventType::Practice, 8),
    ]
}

// =============================================================================
// QUERIES
// =============================================================================

fn created(state: &AppState) -> store::Collection<Event> {
    state.store.collection(EVENTS_KEY)
}

/// Catalog plus created events matching `filter`, soonest first.
#[must_use]
pub fn list_events(state: &AppState, filter: &EventFilter) -> Vec<Record<Event>> {
    let mut events = if state.seed_events { seed_events() } else { Vec::new() };
    events.extend(created(state).list());
    events.retain(|e| filter.matches(e));
    events.sort_by(|a, b| {
        (a.event_date.as_str(), a.start_time.as_deref()).cmp(&(b.event_date.as_str(), b.start_time.as_deref()))
    });
    events
}

/// Look up a created or catalog event.
///
/// # Errors
///
/// Returns [`ServiceError::NotFound`] if neither source has `id`.
pub fn get_event(state: &AppState, id: &str) -> Result<Record<Event>, ServiceError> {
    if let Some(event) = created(state).get_by_id(id) {
        return Ok(event);
    }
    if state.seed_events {
        if let Some(event) = seed_events().into_iter().find(|e| e.id() == id) {
            return Ok(event);
        }
    }
    Err(ServiceError::not_found("event", id))
}

/// Look up a created event, for operations the catalog does not support.
fn get_created(state: &AppState, id: &str) -> Result<Record<Event>, ServiceError> {
    created(state)
        .get_by_id(id)
        .ok_or_else(|| ServiceError::not_found("event", id))
}

// =============================================================================
// MUTATIONS
// =============================================================================

/// Create an event hosted by `actor`.
///
/// # Errors
///
/// Returns `Unauthorized` unless the actor may organize, or `Invalid` on bad input.
pub fn create_event(state: &AppState, actor: &Actor, input: NewEvent) -> Result<Record<Event>, ServiceError> {
    actor.require_organizer("create events")?;

    let event = Event {
        name: input.name.trim().to_owned(),
        event_date: input.event_date,
        start_time: input.start_time,
        venue: input.venue.trim().to_owned(),
        prefecture: input.prefecture,
        kind: input.kind,
        organizer_id: actor.user_id.clone(),
        organizer_name: actor.user_name.clone(),
        status: EventStatus::Recruiting,
        participants: 0,
        max_participants: input.max_participants,
        description: input.description,
    };
    let record = created(state).create(event)?;
    info!(event_id = record.id(), organizer = %actor.user_id, "event created");
    Ok(record)
}

/// Update an event. Only its organizer or an admin may do this.
///
/// A status patch may close, cancel or reopen (`recruiting`) the event;
/// `full` cannot be set directly. After the merge an open event is settled
/// against its capacity, so raising `maxParticipants` reopens a full event
/// and reopening an event at capacity leaves it `full`.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized`, or `Invalid` (including a `full`
/// status patch or a capacity below the current headcount).
pub fn update_event(
    state: &AppState,
    actor: &Actor,
    id: &str,
    patch: EventPatch,
) -> Result<Record<Event>, ServiceError> {
    let event = get_created(state, id)?;
    actor.require_owner_or_admin(&event.organizer_id, "update this event")?;
    if patch.status == Some(EventStatus::Full) {
        return Err(ValidationError::Invalid { field: "status", reason: "full follows from capacity".into() }.into());
    }

    created(state)
        .modify(id, |event| {
            event.merge(patch);
            settle_status(event);
        })?
        .ok_or_else(|| ServiceError::not_found("event", id))
}

/// Mark an event cancelled. The record is kept.
///
/// # Errors
///
/// Returns `NotFound` or `Unauthorized`.
pub fn cancel_event(state: &AppState, actor: &Actor, id: &str) -> Result<Record<Event>, ServiceError> {
    let patch = EventPatch { status: Some(EventStatus::Cancelled), ..EventPatch::default() };
    let record = update_event(state, actor, id, patch)?;
    info!(event_id = id, "event cancelled");
    Ok(record)
}

/// Permanently remove a created event.
///
/// # Errors
///
/// Returns `NotFound` or `Unauthorized`.
pub fn delete_event(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    let event = get_created(state, id)?;
    actor.require_owner_or_admin(&event.organizer_id, "delete this event")?;

    if !created(state).hard_delete(id) {
        return Err(ServiceError::not_found("event", id));
    }
    info!(event_id = id, "event deleted");
    Ok(())
}

/// Shift the participant count of a created event by `delta`, floored at
/// zero, then settle `recruiting`/`full` against capacity. Catalog events
/// have no stored count and yield `None`.
///
/// # Errors
///
/// Returns `EventClosed` if the increase would take the event past its
/// capacity, or `Invalid` if the stored record no longer validates.
pub fn adjust_participants(state: &AppState, id: &str, delta: i32) -> Result<Option<Record<Event>>, ServiceError> {
    let collection = created(state);
    let Some(current) = collection.get_by_id(id) else {
        return Ok(None);
    };
    let target = current.participants.saturating_add_signed(delta);
    if delta > 0 && current.max_participants.is_some_and(|max| target > max) {
        return Err(ServiceError::EventClosed { id: id.to_owned(), status: EventStatus::Full.as_str() });
    }

    let updated = collection.modify(id, |event| {
        event.participants = target;
        settle_status(event);
    })?;
    Ok(updated)
}

/// Derive `recruiting`/`full` from the headcount. Closed and cancelled
/// events keep their status.
fn settle_status(event: &mut Event) {
    if !matches!(event.status, EventStatus::Recruiting | EventStatus::Full) {
        return;
    }
    let at_capacity = event.max_participants.is_some_and(|max| event.participants >= max);
    event.status = if at_capacity { EventStatus::Full } else { EventStatus::Recruiting };
}

/// Fail unless the event can take another participant.
pub(crate) fn ensure_open(event: &Record<Event>) -> Result<(), ServiceError> {
    match event.status {
        EventStatus::Recruiting => Ok(()),
        status => Err(ServiceError::EventClosed { id: event.id().to_owned(), status: status.as_str() }),
    }
}

#[cfg(test)]
#[path = "events_test.rs"]
mod tests;
