//! Practice participation requests.
//!
//! DESIGN
//! ======
//! A participant asks to join a practice session; the session's organizer
//! (or an admin) approves or rejects. Requests move `pending -> approved`
//! or `pending -> rejected` exactly once.
//!
//! UNIQUENESS
//! ==========
//! One live request per `(eventId, userId)`: a new request fails while an
//! earlier one is pending or approved. A rejected request does not block a
//! retry. The check runs against the same snapshot the new record is
//! appended to.
//!
//! An approved request lives exactly as long as the participation it
//! granted: leaving the session (or withdrawing the approved request)
//! removes both, freeing the spot and allowing a fresh request.

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, StoreError, ValidationError, id};
use tracing::info;

use super::events::{self, EventType};
use super::{newest_first, participation};
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const REQUESTS_KEY: &str = "practice_participation_requests";

const MAX_MESSAGE_LEN: usize = 500;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Pending and approved requests block a new one for the same pair.
    #[must_use]
    pub fn is_live(self) -> bool {
        !matches!(self, Self::Rejected)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PracticeRequest {
    pub event_id: String,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    pub organizer_id: String,
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub processed_at: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RequestPatch {
    pub status: Option<RequestStatus>,
    pub processed_at: Option<String>,
}

impl Entity for PracticeRequest {
    type Patch = RequestPatch;

    fn merge(&mut self, patch: RequestPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(processed_at) = patch.processed_at {
            self.processed_at = Some(processed_at);
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("eventId", &self.event_id)?;
        ValidationError::require("userId", &self.user_id)?;
        if let Some(message) = &self.message {
            ValidationError::max_len("message", message, MAX_MESSAGE_LEN)?;
        }
        Ok(())
    }
}

fn requests(state: &AppState) -> Collection<PracticeRequest> {
    state.store.collection(REQUESTS_KEY)
}

// =============================================================================
// REQUEST
// =============================================================================

/// Ask to join a practice session.
///
/// # Errors
///
/// Returns `NotFound` for a missing event, `Invalid` for a non-practice event
/// or the organizer's own session, `EventClosed` for a session that is not
/// recruiting, and `DuplicateRequest` while a live request exists.
pub fn request_participation(
    state: &AppState,
    actor: &Actor,
    event_id: &str,
    message: Option<String>,
) -> Result<Record<PracticeRequest>, ServiceError> {
    let event = events::get_event(state, event_id)?;
    if event.kind != EventType::Practice {
        return Err(ValidationError::Invalid { field: "eventId", reason: "not a practice session".into() }.into());
    }
    if event.organizer_id == actor.user_id {
        return Err(ValidationError::Invalid { field: "eventId", reason: "organizers cannot request their own session".into() }
            .into());
    }
    events::ensure_open(&event)?;

    let request = PracticeRequest {
        event_id: event_id.to_owned(),
        user_id: actor.user_id.clone(),
        user_name: actor.user_name.clone(),
        organizer_id: event.organizer_id.clone(),
        status: RequestStatus::Pending,
        message: message.map(|m| m.trim().to_owned()).filter(|m| !m.is_empty()),
        processed_at: None,
    };

    let live = |r: &Record<PracticeRequest>| r.event_id == event_id && r.user_id == actor.user_id && r.status.is_live();
    match requests(state).create_unique(request, live) {
        Ok(record) => {
            info!(request_id = record.id(), event_id, user_id = %actor.user_id, "practice request created");
            Ok(record)
        }
        Err(StoreError::Duplicate { .. }) => Err(ServiceError::DuplicateRequest { event_id: event_id.to_owned() }),
        Err(err) => Err(err.into()),
    }
}

/// Withdraw a pending or approved request. Only the requester may do this.
/// Withdrawing an approved request also gives up the spot it granted.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized`, or `AlreadyProcessed` for a rejected
/// request.
pub fn cancel_request(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    let collection = requests(state);
    let request = collection
        .get_by_id(id)
        .ok_or_else(|| ServiceError::not_found("practice request", id))?;
    if request.user_id != actor.user_id {
        return Err(ServiceError::Unauthorized { action: "cancel this request" });
    }
    match request.status {
        RequestStatus::Pending => {}
        RequestStatus::Approved => {
            participation::unregister(state, actor, &request.event_id)?;
        }
        RequestStatus::Rejected => {
            return Err(ServiceError::AlreadyProcessed { id: id.to_owned(), status: request.status.as_str() });
        }
    }
    if collection.get_by_id(id).is_some() && !collection.hard_delete(id) {
        return Err(ServiceError::not_found("practice request", id));
    }
    info!(request_id = id, "practice request withdrawn");
    Ok(())
}

// =============================================================================
// PROCESS
// =============================================================================

/// Approve a pending request. The requester is recorded as a participant
/// and the session's headcount goes up.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized` unless the actor organizes the session
/// or is an admin, `AlreadyProcessed`, or `EventClosed` if the session filled up.
pub fn approve(state: &AppState, actor: &Actor, id: &str) -> Result<Record<PracticeRequest>, ServiceError> {
    let request = pending_for_processing(state, actor, id)?;
    let event = events::get_event(state, &request.event_id)?;
    events::ensure_open(&event)?;

    participation::record_participation(state, &request.user_id, &event)?;
    let approved = set_status(state, id, RequestStatus::Approved)?;
    info!(request_id = id, event_id = %request.event_id, "practice request approved");
    Ok(approved)
}

/// Reject a pending request.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized`, or `AlreadyProcessed`.
pub fn reject(state: &AppState, actor: &Actor, id: &str) -> Result<Record<PracticeRequest>, ServiceError> {
    pending_for_processing(state, actor, id)?;
    let rejected = set_status(state, id, RequestStatus::Rejected)?;
    info!(request_id = id, "practice request rejected");
    Ok(rejected)
}

/// Drop `user_id`'s approved requests for `event_id`. Called when the
/// participation they granted goes away. Returns how many were removed.
pub(crate) fn withdraw_approved(state: &AppState, user_id: &str, event_id: &str) -> usize {
    let removed = requests(state)
        .remove_where(|r| r.user_id == user_id && r.event_id == event_id && r.status == RequestStatus::Approved);
    if removed > 0 {
        info!(user_id, event_id, removed, "approved practice request withdrawn");
    }
    removed
}

fn pending_for_processing(state: &AppState, actor: &Actor, id: &str) -> Result<Record<PracticeRequest>, ServiceError> {
    let request = requests(state)
        .get_by_id(id)
        .ok_or_else(|| ServiceError::not_found("practice request", id))?;
    actor.require_owner_or_admin(&request.organizer_id, "process this request")?;
    if request.status != RequestStatus::Pending {
        return Err(ServiceError::AlreadyProcessed { id: id.to_owned(), status: request.status.as_str() });
    }
    Ok(request)
}

fn set_status(state: &AppState, id: &str, status: RequestStatus) -> Result<Record<PracticeRequest>, ServiceError> {
    let patch = RequestPatch { status: Some(status), processed_at: Some(id::now_timestamp()) };
    requests(state)
        .update(id, patch)?
        .ok_or_else(|| ServiceError::not_found("practice request", id))
}

// =============================================================================
// QUERIES
// =============================================================================

/// Pending requests for sessions the actor organizes, oldest first.
#[must_use]
pub fn pending_for_organizer(state: &AppState, actor: &Actor) -> Vec<Record<PracticeRequest>> {
    requests(state).find(|r| r.organizer_id == actor.user_id && r.status == RequestStatus::Pending)
}

/// Every request for one session, oldest first.
///
/// # Errors
///
/// Returns `NotFound` for a missing event or `Unauthorized` unless the actor
/// organizes it or is an admin.
pub fn requests_for_event(
    state: &AppState,
    actor: &Actor,
    event_id: &str,
) -> Result<Vec<Record<PracticeRequest>>, ServiceError> {
    let event = events::get_event(state, event_id)?;
    actor.require_owner_or_admin(&event.organizer_id, "view requests for this session")?;
    Ok(requests(state).find(|r| r.event_id == event_id))
}

/// The actor's own requests, newest first.
#[must_use]
pub fn requests_for_user(state: &AppState, actor: &Actor) -> Vec<Record<PracticeRequest>> {
    newest_first(requests(state).find(|r| r.user_id == actor.user_id), Record::created_at)
}

/// Status of the actor's most recent request for `event_id`, if any.
#[must_use]
pub fn request_status(state: &AppState, actor: &Actor, event_id: &str) -> Option<RequestStatus> {
    requests(state)
        .find(|r| r.user_id == actor.user_id && r.event_id == event_id)
        .last()
        .map(|r| r.status)
}

#[cfg(test)]
#[path = "practice_requests_test.rs"]
mod tests;
