//! Contact form inquiries addressed to the admins.

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, ValidationError};
use tracing::info;

use super::newest_first;
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const INQUIRIES_KEY: &str = "admin_inquiries";

const MAX_SUBJECT_LEN: usize = 200;
const MAX_MESSAGE_LEN: usize = 5000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    Unread,
    Read,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub user_id: String,
    #[serde(default)]
    pub user_email: String,
    #[serde(default)]
    pub user_name: String,
    pub subject: String,
    pub message: String,
    pub status: InquiryStatus,
}

#[derive(Debug, Clone, Default)]
pub struct InquiryPatch {
    pub status: Option<InquiryStatus>,
}

impl Entity for Inquiry {
    type Patch = InquiryPatch;

    fn merge(&mut self, patch: InquiryPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("subject", &self.subject)?;
        ValidationError::max_len("subject", &self.subject, MAX_SUBJECT_LEN)?;
        ValidationError::require("message", &self.message)?;
        ValidationError::max_len("message", &self.message, MAX_MESSAGE_LEN)
    }
}

fn inquiries(state: &AppState) -> Collection<Inquiry> {
    state.store.collection(INQUIRIES_KEY)
}

/// Send an inquiry. Any actor may do this.
///
/// # Errors
///
/// Returns `Invalid` for a blank or oversized subject or message.
pub fn submit_inquiry(state: &AppState, actor: &Actor, subject: &str, message: &str) -> Result<Record<Inquiry>, ServiceError> {
    let inquiry = Inquiry {
        user_id: actor.user_id.clone(),
        user_email: actor.email.clone().unwrap_or_default(),
        user_name: actor.user_name.clone(),
        subject: subject.trim().to_owned(),
        message: message.trim().to_owned(),
        status: InquiryStatus::Unread,
    };
    let record = inquiries(state).create(inquiry)?;
    info!(inquiry_id = record.id(), user_id = %actor.user_id, "inquiry submitted");
    Ok(record)
}

/// Inquiries newest first, optionally only those with `status`.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins.
pub fn list_inquiries(
    state: &AppState,
    actor: &Actor,
    status: Option<InquiryStatus>,
) -> Result<Vec<Record<Inquiry>>, ServiceError> {
    actor.require_admin("read inquiries")?;
    let matching = inquiries(state).find(|i| status.is_none_or(|s| i.status == s));
    Ok(newest_first(matching, Record::created_at))
}

/// # Errors
///
/// Returns `Unauthorized` or `NotFound`.
pub fn mark_read(state: &AppState, actor: &Actor, id: &str) -> Result<Record<Inquiry>, ServiceError> {
    actor.require_admin("update inquiries")?;
    inquiries(state)
        .update(id, InquiryPatch { status: Some(InquiryStatus::Read) })?
        .ok_or_else(|| ServiceError::not_found("inquiry", id))
}

/// # Errors
///
/// Returns `Unauthorized` for non-admins.
pub fn unread_count(state: &AppState, actor: &Actor) -> Result<usize, ServiceError> {
    actor.require_admin("read inquiries")?;
    Ok(inquiries(state).find(|i| i.status == InquiryStatus::Unread).len())
}

/// # Errors
///
/// Returns `Unauthorized` or `NotFound`.
pub fn delete_inquiry(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    actor.require_admin("delete inquiries")?;
    if !inquiries(state).hard_delete(id) {
        return Err(ServiceError::not_found("inquiry", id));
    }
    info!(inquiry_id = id, "inquiry deleted");
    Ok(())
}

#[cfg(test)]
#[path = "inquiries_test.rs"]
mod tests;
