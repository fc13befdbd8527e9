//! Event comments and likes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, ValidationError};
use tracing::info;

use super::events;
use super::newest_first;
use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const COMMENTS_KEY: &str = "event_comments";

const MAX_CONTENT_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub event_id: String,
    pub content: String,
    pub likes: u32,
    #[serde(default)]
    pub liked_by: BTreeSet<String>,
    pub user_id: String,
    pub user_name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
}

impl Entity for Comment {
    type Patch = CommentPatch;

    fn merge(&mut self, patch: CommentPatch) {
        if let Some(content) = patch.content {
            self.content = content;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("content", &self.content)?;
        ValidationError::max_len("content", &self.content, MAX_CONTENT_LEN)
    }
}

impl Comment {
    #[must_use]
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.liked_by.contains(user_id)
    }
}

fn comments(state: &AppState) -> Collection<Comment> {
    state.store.collection(COMMENTS_KEY)
}

fn like_count(liked_by: &BTreeSet<String>) -> u32 {
    u32::try_from(liked_by.len()).unwrap_or(u32::MAX)
}

/// Post a comment on an event.
///
/// # Errors
///
/// Returns `NotFound` for a missing event or `Invalid` for empty/oversized content.
pub fn add_comment(state: &AppState, actor: &Actor, event_id: &str, content: &str) -> Result<Record<Comment>, ServiceError> {
    events::get_event(state, event_id)?;
    let comment = Comment {
        event_id: event_id.to_owned(),
        content: content.trim().to_owned(),
        likes: 0,
        liked_by: BTreeSet::new(),
        user_id: actor.user_id.clone(),
        user_name: actor.user_name.clone(),
    };
    let record = comments(state).create(comment)?;
    info!(comment_id = record.id(), event_id, "comment added");
    Ok(record)
}

/// Comments on an event, newest first.
#[must_use]
pub fn list_comments(state: &AppState, event_id: &str) -> Vec<Record<Comment>> {
    newest_first(comments(state).find(|c| c.event_id == event_id), Record::created_at)
}

#[must_use]
pub fn comment_count(state: &AppState, event_id: &str) -> usize {
    comments(state).find(|c| c.event_id == event_id).len()
}

/// Replace the text of the actor's own comment.
///
/// # Errors
///
/// Returns `NotFound`, `Unauthorized` for someone else's comment, or `Invalid`.
pub fn edit_comment(state: &AppState, actor: &Actor, id: &str, content: &str) -> Result<Record<Comment>, ServiceError> {
    let collection = comments(state);
    let existing = collection
        .get_by_id(id)
        .ok_or_else(|| ServiceError::not_found("comment", id))?;
    if existing.user_id != actor.user_id {
        return Err(ServiceError::Unauthorized { action: "edit this comment" });
    }
    collection
        .update(id, CommentPatch { content: Some(content.trim().to_owned()) })?
        .ok_or_else(|| ServiceError::not_found("comment", id))
}

/// Like the comment, or take the like back if the actor already liked it.
/// Two calls by the same actor restore the original state.
///
/// # Errors
///
/// Returns `NotFound` for a missing comment.
pub fn toggle_like(state: &AppState, actor: &Actor, id: &str) -> Result<Record<Comment>, ServiceError> {
    comments(state)
        .modify(id, |comment| {
            if !comment.liked_by.remove(&actor.user_id) {
                comment.liked_by.insert(actor.user_id.clone());
            }
            comment.likes = like_count(&comment.liked_by);
        })?
        .ok_or_else(|| ServiceError::not_found("comment", id))
}

/// Delete a comment. Authors may delete their own; admins any.
///
/// # Errors
///
/// Returns `NotFound` or `Unauthorized`.
pub fn delete_comment(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    let collection = comments(state);
    let existing = collection
        .get_by_id(id)
        .ok_or_else(|| ServiceError::not_found("comment", id))?;
    actor.require_owner_or_admin(&existing.user_id, "delete this comment")?;

    if !collection.hard_delete(id) {
        return Err(ServiceError::not_found("comment", id));
    }
    info!(comment_id = id, "comment deleted");
    Ok(())
}

/// Clear every like on every comment. Returns how many comments changed.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins.
pub fn reset_likes(state: &AppState, actor: &Actor) -> Result<usize, ServiceError> {
    actor.require_admin("reset comment likes")?;

    let collection = comments(state);
    let mut records = collection.list();
    let mut changed = 0;
    for record in &mut records {
        if record.likes > 0 || !record.liked_by.is_empty() {
            record.item.likes = 0;
            record.item.liked_by.clear();
            changed += 1;
        }
    }
    if changed > 0 {
        collection.replace_all(&records);
    }
    info!(changed, "comment likes reset");
    Ok(changed)
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
