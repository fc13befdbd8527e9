//! Venue registry.
//!
//! Venues are never hard-deleted: deactivation hides them from the public
//! listing and reactivation brings them back with their history intact.

use serde::{Deserialize, Serialize};
use store::{Collection, Entity, Record, SoftDelete, ValidationError, id};
use tracing::info;

use crate::error::ServiceError;
use crate::identity::Actor;
use crate::state::AppState;

pub const VENUES_KEY: &str = "venues";

const MAX_NAME_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Venue {
    pub name: String,
    pub address: String,
    pub prefecture: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub court_count: u32,
    #[serde(default = "active")]
    pub is_active: bool,
    #[serde(default)]
    pub updated_at: Option<String>,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, Default)]
pub struct VenuePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub prefecture: Option<String>,
    pub description: Option<String>,
    pub court_count: Option<u32>,
}

/// Input for [`create_venue`].
#[derive(Debug, Clone)]
pub struct NewVenue {
    pub name: String,
    pub address: String,
    pub prefecture: String,
    pub description: String,
    pub court_count: u32,
}

impl Entity for Venue {
    type Patch = VenuePatch;

    fn merge(&mut self, patch: VenuePatch) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(address) = patch.address {
            self.address = address;
        }
        if let Some(prefecture) = patch.prefecture {
            self.prefecture = prefecture;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(court_count) = patch.court_count {
            self.court_count = court_count;
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require("name", &self.name)?;
        ValidationError::max_len("name", &self.name, MAX_NAME_LEN)?;
        ValidationError::require("address", &self.address)?;
        ValidationError::require("prefecture", &self.prefecture)
    }
}

impl SoftDelete for Venue {
    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
        self.updated_at = Some(id::now_timestamp());
    }
}

fn venues(state: &AppState) -> Collection<Venue> {
    state.store.collection(VENUES_KEY)
}

/// # Errors
///
/// Returns `Unauthorized` for non-admins or `Invalid` on bad input.
pub fn create_venue(state: &AppState, actor: &Actor, input: NewVenue) -> Result<Record<Venue>, ServiceError> {
    actor.require_admin("create venues")?;
    let venue = Venue {
        name: input.name.trim().to_owned(),
        address: input.address.trim().to_owned(),
        prefecture: input.prefecture.trim().to_owned(),
        description: input.description,
        court_count: input.court_count,
        is_active: true,
        updated_at: None,
    };
    let record = venues(state).create(venue)?;
    info!(venue_id = record.id(), name = %record.name, "venue created");
    Ok(record)
}

/// # Errors
///
/// Returns `Unauthorized`, `NotFound`, or `Invalid`.
pub fn update_venue(state: &AppState, actor: &Actor, id: &str, patch: VenuePatch) -> Result<Record<Venue>, ServiceError> {
    actor.require_admin("update venues")?;
    let now = id::now_timestamp();
    venues(state)
        .modify(id, |venue| {
            venue.merge(patch);
            venue.updated_at = Some(now);
        })?
        .ok_or_else(|| ServiceError::not_found("venue", id))
}

/// Hide a venue from the public listing.
///
/// # Errors
///
/// Returns `Unauthorized` or `NotFound`.
pub fn deactivate_venue(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    actor.require_admin("deactivate venues")?;
    if !venues(state).soft_delete(id) {
        return Err(ServiceError::not_found("venue", id));
    }
    info!(venue_id = id, "venue deactivated");
    Ok(())
}

/// # Errors
///
/// Returns `Unauthorized` or `NotFound`.
pub fn reactivate_venue(state: &AppState, actor: &Actor, id: &str) -> Result<(), ServiceError> {
    actor.require_admin("reactivate venues")?;
    if !venues(state).restore(id) {
        return Err(ServiceError::not_found("venue", id));
    }
    info!(venue_id = id, "venue reactivated");
    Ok(())
}

/// Active venues, optionally in one prefecture, sorted by name.
#[must_use]
pub fn list_active_venues(state: &AppState, prefecture: Option<&str>) -> Vec<Record<Venue>> {
    let mut active = venues(state).list_active();
    if let Some(prefecture) = prefecture {
        active.retain(|v| v.prefecture == prefecture);
    }
    active.sort_by(|a, b| a.name.cmp(&b.name));
    active
}

/// Every venue including inactive ones, in stored order.
///
/// # Errors
///
/// Returns `Unauthorized` for non-admins.
pub fn list_all_venues(state: &AppState, actor: &Actor) -> Result<Vec<Record<Venue>>, ServiceError> {
    actor.require_admin("list all venues")?;
    Ok(venues(state).list())
}

/// # Errors
///
/// Returns `NotFound` for a missing venue.
pub fn get_venue(state: &AppState, id: &str) -> Result<Record<Venue>, ServiceError> {
    venues(state).get_by_id(id).ok_or_else(|| ServiceError::not_found("venue", id))
}

#[cfg(test)]
#[path = "venues_test.rs"]
mod tests;
