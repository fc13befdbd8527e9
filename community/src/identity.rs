//! Resolved identity of the user performing an operation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Authentication lives outside this crate. Whatever front end resolves the
//! session hands an [`Actor`] to each service call; nothing here reads a
//! "current user" from storage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Participant,
    Organizer,
    Admin,
    SuperAdmin,
}

impl Role {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Participant => "participant",
            Self::Organizer => "organizer",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Organizers and every admin tier may host events.
    #[must_use]
    pub fn can_organize(self) -> bool {
        matches!(self, Self::Organizer | Self::Admin | Self::SuperAdmin)
    }

    #[must_use]
    pub fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "participant" => Ok(Self::Participant),
            "organizer" => Ok(Self::Organizer),
            "admin" => Ok(Self::Admin),
            "super_admin" | "superadmin" => Ok(Self::SuperAdmin),
            _ => Err(UnknownRole(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub user_id: String,
    pub user_name: String,
    pub email: Option<String>,
    pub role: Role,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, role: Role) -> Self {
        Self { user_id: user_id.into(), user_name: user_name.into(), email: None, role }
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Fail unless the actor may host events.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] naming `action`.
    pub fn require_organizer(&self, action: &'static str) -> Result<(), ServiceError> {
        if self.role.can_organize() {
            return Ok(());
        }
        Err(ServiceError::Unauthorized { action })
    }

    /// Fail unless the actor is an admin or super-admin.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] naming `action`.
    pub fn require_admin(&self, action: &'static str) -> Result<(), ServiceError> {
        if self.role.is_admin() {
            return Ok(());
        }
        Err(ServiceError::Unauthorized { action })
    }

    /// Fail unless the actor is `owner_id` or an admin.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unauthorized`] naming `action`.
    pub fn require_owner_or_admin(&self, owner_id: &str, action: &'static str) -> Result<(), ServiceError> {
        if self.user_id == owner_id || self.role.is_admin() {
            return Ok(());
        }
        Err(ServiceError::Unauthorized { action })
    }
}

#[cfg(test)]
#[path = "identity_test.rs"]
mod tests;
