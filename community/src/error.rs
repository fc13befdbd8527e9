//! Service-level errors shared by every façade.

use store::{StoreError, ValidationError};

/// Stable machine-readable code for an error, used by front ends.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("already requested to join event {event_id}")]
    DuplicateRequest { event_id: String },
    #[error("not allowed to {action}")]
    Unauthorized { action: &'static str },
    #[error("request {id} was already {status}")]
    AlreadyProcessed { id: String, status: &'static str },
    #[error("event {id} is not accepting participants ({status})")]
    EventClosed { id: String, status: &'static str },
    #[error("event {event_id} requires an approved practice request")]
    ApprovalRequired { event_id: String },
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Invalid(invalid) => Self::Invalid(invalid),
            other => Self::Store(other),
        }
    }
}

impl ServiceError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound { entity, id: id.to_owned() }
    }
}

impl ErrorCode for ServiceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "E_NOT_FOUND",
            Self::DuplicateRequest { .. } => "E_DUPLICATE_REQUEST",
            Self::Unauthorized { .. } => "E_UNAUTHORIZED",
            Self::AlreadyProcessed { .. } => "E_ALREADY_PROCESSED",
            Self::EventClosed { .. } => "E_EVENT_CLOSED",
            Self::ApprovalRequired { .. } => "E_APPROVAL_REQUIRED",
            Self::Invalid(_) => "E_INVALID",
            Self::Store(_) => "E_STORE",
        }
    }
}
