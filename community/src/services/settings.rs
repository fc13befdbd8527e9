//! Privacy and notification preferences.
//!
//! Each is a single id-less document. Reading one that was never written,
//! or that is unreadable, yields the defaults.

use serde::{Deserialize, Serialize};
use store::Document;
use tracing::info;

use crate::state::AppState;

pub const PRIVACY_KEY: &str = "privacy_settings";
pub const NOTIFICATIONS_KEY: &str = "notification_settings";

// =============================================================================
// PRIVACY
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileVisibility {
    #[default]
    Public,
    Participants,
    Private,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PrivacySettings {
    pub profile_visibility: ProfileVisibility,
    pub show_email: bool,
    pub show_participation_history: bool,
    pub allow_messages: bool,
}

impl Default for PrivacySettings {
    fn default() -> Self {
        Self {
            profile_visibility: ProfileVisibility::Public,
            show_email: false,
            show_participation_history: true,
            allow_messages: true,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PrivacyPatch {
    pub profile_visibility: Option<ProfileVisibility>,
    pub show_email: Option<bool>,
    pub show_participation_history: Option<bool>,
    pub allow_messages: Option<bool>,
}

fn privacy(state: &AppState) -> Document<PrivacySettings> {
    state.store.document(PRIVACY_KEY)
}

#[must_use]
pub fn privacy_settings(state: &AppState) -> PrivacySettings {
    privacy(state).get_or_default()
}

/// Merge `patch` into the stored privacy settings and return the result.
pub fn update_privacy(state: &AppState, patch: PrivacyPatch) -> PrivacySettings {
    let document = privacy(state);
    let mut settings = document.get_or_default();
    if let Some(visibility) = patch.profile_visibility {
        settings.profile_visibility = visibility;
    }
    if let Some(show) = patch.show_email {
        settings.show_email = show;
    }
    if let Some(show) = patch.show_participation_history {
        settings.show_participation_history = show;
    }
    if let Some(allow) = patch.allow_messages {
        settings.allow_messages = allow;
    }
    document.set(&settings);
    info!(visibility = ?settings.profile_visibility, "privacy settings updated");
    settings
}

// =============================================================================
// NOTIFICATIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationSettings {
    pub event_reminders: bool,
    pub new_events: bool,
    pub comment_replies: bool,
    pub practice_requests: bool,
    pub news_updates: bool,
    pub email_notifications: bool,
    pub marketing: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            event_reminders: true,
            new_events: true,
            comment_replies: true,
            practice_requests: true,
            news_updates: true,
            email_notifications: true,
            marketing: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationPatch {
    pub event_reminders: Option<bool>,
    pub new_events: Option<bool>,
    pub comment_replies: Option<bool>,
    pub practice_requests: Option<bool>,
    pub news_updates: Option<bool>,
    pub email_notifications: Option<bool>,
    pub marketing: Option<bool>,
}

fn notifications(state: &AppState) -> Document<NotificationSettings> {
    state.store.document(NOTIFICATIONS_KEY)
}

#[must_use]
pub fn notification_settings(state: &AppState) -> NotificationSettings {
    notifications(state).get_or_default()
}

/// Merge `patch` into the stored notification settings and return the result.
pub fn update_notifications(state: &AppState, patch: NotificationPatch) -> NotificationSettings {
    let document = notifications(state);
    let mut settings = document.get_or_default();
    let fields = [
        (patch.event_reminders, &mut settings.event_reminders),
        (patch.new_events, &mut settings.new_events),
        (patch.comment_replies, &mut settings.comment_replies),
        (patch.practice_requests, &mut settings.practice_requests),
        (patch.news_updates, &mut settings.news_updates),
        (patch.email_notifications, &mut settings.email_notifications),
        (patch.marketing, &mut settings.marketing),
    ];
    for (value, slot) in fields {
        if let Some(value) = value {
            *slot = value;
        }
    }
    document.set(&settings);
    info!("notification settings updated");
    settings
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
