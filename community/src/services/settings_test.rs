use super::*;
use crate::state::test_helpers::test_state;

#[test]
fn defaults_when_never_written() {
    let state = test_state();
    let privacy = privacy_settings(&state);
    assert_eq!(privacy.profile_visibility, ProfileVisibility::Public);
    assert!(!privacy.show_email);
    assert!(privacy.show_participation_history);

    let notifications = notification_settings(&state);
    assert!(notifications.event_reminders);
    assert!(notifications.practice_requests);
    assert!(!notifications.marketing);
}

#[test]
fn update_privacy_keeps_untouched_fields() {
    let state = test_state();
    let updated = update_privacy(
        &state,
        PrivacyPatch { profile_visibility: Some(ProfileVisibility::Private), ..PrivacyPatch::default() },
    );
    assert_eq!(updated.profile_visibility, ProfileVisibility::Private);
    assert!(updated.allow_messages);

    let again = update_privacy(&state, PrivacyPatch { show_email: Some(true), ..PrivacyPatch::default() });
    assert_eq!(again.profile_visibility, ProfileVisibility::Private);
    assert!(again.show_email);
    assert_eq!(privacy_settings(&state), again);
}

#[test]
fn update_notifications_persists() {
    let state = test_state();
    let patch = NotificationPatch { marketing: Some(true), news_updates: Some(false), ..NotificationPatch::default() };
    let updated = update_notifications(&state, patch);
    assert!(updated.marketing);
    assert!(!updated.news_updates);
    assert!(updated.new_events);
    assert_eq!(notification_settings(&state), updated);
}

#[test]
fn stored_document_uses_camel_case_and_fills_missing_fields() {
    let state = test_state();
    update_privacy(&state, PrivacyPatch { allow_messages: Some(false), ..PrivacyPatch::default() });
    let raw = state.store.raw(PRIVACY_KEY).unwrap();
    assert!(raw.contains("\"profileVisibility\":\"public\""));
    assert!(raw.contains("\"allowMessages\":false"));

    let partial: PrivacySettings = serde_json::from_str(r#"{"showEmail":true}"#).unwrap();
    assert!(partial.show_email);
    assert!(partial.show_participation_history);
}
