use super::*;
use crate::error::ErrorCode;
use crate::services::events::{EventStatus, cancel_event, create_event};
use crate::state::test_helpers::{admin, new_event, organizer, participant, test_state, test_state_with_seed};

fn practice(state: &AppState, host: &Actor) -> Record<events::Event> {
    create_event(state, host, new_event("朝練", "2026-06-20", EventType::Practice)).unwrap()
}

#[test]
fn request_copies_organizer_and_starts_pending() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");

    let request = request_participation(&state, &me, event.id(), Some("  初参加です  ".into())).unwrap();
    assert_eq!(request.organizer_id, "o1");
    assert_eq!(request.user_name, "player p1");
    assert_eq!(request.status, RequestStatus::Pending);
    assert_eq!(request.message.as_deref(), Some("初参加です"));
    assert_eq!(request.processed_at, None);
    assert_eq!(request_status(&state, &me, event.id()), Some(RequestStatus::Pending));
    assert_eq!(pending_for_organizer(&state, &host), vec![request]);
}

#[test]
fn second_request_is_a_duplicate_while_pending_or_approved() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");

    let first = request_participation(&state, &me, event.id(), None).unwrap();
    let err = request_participation(&state, &me, event.id(), None).unwrap_err();
    assert_eq!(err.error_code(), "E_DUPLICATE_REQUEST");

    approve(&state, &host, first.id()).unwrap();
    let err = request_participation(&state, &me, event.id(), None).unwrap_err();
    assert!(matches!(err, ServiceError::DuplicateRequest { .. }));
}

#[test]
fn rejected_request_allows_a_retry() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");

    let first = request_participation(&state, &me, event.id(), None).unwrap();
    let rejected = reject(&state, &host, first.id()).unwrap();
    assert_eq!(rejected.status, RequestStatus::Rejected);
    assert!(rejected.processed_at.is_some());

    let retry = request_participation(&state, &me, event.id(), None).unwrap();
    assert_ne!(retry.id(), first.id());
    assert_eq!(request_status(&state, &me, event.id()), Some(RequestStatus::Pending));
    assert_eq!(requests_for_user(&state, &me).len(), 2);
}

#[test]
fn approval_registers_the_requester() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");
    let request = request_participation(&state, &me, event.id(), None).unwrap();

    let approved = approve(&state, &host, request.id()).unwrap();
    assert_eq!(approved.status, RequestStatus::Approved);
    assert_eq!(approved.created_at(), request.created_at());
    assert!(participation::is_registered(&state, &me, event.id()));
    assert_eq!(events::get_event(&state, event.id()).unwrap().participants, 1);
    assert!(pending_for_organizer(&state, &host).is_empty());
}

#[test]
fn requests_are_processed_once() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let request = request_participation(&state, &participant("p1"), event.id(), None).unwrap();

    approve(&state, &host, request.id()).unwrap();
    let err = reject(&state, &host, request.id()).unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyProcessed { status: "approved", .. }));
    assert_eq!(approve(&state, &host, request.id()).unwrap_err().error_code(), "E_ALREADY_PROCESSED");
}

#[test]
fn only_the_organizer_or_an_admin_processes() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let a = request_participation(&state, &participant("a"), event.id(), None).unwrap();
    let b = request_participation(&state, &participant("b"), event.id(), None).unwrap();

    let err = approve(&state, &organizer("o2"), a.id()).unwrap_err();
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");
    assert!(requests_for_event(&state, &participant("a"), event.id()).is_err());

    reject(&state, &admin(), a.id()).unwrap();
    approve(&state, &host, b.id()).unwrap();
    let statuses: Vec<RequestStatus> =
        requests_for_event(&state, &host, event.id()).unwrap().iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![RequestStatus::Rejected, RequestStatus::Approved]);
}

#[test]
fn approval_fails_once_the_session_is_full() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let ids: Vec<String> = ["a", "b", "c"]
        .iter()
        .map(|u| request_participation(&state, &participant(u), event.id(), None).unwrap().id().to_owned())
        .collect();

    approve(&state, &host, &ids[0]).unwrap();
    approve(&state, &host, &ids[1]).unwrap();
    assert_eq!(events::get_event(&state, event.id()).unwrap().status, EventStatus::Full);

    let err = approve(&state, &host, &ids[2]).unwrap_err();
    assert_eq!(err.error_code(), "E_EVENT_CLOSED");
    assert_eq!(request_status(&state, &participant("c"), event.id()), Some(RequestStatus::Pending));
}

#[test]
fn request_rejects_tournaments_own_sessions_and_cancelled_ones() {
    let state = test_state_with_seed();
    let me = participant("p1");
    let err = request_participation(&state, &me, "seed-1", None).unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID");

    let host = organizer("o1");
    let event = practice(&state, &host);
    assert_eq!(request_participation(&state, &host, event.id(), None).unwrap_err().error_code(), "E_INVALID");

    cancel_event(&state, &host, event.id()).unwrap();
    let err = request_participation(&state, &me, event.id(), None).unwrap_err();
    assert!(matches!(err, ServiceError::EventClosed { status: "cancelled", .. }));

    assert_eq!(request_participation(&state, &me, "missing", None).unwrap_err().error_code(), "E_NOT_FOUND");
}

#[test]
fn requester_withdraws_pending_request() {
    let state = test_state_with_seed();
    let me = participant("p1");
    let request = request_participation(&state, &me, "seed-3", None).unwrap();
    assert_eq!(request.organizer_id, "organizer-demo");

    let err = cancel_request(&state, &participant("other"), request.id()).unwrap_err();
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");

    cancel_request(&state, &me, request.id()).unwrap();
    assert_eq!(request_status(&state, &me, "seed-3"), None);
    assert!(requests_for_user(&state, &me).is_empty());
}

#[test]
fn leaving_an_approved_session_allows_a_new_request() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");
    let first = request_participation(&state, &me, event.id(), None).unwrap();
    approve(&state, &host, first.id()).unwrap();

    assert!(participation::unregister(&state, &me, event.id()).unwrap());
    assert!(!participation::is_registered(&state, &me, event.id()));
    assert_eq!(request_status(&state, &me, event.id()), None);
    assert_eq!(events::get_event(&state, event.id()).unwrap().participants, 0);

    let again = request_participation(&state, &me, event.id(), None).unwrap();
    assert_eq!(again.status, RequestStatus::Pending);
    approve(&state, &host, again.id()).unwrap();
    assert!(participation::is_registered(&state, &me, event.id()));
}

#[test]
fn withdrawing_an_approved_request_frees_the_spot() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");
    let request = request_participation(&state, &me, event.id(), None).unwrap();
    approve(&state, &host, request.id()).unwrap();

    cancel_request(&state, &me, request.id()).unwrap();
    assert!(!participation::is_registered(&state, &me, event.id()));
    assert_eq!(events::get_event(&state, event.id()).unwrap().participants, 0);
    assert!(requests_for_user(&state, &me).is_empty());
    request_participation(&state, &me, event.id(), None).unwrap();
}

#[test]
fn rejected_request_cannot_be_withdrawn() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let me = participant("p1");
    let request = request_participation(&state, &me, event.id(), None).unwrap();
    reject(&state, &host, request.id()).unwrap();

    let err = cancel_request(&state, &me, request.id()).unwrap_err();
    assert!(matches!(err, ServiceError::AlreadyProcessed { status: "rejected", .. }));
}

#[test]
fn failed_approval_leaves_request_pending_and_nothing_recorded() {
    let state = test_state();
    let host = organizer("o1");
    let event = practice(&state, &host);
    let late = participant("late");
    let request = request_participation(&state, &late, event.id(), None).unwrap();
    events::adjust_participants(&state, event.id(), 2).unwrap();

    let err = approve(&state, &host, request.id()).unwrap_err();
    assert_eq!(err.error_code(), "E_EVENT_CLOSED");
    assert_eq!(request_status(&state, &late, event.id()), Some(RequestStatus::Pending));
    assert!(!participation::is_registered(&state, &late, event.id()));
    assert_eq!(events::get_event(&state, event.id()).unwrap().participants, 2);
}
