use super::*;
use crate::error::ErrorCode;
use crate::state::test_helpers::{admin, participant, test_state};

#[test]
fn submit_copies_sender_details() {
    let state = test_state();
    let inquiry = submit_inquiry(&state, &participant("p1"), " 大会について ", "参加費はいくらですか？").unwrap();
    assert_eq!(inquiry.subject, "大会について");
    assert_eq!(inquiry.user_email, "p1@example.com");
    assert_eq!(inquiry.user_name, "player p1");
    assert_eq!(inquiry.status, InquiryStatus::Unread);
}

#[test]
fn submit_requires_subject_and_message() {
    let state = test_state();
    let me = participant("p1");
    let err = submit_inquiry(&state, &me, "", "body").unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(ValidationError::Empty { field: "subject" })));
    let err = submit_inquiry(&state, &me, "subject", "  ").unwrap_err();
    assert!(matches!(err, ServiceError::Invalid(ValidationError::Empty { field: "message" })));
}

#[test]
fn admin_workflow_reads_filters_and_deletes() {
    let state = test_state();
    let root = admin();
    let first = submit_inquiry(&state, &participant("a"), "one", "1").unwrap();
    let second = submit_inquiry(&state, &participant("b"), "two", "2").unwrap();
    assert_eq!(unread_count(&state, &root).unwrap(), 2);

    let listed = list_inquiries(&state, &root, None).unwrap();
    assert_eq!(listed, vec![second.clone(), first.clone()]);

    let read = mark_read(&state, &root, first.id()).unwrap();
    assert_eq!(read.status, InquiryStatus::Read);
    assert_eq!(unread_count(&state, &root).unwrap(), 1);
    let unread = list_inquiries(&state, &root, Some(InquiryStatus::Unread)).unwrap();
    assert_eq!(unread, vec![second]);

    delete_inquiry(&state, &root, first.id()).unwrap();
    assert_eq!(list_inquiries(&state, &root, None).unwrap().len(), 1);
    assert_eq!(mark_read(&state, &root, first.id()).unwrap_err().error_code(), "E_NOT_FOUND");
}

#[test]
fn reading_inquiries_is_admin_only() {
    let state = test_state();
    let me = participant("p1");
    let mine = submit_inquiry(&state, &me, "s", "m").unwrap();
    assert_eq!(list_inquiries(&state, &me, None).unwrap_err().error_code(), "E_UNAUTHORIZED");
    assert!(unread_count(&state, &me).is_err());
    assert!(mark_read(&state, &me, mine.id()).is_err());
    assert!(delete_inquiry(&state, &me, mine.id()).is_err());
}
