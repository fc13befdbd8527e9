use super::*;
use crate::error::ErrorCode;
use crate::state::test_helpers::{admin, organizer, test_state};

fn venue(name: &str, prefecture: &str) -> NewVenue {
    NewVenue {
        name: name.to_owned(),
        address: format!("{prefecture} 1-1"),
        prefecture: prefecture.to_owned(),
        description: String::new(),
        court_count: 4,
    }
}

#[test]
fn active_listing_is_sorted_by_name_and_filtered() {
    let state = test_state();
    let root = admin();
    create_venue(&state, &root, venue("Suma", "兵庫県")).unwrap();
    create_venue(&state, &root, venue("Odaiba", "東京都")).unwrap();
    create_venue(&state, &root, venue("Kugenuma", "神奈川県")).unwrap();

    let names: Vec<String> = list_active_venues(&state, None).iter().map(|v| v.name.clone()).collect();
    assert_eq!(names, vec!["Kugenuma", "Odaiba", "Suma"]);

    let tokyo = list_active_venues(&state, Some("東京都"));
    assert_eq!(tokyo.len(), 1);
    assert_eq!(tokyo[0].name, "Odaiba");
}

#[test]
fn deactivate_hides_without_deleting() {
    let state = test_state();
    let root = admin();
    let created = create_venue(&state, &root, venue("Suma", "兵庫県")).unwrap();

    deactivate_venue(&state, &root, created.id()).unwrap();
    assert!(list_active_venues(&state, None).is_empty());
    let stored = get_venue(&state, created.id()).unwrap();
    assert!(!stored.is_active);
    assert!(stored.updated_at.is_some());
    assert_eq!(list_all_venues(&state, &root).unwrap().len(), 1);

    reactivate_venue(&state, &root, created.id()).unwrap();
    assert_eq!(list_active_venues(&state, None).len(), 1);
}

#[test]
fn update_refreshes_timestamp_and_validates() {
    let state = test_state();
    let root = admin();
    let created = create_venue(&state, &root, venue("Suma", "兵庫県")).unwrap();
    assert_eq!(created.updated_at, None);

    let updated =
        update_venue(&state, &root, created.id(), VenuePatch { court_count: Some(6), ..VenuePatch::default() }).unwrap();
    assert_eq!(updated.court_count, 6);
    assert!(updated.updated_at.is_some());
    assert_eq!(updated.created_at(), created.created_at());

    let err = update_venue(&state, &root, created.id(), VenuePatch { name: Some("  ".into()), ..VenuePatch::default() })
        .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID");
}

#[test]
fn management_is_admin_only() {
    let state = test_state();
    let host = organizer("o1");
    assert_eq!(create_venue(&state, &host, venue("Suma", "兵庫県")).unwrap_err().error_code(), "E_UNAUTHORIZED");

    let created = create_venue(&state, &admin(), venue("Suma", "兵庫県")).unwrap();
    assert!(deactivate_venue(&state, &host, created.id()).is_err());
    assert!(list_all_venues(&state, &host).is_err());
    assert_eq!(deactivate_venue(&state, &admin(), "missing").unwrap_err().error_code(), "E_NOT_FOUND");
}
