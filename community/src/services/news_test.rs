use super::*;
use crate::error::ErrorCode;
use crate::state::test_helpers::{admin, participant, super_admin, test_state};

fn article(title: &str, category: NewsCategory, is_published: bool) -> NewArticle {
    NewArticle {
        title: title.to_owned(),
        summary: format!("{title} summary"),
        content: format!("{title} body"),
        category,
        is_published,
    }
}

#[test]
fn category_serializes_as_japanese_label() {
    let json = serde_json::to_string(&NewsCategory::Facility).unwrap();
    assert_eq!(json, "\"施設情報\"");
    let parsed: NewsCategory = serde_json::from_str("\"募集\"").unwrap();
    assert_eq!(parsed, NewsCategory::Recruitment);
}

#[test]
fn draft_is_hidden_until_published() {
    let state = test_state();
    let root = admin();
    let older = create_article(&state, &root, article("Court reopens", NewsCategory::Facility, true)).unwrap();
    let draft = create_article(&state, &root, article("Summer rules", NewsCategory::Rules, false)).unwrap();
    assert_eq!(draft.published_at, None);

    let visible = list_published(&state, None);
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].id(), older.id());

    let published = update_article(
        &state,
        &root,
        draft.id(),
        NewsPatch { is_published: Some(true), ..NewsPatch::default() },
    )
    .unwrap();
    assert!(published.is_published);
    assert!(published.published_at.is_some());
    assert!(published.updated_at.is_some());

    let listed = list_published(&state, None);
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].id(), draft.id());
    assert!(listed[0].published_at >= listed[1].published_at);
}

#[test]
fn republishing_keeps_first_publish_time() {
    let state = test_state();
    let root = admin();
    let created = create_article(&state, &root, article("Cup results", NewsCategory::Tournament, true)).unwrap();
    let first = created.published_at.clone();

    let hidden = unpublish(&state, &root, created.id()).unwrap();
    assert!(!hidden.is_published);
    assert!(list_published(&state, None).is_empty());

    let shown = publish(&state, &root, created.id()).unwrap();
    assert_eq!(shown.published_at, first);
}

#[test]
fn list_published_filters_by_category() {
    let state = test_state();
    let root = super_admin();
    create_article(&state, &root, article("A", NewsCategory::Practice, true)).unwrap();
    create_article(&state, &root, article("B", NewsCategory::Recruitment, true)).unwrap();

    let practice = list_published(&state, Some(NewsCategory::Practice));
    assert_eq!(practice.len(), 1);
    assert_eq!(practice[0].title, "A");
    assert_eq!(practice[0].author_id, "root-1");
}

#[test]
fn writes_are_admin_only() {
    let state = test_state();
    let reader = participant("p1");
    let err = create_article(&state, &reader, article("x", NewsCategory::Rules, true)).unwrap_err();
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");

    let created = create_article(&state, &admin(), article("x", NewsCategory::Rules, true)).unwrap();
    assert!(delete_article(&state, &reader, created.id()).is_err());
    assert!(list_all(&state, &reader).is_err());

    delete_article(&state, &admin(), created.id()).unwrap();
    assert_eq!(delete_article(&state, &admin(), created.id()).unwrap_err().error_code(), "E_NOT_FOUND");
}

#[test]
fn drafts_are_only_readable_by_admins() {
    let state = test_state();
    let draft = create_article(&state, &admin(), article("draft", NewsCategory::Rules, false)).unwrap();

    assert_eq!(get_article(&state, &participant("p1"), draft.id()).unwrap_err().error_code(), "E_NOT_FOUND");
    assert_eq!(get_article(&state, &admin(), draft.id()).unwrap(), draft);
    assert_eq!(list_all(&state, &admin()).unwrap(), vec![draft]);
}

#[test]
fn update_validates_after_merge() {
    let state = test_state();
    let created = create_article(&state, &admin(), article("x", NewsCategory::Rules, true)).unwrap();
    let err = update_article(
        &state,
        &admin(),
        created.id(),
        NewsPatch { title: Some(String::new()), ..NewsPatch::default() },
    )
    .unwrap_err();
    assert_eq!(err.error_code(), "E_INVALID");
    assert_eq!(get_article(&state, &admin(), created.id()).unwrap().title, "x");
}
