use super::*;

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(std::iter::once("vb").chain(args.iter().copied())).unwrap()
}

#[test]
fn global_identity_flags_build_the_actor() {
    let cli = parse(&["--user-id", "u1", "--user-name", "Aki", "--email", "a@example.com", "--role", "organizer", "favorites", "list"]);
    let actor = cli.actor();
    assert_eq!(actor.user_id, "u1");
    assert_eq!(actor.user_name, "Aki");
    assert_eq!(actor.email.as_deref(), Some("a@example.com"));
    assert_eq!(actor.role, Role::Organizer);
}

#[test]
fn identity_flags_may_follow_the_subcommand() {
    let cli = parse(&["news", "all", "--role", "super-admin"]);
    assert_eq!(cli.role, Role::SuperAdmin);
    assert!(matches!(cli.command, Command::News(NewsCommand::All)));
}

#[test]
fn unknown_role_is_rejected() {
    let result = Cli::try_parse_from(["vb", "--role", "captain", "favorites", "list"]);
    assert!(result.is_err());
}

#[test]
fn event_create_defaults_to_tournament() {
    let cli = parse(&["events", "create", "--name", "Cup", "--date", "2026-07-05", "--venue", "鵠沼海岸"]);
    let Command::Events(EventsCommand::Create(args)) = cli.command else {
        panic!("expected events create");
    };
    assert!(matches!(args.kind, EventTypeArg::Tournament));
    assert_eq!(args.description, "");
    assert_eq!(EventType::from(args.kind), EventType::Tournament);
}

#[test]
fn value_enums_map_onto_domain_types() {
    assert_eq!(NewsCategory::from(NewsCategoryArg::Recruitment), NewsCategory::Recruitment);
    assert_eq!(EventStatus::from(EventStatusArg::Cancelled), EventStatus::Cancelled);
    assert_eq!(InquiryStatus::from(InquiryStatusArg::Unread), InquiryStatus::Unread);
    assert_eq!(ProfileVisibility::from(VisibilityArg::Participants), ProfileVisibility::Participants);
}

#[test]
fn service_errors_keep_their_code() {
    let err = CliError::from(ServiceError::Unauthorized { action: "reset comment likes" });
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");
    assert_eq!(CliError::MissingKey("venues".into()).error_code(), "E_NOT_FOUND");
}

#[test]
fn handlers_run_against_a_memory_store() {
    let state = AppState::new(store::LocalStore::memory(), true);
    let actor = Actor::new("p1", "player", Role::Participant);
    run_favorites(&state, &actor, FavoritesCommand::Add { event_id: "seed-1".into() }).unwrap();
    run_favorites(&state, &actor, FavoritesCommand::Add { event_id: "seed-1".into() }).unwrap();
    assert_eq!(favorites::list_favorites(&state, &actor).len(), 1);

    let err = run_comments(&state, &actor, CommentsCommand::ResetLikes).unwrap_err();
    assert_eq!(err.error_code(), "E_UNAUTHORIZED");
}
