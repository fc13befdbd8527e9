//! `vb`: command-line front end for the beach-volleyball community store.
//!
//! Every subcommand maps to one service call. Results go to stdout as pretty
//! JSON; logs go to stderr, filtered by `RUST_LOG`.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use community::services::events::{self, EventFilter, EventPatch, EventStatus, EventType, NewEvent};
use community::services::inquiries::{self, InquiryStatus};
use community::services::news::{self, NewArticle, NewsCategory, NewsPatch};
use community::services::settings::{self, NotificationPatch, PrivacyPatch, ProfileVisibility};
use community::services::venues::{self, NewVenue, VenuePatch};
use community::services::{comments, favorites, participation, practice_requests};
use community::{Actor, AppState, CommunityConfig, ConfigError, ErrorCode, Role, ServiceError};
use serde::Serialize;
use serde_json::json;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error("failed to render output: {0}")]
    Output(#[from] serde_json::Error),
    #[error("store key not found: {0}")]
    MissingKey(String),
}

impl ErrorCode for CliError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "E_CONFIG",
            Self::Service(err) => err.error_code(),
            Self::Output(_) => "E_OUTPUT",
            Self::MissingKey(_) => "E_NOT_FOUND",
        }
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "vb", about = "Beach volleyball community CLI")]
struct Cli {
    /// Directory for the file backend (overrides VB_DATA_DIR).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[arg(long, global = true, env = "VB_USER_ID", default_value = "guest")]
    user_id: String,

    #[arg(long, global = true, env = "VB_USER_NAME", default_value = "Guest")]
    user_name: String,

    #[arg(long, global = true, env = "VB_USER_EMAIL")]
    email: Option<String>,

    /// participant, organizer, admin or super_admin.
    #[arg(long, global = true, env = "VB_ROLE", default_value = "participant")]
    role: Role,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn actor(&self) -> Actor {
        let actor = Actor::new(self.user_id.clone(), self.user_name.clone(), self.role);
        match &self.email {
            Some(email) => actor.with_email(email.clone()),
            None => actor,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tournaments and practice sessions.
    #[command(subcommand)]
    Events(EventsCommand),
    #[command(subcommand)]
    Favorites(FavoritesCommand),
    /// Tournament registration.
    #[command(subcommand)]
    Participation(ParticipationCommand),
    #[command(subcommand)]
    Comments(CommentsCommand),
    /// Practice session participation requests.
    #[command(subcommand)]
    Requests(RequestsCommand),
    #[command(subcommand)]
    News(NewsCommand),
    #[command(subcommand)]
    Venues(VenuesCommand),
    #[command(subcommand)]
    Inquiries(InquiriesCommand),
    #[command(subcommand)]
    Settings(SettingsCommand),
    /// Raw store inspection.
    #[command(subcommand)]
    Store(StoreCommand),
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EventTypeArg {
    Tournament,
    Practice,
}

impl From<EventTypeArg> for EventType {
    fn from(arg: EventTypeArg) -> Self {
        match arg {
            EventTypeArg::Tournament => Self::Tournament,
            EventTypeArg::Practice => Self::Practice,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum EventStatusArg {
    Recruiting,
    Full,
    Closed,
    Cancelled,
}

impl From<EventStatusArg> for EventStatus {
    fn from(arg: EventStatusArg) -> Self {
        match arg {
            EventStatusArg::Recruiting => Self::Recruiting,
            EventStatusArg::Full => Self::Full,
            EventStatusArg::Closed => Self::Closed,
            EventStatusArg::Cancelled => Self::Cancelled,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum NewsCategoryArg {
    Facility,
    Tournament,
    Rules,
    Practice,
    Recruitment,
}

impl From<NewsCategoryArg> for NewsCategory {
    fn from(arg: NewsCategoryArg) -> Self {
        match arg {
            NewsCategoryArg::Facility => Self::Facility,
            NewsCategoryArg::Tournament => Self::Tournament,
            NewsCategoryArg::Rules => Self::Rules,
            NewsCategoryArg::Practice => Self::Practice,
            NewsCategoryArg::Recruitment => Self::Recruitment,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum InquiryStatusArg {
    Unread,
    Read,
}

impl From<InquiryStatusArg> for InquiryStatus {
    fn from(arg: InquiryStatusArg) -> Self {
        match arg {
            InquiryStatusArg::Unread => Self::Unread,
            InquiryStatusArg::Read => Self::Read,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum VisibilityArg {
    Public,
    Participants,
    Private,
}

impl From<VisibilityArg> for ProfileVisibility {
    fn from(arg: VisibilityArg) -> Self {
        match arg {
            VisibilityArg::Public => Self::Public,
            VisibilityArg::Participants => Self::Participants,
            VisibilityArg::Private => Self::Private,
        }
    }
}

#[derive(Subcommand, Debug)]
enum EventsCommand {
    List {
        #[arg(long = "type")]
        kind: Option<EventTypeArg>,
        #[arg(long)]
        organizer: Option<String>,
        #[arg(long)]
        status: Option<EventStatusArg>,
        /// Earliest date, inclusive (YYYY-MM-DD).
        #[arg(long)]
        from: Option<String>,
        /// Latest date, inclusive (YYYY-MM-DD).
        #[arg(long)]
        to: Option<String>,
    },
    Get {
        id: String,
    },
    Create(EventArgs),
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        start_time: Option<String>,
        #[arg(long)]
        venue: Option<String>,
        #[arg(long)]
        prefecture: Option<String>,
        #[arg(long)]
        status: Option<EventStatusArg>,
        #[arg(long)]
        max_participants: Option<u32>,
        #[arg(long)]
        description: Option<String>,
    },
    Cancel {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Args, Debug)]
struct EventArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    date: String,
    #[arg(long)]
    start_time: Option<String>,
    #[arg(long)]
    venue: String,
    #[arg(long)]
    prefecture: Option<String>,
    #[arg(long = "type", default_value = "tournament")]
    kind: EventTypeArg,
    #[arg(long)]
    max_participants: Option<u32>,
    #[arg(long, default_value = "")]
    description: String,
}

#[derive(Subcommand, Debug)]
enum FavoritesCommand {
    List,
    Add { event_id: String },
    Remove { event_id: String },
    Toggle { event_id: String },
    Check { event_id: String },
}

#[derive(Subcommand, Debug)]
enum ParticipationCommand {
    List,
    Join { event_id: String },
    Leave { event_id: String },
    Check { event_id: String },
}

#[derive(Subcommand, Debug)]
enum CommentsCommand {
    List { event_id: String },
    Count { event_id: String },
    Add { event_id: String, content: String },
    Edit { id: String, content: String },
    Like { id: String },
    Delete { id: String },
    ResetLikes,
}

#[derive(Subcommand, Debug)]
enum RequestsCommand {
    Create {
        event_id: String,
        #[arg(long)]
        message: Option<String>,
    },
    Approve {
        id: String,
    },
    Reject {
        id: String,
    },
    Cancel {
        id: String,
    },
    /// Pending requests for sessions you organize.
    Pending,
    ForEvent {
        event_id: String,
    },
    Mine,
    Status {
        event_id: String,
    },
}

#[derive(Subcommand, Debug)]
enum NewsCommand {
    List {
        #[arg(long)]
        category: Option<NewsCategoryArg>,
    },
    All,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        summary: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        category: NewsCategoryArg,
        #[arg(long)]
        publish: bool,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        category: Option<NewsCategoryArg>,
        #[arg(long)]
        published: Option<bool>,
    },
    Publish {
        id: String,
    },
    Unpublish {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum VenuesCommand {
    List {
        #[arg(long)]
        prefecture: Option<String>,
    },
    All,
    Get {
        id: String,
    },
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        address: String,
        #[arg(long)]
        prefecture: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, default_value_t = 1)]
        court_count: u32,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        prefecture: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        court_count: Option<u32>,
    },
    Deactivate {
        id: String,
    },
    Reactivate {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum InquiriesCommand {
    Submit {
        subject: String,
        message: String,
    },
    List {
        #[arg(long)]
        status: Option<InquiryStatusArg>,
    },
    Read {
        id: String,
    },
    UnreadCount,
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsCommand {
    /// Show or update privacy settings.
    Privacy {
        #[arg(long)]
        visibility: Option<VisibilityArg>,
        #[arg(long)]
        show_email: Option<bool>,
        #[arg(long)]
        show_participation_history: Option<bool>,
        #[arg(long)]
        allow_messages: Option<bool>,
    },
    /// Show or update notification settings.
    Notifications {
        #[arg(long)]
        event_reminders: Option<bool>,
        #[arg(long)]
        new_events: Option<bool>,
        #[arg(long)]
        comment_replies: Option<bool>,
        #[arg(long)]
        practice_requests: Option<bool>,
        #[arg(long)]
        news_updates: Option<bool>,
        #[arg(long)]
        email_notifications: Option<bool>,
        #[arg(long)]
        marketing: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
enum StoreCommand {
    /// Keys currently held by the backend.
    Keys,
    /// The stored JSON for one key.
    Raw { key: String },
}

// =============================================================================
// ENTRY POINT
// =============================================================================

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let body = json!({ "error": err.error_code(), "message": err.to_string() });
            eprintln!("{body}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config = CommunityConfig::from_env()?;
    if let Some(dir) = &cli.data_dir {
        config.data_dir.clone_from(dir);
    }
    let state = AppState::from_config(&config)?;
    let actor = cli.actor();

    match cli.command {
        Command::Events(cmd) => run_events(&state, &actor, cmd),
        Command::Favorites(cmd) => run_favorites(&state, &actor, cmd),
        Command::Participation(cmd) => run_participation(&state, &actor, cmd),
        Command::Comments(cmd) => run_comments(&state, &actor, cmd),
        Command::Requests(cmd) => run_requests(&state, &actor, cmd),
        Command::News(cmd) => run_news(&state, &actor, cmd),
        Command::Venues(cmd) => run_venues(&state, &actor, cmd),
        Command::Inquiries(cmd) => run_inquiries(&state, &actor, cmd),
        Command::Settings(cmd) => run_settings(&state, cmd),
        Command::Store(cmd) => run_store(&state, cmd),
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

fn run_events(state: &AppState, actor: &Actor, cmd: EventsCommand) -> Result<(), CliError> {
    match cmd {
        EventsCommand::List { kind, organizer, status, from, to } => {
            let filter = EventFilter {
                kind: kind.map(Into::into),
                organizer_id: organizer,
                status: status.map(Into::into),
                from_date: from,
                to_date: to,
            };
            print_json(&events::list_events(state, &filter))
        }
        EventsCommand::Get { id } => print_json(&events::get_event(state, &id)?),
        EventsCommand::Create(args) => {
            let input = NewEvent {
                name: args.name,
                event_date: args.date,
                start_time: args.start_time,
                venue: args.venue,
                prefecture: args.prefecture,
                kind: args.kind.into(),
                max_participants: args.max_participants,
                description: args.description,
            };
            print_json(&events::create_event(state, actor, input)?)
        }
        EventsCommand::Update { id, name, date, start_time, venue, prefecture, status, max_participants, description } => {
            let patch = EventPatch {
                name,
                event_date: date,
                start_time,
                venue,
                prefecture,
                status: status.map(Into::into),
                max_participants,
                description,
            };
            print_json(&events::update_event(state, actor, &id, patch)?)
        }
        EventsCommand::Cancel { id } => print_json(&events::cancel_event(state, actor, &id)?),
        EventsCommand::Delete { id } => {
            events::delete_event(state, actor, &id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn run_favorites(state: &AppState, actor: &Actor, cmd: FavoritesCommand) -> Result<(), CliError> {
    match cmd {
        FavoritesCommand::List => print_json(&favorites::list_favorites(state, actor)),
        FavoritesCommand::Add { event_id } => print_json(&favorites::add_favorite(state, actor, &event_id)?),
        FavoritesCommand::Remove { event_id } => {
            let removed = favorites::remove_favorite(state, actor, &event_id);
            print_json(&json!({ "eventId": event_id, "removed": removed }))
        }
        FavoritesCommand::Toggle { event_id } => {
            let favorited = favorites::toggle_favorite(state, actor, &event_id)?;
            print_json(&json!({ "eventId": event_id, "favorite": favorited }))
        }
        FavoritesCommand::Check { event_id } => {
            let favorited = favorites::is_favorite(state, actor, &event_id);
            print_json(&json!({ "eventId": event_id, "favorite": favorited }))
        }
    }
}

fn run_participation(state: &AppState, actor: &Actor, cmd: ParticipationCommand) -> Result<(), CliError> {
    match cmd {
        ParticipationCommand::List => print_json(&participation::list_participating(state, actor)),
        ParticipationCommand::Join { event_id } => print_json(&participation::register(state, actor, &event_id)?),
        ParticipationCommand::Leave { event_id } => {
            let left = participation::unregister(state, actor, &event_id)?;
            print_json(&json!({ "eventId": event_id, "left": left }))
        }
        ParticipationCommand::Check { event_id } => {
            let registered = participation::is_registered(state, actor, &event_id);
            print_json(&json!({ "eventId": event_id, "registered": registered }))
        }
    }
}

fn run_comments(state: &AppState, actor: &Actor, cmd: CommentsCommand) -> Result<(), CliError> {
    match cmd {
        CommentsCommand::List { event_id } => print_json(&comments::list_comments(state, &event_id)),
        CommentsCommand::Count { event_id } => {
            let count = comments::comment_count(state, &event_id);
            print_json(&json!({ "eventId": event_id, "count": count }))
        }
        CommentsCommand::Add { event_id, content } => {
            print_json(&comments::add_comment(state, actor, &event_id, &content)?)
        }
        CommentsCommand::Edit { id, content } => print_json(&comments::edit_comment(state, actor, &id, &content)?),
        CommentsCommand::Like { id } => print_json(&comments::toggle_like(state, actor, &id)?),
        CommentsCommand::Delete { id } => {
            comments::delete_comment(state, actor, &id)?;
            print_json(&json!({ "deleted": id }))
        }
        CommentsCommand::ResetLikes => {
            let changed = comments::reset_likes(state, actor)?;
            print_json(&json!({ "changed": changed }))
        }
    }
}

fn run_requests(state: &AppState, actor: &Actor, cmd: RequestsCommand) -> Result<(), CliError> {
    match cmd {
        RequestsCommand::Create { event_id, message } => {
            print_json(&practice_requests::request_participation(state, actor, &event_id, message)?)
        }
        RequestsCommand::Approve { id } => print_json(&practice_requests::approve(state, actor, &id)?),
        RequestsCommand::Reject { id } => print_json(&practice_requests::reject(state, actor, &id)?),
        RequestsCommand::Cancel { id } => {
            practice_requests::cancel_request(state, actor, &id)?;
            print_json(&json!({ "cancelled": id }))
        }
        RequestsCommand::Pending => print_json(&practice_requests::pending_for_organizer(state, actor)),
        RequestsCommand::ForEvent { event_id } => {
            print_json(&practice_requests::requests_for_event(state, actor, &event_id)?)
        }
        RequestsCommand::Mine => print_json(&practice_requests::requests_for_user(state, actor)),
        RequestsCommand::Status { event_id } => {
            let status = practice_requests::request_status(state, actor, &event_id);
            print_json(&json!({ "eventId": event_id, "status": status }))
        }
    }
}

fn run_news(state: &AppState, actor: &Actor, cmd: NewsCommand) -> Result<(), CliError> {
    match cmd {
        NewsCommand::List { category } => print_json(&news::list_published(state, category.map(Into::into))),
        NewsCommand::All => print_json(&news::list_all(state, actor)?),
        NewsCommand::Get { id } => print_json(&news::get_article(state, actor, &id)?),
        NewsCommand::Create { title, summary, content, category, publish } => {
            let input = NewArticle { title, summary, content, category: category.into(), is_published: publish };
            print_json(&news::create_article(state, actor, input)?)
        }
        NewsCommand::Update { id, title, summary, content, category, published } => {
            let patch = NewsPatch { title, summary, content, category: category.map(Into::into), is_published: published };
            print_json(&news::update_article(state, actor, &id, patch)?)
        }
        NewsCommand::Publish { id } => print_json(&news::publish(state, actor, &id)?),
        NewsCommand::Unpublish { id } => print_json(&news::unpublish(state, actor, &id)?),
        NewsCommand::Delete { id } => {
            news::delete_article(state, actor, &id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn run_venues(state: &AppState, actor: &Actor, cmd: VenuesCommand) -> Result<(), CliError> {
    match cmd {
        VenuesCommand::List { prefecture } => print_json(&venues::list_active_venues(state, prefecture.as_deref())),
        VenuesCommand::All => print_json(&venues::list_all_venues(state, actor)?),
        VenuesCommand::Get { id } => print_json(&venues::get_venue(state, &id)?),
        VenuesCommand::Create { name, address, prefecture, description, court_count } => {
            let input = NewVenue { name, address, prefecture, description, court_count };
            print_json(&venues::create_venue(state, actor, input)?)
        }
        VenuesCommand::Update { id, name, address, prefecture, description, court_count } => {
            let patch = VenuePatch { name, address, prefecture, description, court_count };
            print_json(&venues::update_venue(state, actor, &id, patch)?)
        }
        VenuesCommand::Deactivate { id } => {
            venues::deactivate_venue(state, actor, &id)?;
            print_json(&venues::get_venue(state, &id)?)
        }
        VenuesCommand::Reactivate { id } => {
            venues::reactivate_venue(state, actor, &id)?;
            print_json(&venues::get_venue(state, &id)?)
        }
    }
}

fn run_inquiries(state: &AppState, actor: &Actor, cmd: InquiriesCommand) -> Result<(), CliError> {
    match cmd {
        InquiriesCommand::Submit { subject, message } => {
            print_json(&inquiries::submit_inquiry(state, actor, &subject, &message)?)
        }
        InquiriesCommand::List { status } => {
            print_json(&inquiries::list_inquiries(state, actor, status.map(Into::into))?)
        }
        InquiriesCommand::Read { id } => print_json(&inquiries::mark_read(state, actor, &id)?),
        InquiriesCommand::UnreadCount => {
            let unread = inquiries::unread_count(state, actor)?;
            print_json(&json!({ "unread": unread }))
        }
        InquiriesCommand::Delete { id } => {
            inquiries::delete_inquiry(state, actor, &id)?;
            print_json(&json!({ "deleted": id }))
        }
    }
}

fn run_settings(state: &AppState, cmd: SettingsCommand) -> Result<(), CliError> {
    match cmd {
        SettingsCommand::Privacy { visibility, show_email, show_participation_history, allow_messages } => {
            let patch = PrivacyPatch {
                profile_visibility: visibility.map(Into::into),
                show_email,
                show_participation_history,
                allow_messages,
            };
            let unchanged = patch.profile_visibility.is_none()
                && show_email.is_none()
                && show_participation_history.is_none()
                && allow_messages.is_none();
            if unchanged {
                return print_json(&settings::privacy_settings(state));
            }
            print_json(&settings::update_privacy(state, patch))
        }
        SettingsCommand::Notifications {
            event_reminders,
            new_events,
            comment_replies,
            practice_requests,
            news_updates,
            email_notifications,
            marketing,
        } => {
            let flags = [
                event_reminders,
                new_events,
                comment_replies,
                practice_requests,
                news_updates,
                email_notifications,
                marketing,
            ];
            if flags.iter().all(Option::is_none) {
                return print_json(&settings::notification_settings(state));
            }
            let patch = NotificationPatch {
                event_reminders,
                new_events,
                comment_replies,
                practice_requests,
                news_updates,
                email_notifications,
                marketing,
            };
            print_json(&settings::update_notifications(state, patch))
        }
    }
}

fn run_store(state: &AppState, cmd: StoreCommand) -> Result<(), CliError> {
    match cmd {
        StoreCommand::Keys => print_json(&state.store.keys()),
        StoreCommand::Raw { key } => {
            let raw = state.store.raw(&key).ok_or_else(|| CliError::MissingKey(key.clone()))?;
            let value: serde_json::Value = serde_json::from_str(&raw)?;
            print_json(&value)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
