//! UI event types.
//!
//! Events are what the runtime feeds the reducer: terminal input, the tick,
//! and completions of async API work arriving through the inbox.

use copydesk_core::api::categories::Category;
use copydesk_core::api::files::StoredFile;
use copydesk_core::api::posts::Post;
use copydesk_core::api::tags::Tag;
use copydesk_core::api::{ApiError, Page};
use copydesk_core::session::UserProfile;

/// Top-level event fed to the reducer.
#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner animation, render cadence).
    Tick,
    /// Raw terminal event.
    Terminal(crossterm::event::Event),
    /// An API task was spawned (drives the loading indicator).
    ApiStarted,
    /// An API task finished.
    Api(ApiEvent),
}

/// Completion of one async API task.
///
/// Every variant carries the full `Result`; the reducer routes errors
/// through one session-expiry interception point before the page handler
/// sees them.
#[derive(Debug)]
pub enum ApiEvent {
    /// Login pipeline finished (token persisted and profile cached on
    /// success; both done by the runtime handler).
    LoginFinished(Result<(), ApiError>),
    /// The durable session was cleared.
    LoggedOut(Result<(), String>),
    ProfileLoaded(Result<UserProfile, ApiError>),
    PasswordChanged(Result<(), ApiError>),

    PostsLoaded(Result<Page<Post>, ApiError>),
    PostLoaded(Result<Post, ApiError>),
    PostSaved(Result<Post, ApiError>),
    PostDeleted(Result<(), ApiError>),
    /// Publish/unpublish finished; carries the updated post.
    PostPublication(Result<Post, ApiError>),

    CategoriesLoaded(Result<Vec<Category>, ApiError>),
    CategoryLoaded(Result<Category, ApiError>),
    CategorySaved(Result<Category, ApiError>),
    CategoryDeleted(Result<(), ApiError>),

    TagsLoaded(Result<Page<Tag>, ApiError>),
    TagLoaded(Result<Tag, ApiError>),
    TagSaved(Result<Tag, ApiError>),
    TagDeleted(Result<(), ApiError>),

    UsersLoaded(Result<Page<UserProfile>, ApiError>),
    /// Register or lock/unlock finished; carries the affected user.
    UserSaved(Result<UserProfile, ApiError>),

    FilesLoaded(Result<Page<StoredFile>, ApiError>),
    FileUploaded(Result<StoredFile, ApiError>),
    FileDeleted(Result<(), ApiError>),
}

impl ApiEvent {
    /// Returns the error carried by this completion, if any.
    ///
    /// This is what the reducer's session-expiry interception reads; it
    /// runs for every completion uniformly, before page dispatch.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            ApiEvent::LoginFinished(r) => r.as_ref().err(),
            ApiEvent::LoggedOut(_) => None,
            ApiEvent::ProfileLoaded(r) => r.as_ref().err(),
            ApiEvent::PasswordChanged(r) => r.as_ref().err(),
            ApiEvent::PostsLoaded(r) => r.as_ref().err(),
            ApiEvent::PostLoaded(r) => r.as_ref().err(),
            ApiEvent::PostSaved(r) => r.as_ref().err(),
            ApiEvent::PostDeleted(r) => r.as_ref().err(),
            ApiEvent::PostPublication(r) => r.as_ref().err(),
            ApiEvent::CategoriesLoaded(r) => r.as_ref().err(),
            ApiEvent::CategoryLoaded(r) => r.as_ref().err(),
            ApiEvent::CategorySaved(r) => r.as_ref().err(),
            ApiEvent::CategoryDeleted(r) => r.as_ref().err(),
            ApiEvent::TagsLoaded(r) => r.as_ref().err(),
            ApiEvent::TagLoaded(r) => r.as_ref().err(),
            ApiEvent::TagSaved(r) => r.as_ref().err(),
            ApiEvent::TagDeleted(r) => r.as_ref().err(),
            ApiEvent::UsersLoaded(r) => r.as_ref().err(),
            ApiEvent::UserSaved(r) => r.as_ref().err(),
            ApiEvent::FilesLoaded(r) => r.as_ref().err(),
            ApiEvent::FileUploaded(r) => r.as_ref().err(),
            ApiEvent::FileDeleted(r) => r.as_ref().err(),
        }
    }
}
