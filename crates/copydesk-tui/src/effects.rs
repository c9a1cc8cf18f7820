//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only — API calls and session writes. This keeps the
//! reducer pure: it mutates state and returns effects, never performs I/O
//! or spawns tasks directly.

use std::path::PathBuf;

use copydesk_core::api::categories::CategoryCreateRequest;
use copydesk_core::api::posts::{PostCreateRequest, PostStatus};
use copydesk_core::api::tags::TagCreateRequest;
use copydesk_core::api::users::RegisterRequest;

/// Effects returned by the reducer for the runtime to execute.
#[derive(Debug)]
pub enum UiEffect {
    /// Quit the application.
    Quit,

    /// Exchange credentials for a token, persist it, and fetch the profile.
    Login { email: String, password: String },

    /// Clear the durable session (token and profile together).
    Logout,

    /// Fetch the signed-in user's profile into the session store.
    FetchProfile,

    /// Change the signed-in user's password.
    ChangePassword {
        old_password: String,
        new_password: String,
    },

    // Posts
    LoadPosts {
        page: u32,
        status: Option<PostStatus>,
    },
    LoadPost {
        id: String,
    },
    /// Create (`id: None`) or update (`id: Some`) a post.
    SavePost {
        id: Option<String>,
        req: PostCreateRequest,
    },
    DeletePost {
        id: String,
    },
    PublishPost {
        id: String,
    },
    UnpublishPost {
        id: String,
    },

    // Categories
    LoadCategories,
    LoadCategory {
        id: String,
    },
    SaveCategory {
        id: Option<String>,
        req: CategoryCreateRequest,
    },
    DeleteCategory {
        id: String,
    },

    // Tags
    LoadTags {
        page: u32,
    },
    LoadTag {
        id: String,
    },
    SaveTag {
        id: Option<String>,
        req: TagCreateRequest,
    },
    DeleteTag {
        id: String,
    },

    // Users
    LoadUsers {
        page: u32,
    },
    RegisterUser {
        req: RegisterRequest,
    },
    SetUserLock {
        id: String,
        locked: bool,
    },

    // Files
    LoadFiles {
        page: u32,
    },
    UploadFile {
        path: PathBuf,
    },
    DeleteFile {
        id: String,
    },
}
