//! Feature pages.
//!
//! Each page module owns its state struct, key handler, API-event handlers
//! and render function. This module holds the `PageState` sum type and the
//! dispatchers the reducer calls.

pub mod categories;
pub mod category_form;
pub mod files;
pub mod home;
pub mod login;
pub mod post_form;
pub mod posts;
pub mod profile;
pub mod tag_form;
pub mod tags;
pub mod user_form;
pub mod users;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use categories::CategoriesPage;
pub use category_form::CategoryFormPage;
pub use files::FilesPage;
pub use home::HomePage;
pub use login::LoginPage;
pub use post_form::PostFormPage;
pub use posts::PostsPage;
pub use profile::ProfilePage;
pub use tag_form::TagFormPage;
pub use tags::TagsPage;
pub use user_form::UserFormPage;
pub use users::UsersPage;

use crate::dialogs::{ClosedDialog, DialogRequest};
use crate::effects::UiEffect;
use crate::events::ApiEvent;
use crate::router::Route;
use crate::state::TuiState;

/// State of the page the current route materialized.
#[derive(Debug)]
pub enum PageState {
    Login(LoginPage),
    Home(HomePage),
    Posts(PostsPage),
    PostForm(PostFormPage),
    Categories(CategoriesPage),
    CategoryForm(CategoryFormPage),
    Tags(TagsPage),
    TagForm(TagFormPage),
    Users(UsersPage),
    UserForm(UserFormPage),
    Files(FilesPage),
    Profile(ProfilePage),
}

/// What a page handler wants done, applied by the reducer.
#[derive(Debug, Default)]
pub struct PageUpdate {
    /// False means the page did not consume the key; global bindings get it.
    pub handled: bool,
    pub effects: Vec<UiEffect>,
    pub dialog: Option<DialogRequest>,
    pub goto: Option<Route>,
    pub status: Option<String>,
}

impl PageUpdate {
    pub fn handled() -> Self {
        Self {
            handled: true,
            ..Self::default()
        }
    }

    pub fn ignored() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_effect(mut self, effect: UiEffect) -> Self {
        self.effects.push(effect);
        self
    }

    #[must_use]
    pub fn with_dialog(mut self, dialog: DialogRequest) -> Self {
        self.dialog = Some(dialog);
        self
    }

    #[must_use]
    pub fn with_goto(mut self, route: Route) -> Self {
        self.goto = Some(route);
        self
    }

    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

/// Routes a key to the current page.
pub fn handle_key(tui: &mut TuiState, key: KeyEvent) -> PageUpdate {
    match &mut tui.page {
        PageState::Login(page) => login::handle_key(page, key),
        PageState::Home(_) => PageUpdate::ignored(),
        PageState::Posts(page) => posts::handle_key(page, key),
        PageState::PostForm(page) => post_form::handle_key(page, key),
        PageState::Categories(page) => categories::handle_key(page, key),
        PageState::CategoryForm(page) => category_form::handle_key(page, key),
        PageState::Tags(page) => tags::handle_key(page, key),
        PageState::TagForm(page) => tag_form::handle_key(page, key),
        PageState::Users(page) => users::handle_key(page, key),
        PageState::UserForm(page) => user_form::handle_key(page, key),
        PageState::Files(page) => files::handle_key(page, key),
        PageState::Profile(page) => profile::handle_key(page, key),
    }
}

/// Routes a closed dialog back to the page that armed it.
pub fn handle_dialog_close(tui: &mut TuiState, closed: &ClosedDialog) -> PageUpdate {
    match &mut tui.page {
        PageState::Posts(page) => posts::on_dialog_close(page, &closed.result),
        PageState::Categories(page) => categories::on_dialog_close(page, &closed.result),
        PageState::Tags(page) => tags::on_dialog_close(page, &closed.result),
        PageState::Users(page) => users::on_dialog_close(page, &closed.result),
        PageState::Files(page) => files::on_dialog_close(page, &closed.result),
        _ => PageUpdate::handled(),
    }
}

/// Routes an API completion to the page that cares about it.
///
/// Completions arriving after the user navigated away are dropped on the
/// floor — page state was already rebuilt and the stale payload has no home.
pub fn handle_api_event(tui: &mut TuiState, event: ApiEvent) -> PageUpdate {
    match (event, &mut tui.page) {
        (ApiEvent::LoginFinished(result), PageState::Login(page)) => {
            login::on_login_finished(page, result)
        }
        // A login completion can only matter on the login page.
        (ApiEvent::LoginFinished(_), _) => PageUpdate::handled(),

        (ApiEvent::LoggedOut(result), _) => {
            if let Err(err) = result {
                tracing::warn!(error = %err, "failed to clear durable session");
            }
            PageUpdate::handled().with_goto(Route::Login)
        }

        (ApiEvent::ProfileLoaded(result), PageState::Profile(page)) => {
            profile::on_profile_loaded(page, result)
        }
        // Bootstrap fetches (home entry after a restart) only feed the
        // session cache, which the runtime handler already did.
        (ApiEvent::ProfileLoaded(_), _) => PageUpdate::handled(),

        (ApiEvent::PasswordChanged(result), PageState::Profile(page)) => {
            profile::on_password_changed(page, result)
        }
        (ApiEvent::PasswordChanged(_), _) => PageUpdate::handled(),

        (ApiEvent::PostsLoaded(result), PageState::Posts(page)) => {
            posts::on_posts_loaded(page, result)
        }
        (ApiEvent::PostsLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::PostLoaded(result), PageState::PostForm(page)) => {
            post_form::on_post_loaded(page, result)
        }
        (ApiEvent::PostLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::PostSaved(result), PageState::PostForm(page)) => {
            post_form::on_post_saved(page, result)
        }
        (ApiEvent::PostSaved(_), _) => PageUpdate::handled(),
        (ApiEvent::PostDeleted(result), PageState::Posts(page)) => {
            posts::on_post_deleted(page, result)
        }
        (ApiEvent::PostDeleted(_), _) => PageUpdate::handled(),
        (ApiEvent::PostPublication(result), PageState::Posts(page)) => {
            posts::on_post_publication(page, result)
        }
        (ApiEvent::PostPublication(_), _) => PageUpdate::handled(),

        (ApiEvent::CategoriesLoaded(result), PageState::Categories(page)) => {
            categories::on_categories_loaded(page, result)
        }
        (ApiEvent::CategoriesLoaded(result), PageState::PostForm(page)) => {
            if let Ok(roots) = result {
                page.set_categories(&roots);
            }
            PageUpdate::handled()
        }
        (ApiEvent::CategoriesLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::CategoryLoaded(result), PageState::CategoryForm(page)) => {
            category_form::on_category_loaded(page, result)
        }
        (ApiEvent::CategoryLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::CategorySaved(result), PageState::CategoryForm(page)) => {
            category_form::on_category_saved(page, result)
        }
        (ApiEvent::CategorySaved(_), _) => PageUpdate::handled(),
        (ApiEvent::CategoryDeleted(result), PageState::Categories(page)) => {
            categories::on_category_deleted(page, result)
        }
        (ApiEvent::CategoryDeleted(_), _) => PageUpdate::handled(),

        (ApiEvent::TagsLoaded(result), PageState::Tags(page)) => {
            tags::on_tags_loaded(page, result)
        }
        (ApiEvent::TagsLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::TagLoaded(result), PageState::TagForm(page)) => {
            tag_form::on_tag_loaded(page, result)
        }
        (ApiEvent::TagLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::TagSaved(result), PageState::TagForm(page)) => {
            tag_form::on_tag_saved(page, result)
        }
        (ApiEvent::TagSaved(_), _) => PageUpdate::handled(),
        (ApiEvent::TagDeleted(result), PageState::Tags(page)) => {
            tags::on_tag_deleted(page, result)
        }
        (ApiEvent::TagDeleted(_), _) => PageUpdate::handled(),

        (ApiEvent::UsersLoaded(result), PageState::Users(page)) => {
            users::on_users_loaded(page, result)
        }
        (ApiEvent::UsersLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::UserSaved(result), PageState::Users(page)) => {
            users::on_user_saved(page, result)
        }
        (ApiEvent::UserSaved(result), PageState::UserForm(page)) => match result {
            Ok(_) => PageUpdate::handled()
                .with_goto(Route::Users)
                .with_dialog(DialogRequest::success("User registered.")),
            Err(err) => {
                page.saving = false;
                PageUpdate::handled().with_dialog(DialogRequest::error(err.message))
            }
        },
        (ApiEvent::UserSaved(_), _) => PageUpdate::handled(),

        (ApiEvent::FilesLoaded(result), PageState::Files(page)) => {
            files::on_files_loaded(page, result)
        }
        (ApiEvent::FilesLoaded(_), _) => PageUpdate::handled(),
        (ApiEvent::FileUploaded(result), PageState::Files(page)) => {
            files::on_file_uploaded(page, result)
        }
        (ApiEvent::FileUploaded(_), _) => PageUpdate::handled(),
        (ApiEvent::FileDeleted(result), PageState::Files(page)) => {
            files::on_file_deleted(page, result)
        }
        (ApiEvent::FileDeleted(_), _) => PageUpdate::handled(),
    }
}

/// Renders the current page into the body area.
pub fn render(frame: &mut Frame, area: Rect, tui: &TuiState) {
    match &tui.page {
        PageState::Login(page) => login::render(frame, area, page),
        PageState::Home(_) => home::render(frame, area, tui),
        PageState::Posts(page) => posts::render(frame, area, page),
        PageState::PostForm(page) => post_form::render(frame, area, page),
        PageState::Categories(page) => categories::render(frame, area, page),
        PageState::CategoryForm(page) => category_form::render(frame, area, page),
        PageState::Tags(page) => tags::render(frame, area, page),
        PageState::TagForm(page) => tag_form::render(frame, area, page),
        PageState::Users(page) => users::render(frame, area, page),
        PageState::UserForm(page) => user_form::render(frame, area, page),
        PageState::Files(page) => files::render(frame, area, page),
        PageState::Profile(page) => profile::render(frame, area, page),
    }
}
