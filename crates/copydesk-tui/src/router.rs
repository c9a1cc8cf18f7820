//! Route table and navigation.
//!
//! Every route transition funnels through [`navigate`], which consults the
//! guard set before entering the target. Guard failures are invisible
//! redirects (login or home), never an error surface. Entering a route
//! builds its page state and returns the effects that load its data — a
//! denied transition therefore never issues the page's requests.

use copydesk_core::guards::{self, GuardVerdict};
use copydesk_core::session::{Role, SessionStore};

use crate::effects::UiEffect;
use crate::features::{
    CategoriesPage, CategoryFormPage, FilesPage, HomePage, LoginPage, PageState, PostFormPage,
    PostsPage, ProfilePage, TagFormPage, TagsPage, UserFormPage, UsersPage,
};
use crate::state::TuiState;

/// Console routes. Form routes carry their edit target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Home,
    Posts,
    PostCreate,
    PostEdit(String),
    Categories,
    CategoryCreate,
    CategoryEdit(String),
    Tags,
    TagCreate,
    TagEdit(String),
    Users,
    UserCreate,
    Files,
    Profile,
}

/// Access policy of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Only reachable while signed out.
    Public,
    /// Requires a token.
    Authenticated,
    /// Requires a token and one of the listed roles.
    Role(&'static [Role]),
}

const CONTENT_ROLES: &[Role] = &[Role::Admin, Role::Writer];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

impl Route {
    pub fn access(&self) -> RouteAccess {
        match self {
            Route::Login => RouteAccess::Public,
            Route::Home | Route::Profile => RouteAccess::Authenticated,
            Route::Posts
            | Route::PostCreate
            | Route::PostEdit(_)
            | Route::Categories
            | Route::CategoryCreate
            | Route::CategoryEdit(_)
            | Route::Tags
            | Route::TagCreate
            | Route::TagEdit(_)
            | Route::Files => RouteAccess::Role(CONTENT_ROLES),
            Route::Users | Route::UserCreate => RouteAccess::Role(ADMIN_ONLY),
        }
    }

    /// Title shown in the header.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Sign in",
            Route::Home => "Home",
            Route::Posts => "Posts",
            Route::PostCreate => "New Post",
            Route::PostEdit(_) => "Edit Post",
            Route::Categories => "Categories",
            Route::CategoryCreate => "New Category",
            Route::CategoryEdit(_) => "Edit Category",
            Route::Tags => "Tags",
            Route::TagCreate => "New Tag",
            Route::TagEdit(_) => "Edit Tag",
            Route::Users => "Users",
            Route::UserCreate => "New User",
            Route::Files => "Files",
            Route::Profile => "Profile",
        }
    }
}

/// Evaluates the target route's guard against the session.
pub fn verdict_for(session: &SessionStore, route: &Route) -> GuardVerdict {
    match route.access() {
        RouteAccess::Public => guards::public_guard(session),
        RouteAccess::Authenticated => guards::auth_guard(session),
        RouteAccess::Role(allowed) => guards::role_guard(session, allowed),
    }
}

/// Performs a route transition, consulting the guards first.
///
/// On a deny verdict the transition is blocked and the redirect target is
/// entered instead. Redirect targets always pass their own guards (login is
/// public-only and only reached without a token; home needs a token and the
/// deny-to-home verdicts only occur with one), so the recursion is bounded.
pub fn navigate(tui: &mut TuiState, route: Route) -> Vec<UiEffect> {
    match verdict_for(&tui.session, &route) {
        GuardVerdict::Allow => enter(tui, route),
        GuardVerdict::ToLogin => {
            if tui.route == Route::Login {
                vec![]
            } else {
                navigate(tui, Route::Login)
            }
        }
        GuardVerdict::ToHome => {
            if tui.route == Route::Home {
                vec![]
            } else {
                navigate(tui, Route::Home)
            }
        }
    }
}

/// Enters an allowed route: swaps the page state in and returns the page's
/// load effects.
fn enter(tui: &mut TuiState, route: Route) -> Vec<UiEffect> {
    tui.status = None;
    let mut effects = Vec::new();

    let page = match &route {
        Route::Login => PageState::Login(LoginPage::new()),
        Route::Home => {
            // A restart leaves a durable token with no profile; refetch so
            // role-gated routes work again.
            if tui.session.profile().is_none() {
                effects.push(UiEffect::FetchProfile);
            }
            PageState::Home(HomePage)
        }
        Route::Posts => {
            effects.push(UiEffect::LoadPosts {
                page: 1,
                status: None,
            });
            PageState::Posts(PostsPage::new())
        }
        Route::PostCreate => {
            effects.push(UiEffect::LoadCategories);
            PageState::PostForm(PostFormPage::create())
        }
        Route::PostEdit(id) => {
            effects.push(UiEffect::LoadPost { id: id.clone() });
            effects.push(UiEffect::LoadCategories);
            PageState::PostForm(PostFormPage::edit(id.clone()))
        }
        Route::Categories => {
            effects.push(UiEffect::LoadCategories);
            PageState::Categories(CategoriesPage::new())
        }
        Route::CategoryCreate => PageState::CategoryForm(CategoryFormPage::create()),
        Route::CategoryEdit(id) => {
            effects.push(UiEffect::LoadCategory { id: id.clone() });
            PageState::CategoryForm(CategoryFormPage::edit(id.clone()))
        }
        Route::Tags => {
            effects.push(UiEffect::LoadTags { page: 1 });
            PageState::Tags(TagsPage::new())
        }
        Route::TagCreate => PageState::TagForm(TagFormPage::create()),
        Route::TagEdit(id) => {
            effects.push(UiEffect::LoadTag { id: id.clone() });
            PageState::TagForm(TagFormPage::edit(id.clone()))
        }
        Route::Users => {
            effects.push(UiEffect::LoadUsers { page: 1 });
            PageState::Users(UsersPage::new())
        }
        Route::UserCreate => PageState::UserForm(UserFormPage::new()),
        Route::Files => {
            effects.push(UiEffect::LoadFiles { page: 1 });
            PageState::Files(FilesPage::new())
        }
        Route::Profile => {
            effects.push(UiEffect::FetchProfile);
            PageState::Profile(ProfilePage::new())
        }
    };

    tracing::debug!(route = route.title(), "entering route");
    tui.route = route;
    tui.page = page;
    effects
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use copydesk_core::api::ApiClient;
    use copydesk_core::config::Config;
    use copydesk_core::session::UserProfile;
    use tempfile::TempDir;

    use super::*;
    use crate::state::AppState;

    fn profile(role: Role) -> UserProfile {
        UserProfile {
            id: "u-1".to_string(),
            full_name: "Jane Doe".to_string(),
            email: "jane@example.com".to_string(),
            date_of_birth: None,
            role,
            locked: false,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn app(dir: &TempDir) -> AppState {
        let session =
            Arc::new(SessionStore::load_from(dir.path().join("session.json")).unwrap());
        let config = Config::default();
        let api = Arc::new(ApiClient::new(&config, Arc::clone(&session)).unwrap());
        AppState::new(config, session, api).0
    }

    #[test]
    fn startup_without_token_lands_on_login() {
        let dir = tempfile::tempdir().unwrap();
        let app = app(&dir);
        assert_eq!(app.tui.route, Route::Login);
    }

    #[test]
    fn startup_with_durable_token_lands_on_home() {
        let dir = tempfile::tempdir().unwrap();
        {
            let session =
                SessionStore::load_from(dir.path().join("session.json")).unwrap();
            session.set_token(Some("tok".to_string())).unwrap();
        }
        let app = app(&dir);
        assert_eq!(app.tui.route, Route::Home);
    }

    #[test]
    fn login_route_bounces_authenticated_sessions_home() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.tui.session.set_token(Some("tok".to_string())).unwrap();
        navigate(&mut app.tui, Route::Home);

        navigate(&mut app.tui, Route::Login);
        assert_eq!(app.tui.route, Route::Home);
    }

    #[test]
    fn admin_route_redirects_writer_home_without_loading_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.tui.session.set_token(Some("tok".to_string())).unwrap();
        app.tui.session.set_profile(Some(profile(Role::Writer)));
        navigate(&mut app.tui, Route::Home);

        let effects = navigate(&mut app.tui, Route::Users);

        assert_eq!(app.tui.route, Route::Home);
        // The denied page's own data request is never issued.
        assert!(
            !effects
                .iter()
                .any(|effect| matches!(effect, UiEffect::LoadUsers { .. }))
        );
    }

    #[test]
    fn admin_route_allows_admin() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.tui.session.set_token(Some("tok".to_string())).unwrap();
        app.tui.session.set_profile(Some(profile(Role::Admin)));

        let effects = navigate(&mut app.tui, Route::Users);

        assert_eq!(app.tui.route, Route::Users);
        assert!(
            effects
                .iter()
                .any(|effect| matches!(effect, UiEffect::LoadUsers { page: 1 }))
        );
    }

    #[test]
    fn content_routes_require_writer_or_admin() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);
        app.tui.session.set_token(Some("tok".to_string())).unwrap();
        app.tui.session.set_profile(Some(profile(Role::Guest)));
        navigate(&mut app.tui, Route::Home);

        navigate(&mut app.tui, Route::Posts);
        assert_eq!(app.tui.route, Route::Home);

        app.tui.session.set_profile(Some(profile(Role::Writer)));
        navigate(&mut app.tui, Route::Posts);
        assert_eq!(app.tui.route, Route::Posts);
    }

    #[test]
    fn unauthenticated_deep_route_redirects_to_login() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(&dir);

        navigate(&mut app.tui, Route::PostEdit("p-1".to_string()));

        assert_eq!(app.tui.route, Route::Login);
    }
}
