//! Application state composition.
//!
//! Top-level state hierarchy for the console:
//!
//! ```text
//! AppState
//! ├── tui: TuiState          (route, page, session, loading, ...)
//! └── dialogs: DialogBroker  (the single modal slot)
//! ```
//!
//! State is split between `TuiState` and the broker so dialog handlers and
//! page state can be borrowed independently.

use std::sync::Arc;

use copydesk_core::api::ApiClient;
use copydesk_core::config::Config;
use copydesk_core::session::{SessionStore, UserProfile};
use tokio::sync::watch;

use crate::dialogs::DialogBroker;
use crate::effects::UiEffect;
use crate::features::{LoginPage, PageState};
use crate::router::{self, Route};

/// Combined application state for the console.
pub struct AppState {
    pub tui: TuiState,
    pub dialogs: DialogBroker,
}

impl AppState {
    /// Creates the initial state and the effects of the first navigation.
    ///
    /// The first transition targets home; the guards bounce it to the login
    /// route when no durable token survived.
    pub fn new(
        config: Config,
        session: Arc<SessionStore>,
        api: Arc<ApiClient>,
    ) -> (Self, Vec<UiEffect>) {
        let profile_rx = session.subscribe();
        let mut tui = TuiState {
            should_quit: false,
            config,
            session,
            api,
            profile_rx,
            route: Route::Login,
            page: PageState::Login(LoginPage::new()),
            loading: Loading::default(),
            spinner_frame: 0,
            status: None,
        };
        let effects = router::navigate(&mut tui, Route::Home);
        (
            Self {
                tui,
                dialogs: DialogBroker::new(),
            },
            effects,
        )
    }
}

/// Console state (everything except the dialog slot).
pub struct TuiState {
    /// Flag indicating the app should quit.
    pub should_quit: bool,
    /// Loaded configuration.
    pub config: Config,
    /// Shared session store (token + profile).
    pub session: Arc<SessionStore>,
    /// Shared API client.
    pub api: Arc<ApiClient>,
    /// Replay-latest subscription to profile changes; the header renders
    /// from this receiver.
    pub profile_rx: watch::Receiver<Option<UserProfile>>,
    /// Current route.
    pub route: Route,
    /// State of the page the route materialized.
    pub page: PageState,
    /// In-flight request indicator.
    pub loading: Loading,
    /// Spinner animation frame counter.
    pub spinner_frame: usize,
    /// Transient status line message (minor errors, notices).
    pub status: Option<String>,
}

impl TuiState {
    /// Current profile as seen through the replay-latest subscription.
    pub fn current_profile(&self) -> Option<UserProfile> {
        self.profile_rx.borrow().clone()
    }
}

/// Counter-based loading indicator: one show per spawned request, one hide
/// per completion.
#[derive(Debug, Default)]
pub struct Loading {
    active: usize,
}

impl Loading {
    pub fn show(&mut self) {
        self.active += 1;
    }

    pub fn hide(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn is_loading(&self) -> bool {
        self.active > 0
    }
}
