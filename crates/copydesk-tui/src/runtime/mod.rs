//! Console runtime - owns the terminal, runs the event loop, executes
//! effects.
//!
//! This is the boundary where side effects happen: the reducer stays pure
//! and produces effects; this module executes them. Async API work is
//! spawned onto tokio and completes into an unbounded inbox channel the
//! loop drains each iteration — completions therefore re-enter the reducer
//! one at a time, never interleaving.

use std::future::Future;
use std::io::Stdout;
use std::sync::Arc;

use anyhow::{Context, Result};
use copydesk_core::api::auth::{ChangePasswordRequest, LoginRequest};
use copydesk_core::api::{ApiClient, ApiError};
use copydesk_core::config::Config;
use copydesk_core::session::SessionStore;
use crossterm::event;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;

use crate::effects::UiEffect;
use crate::events::{ApiEvent, UiEvent};
use crate::state::AppState;
use crate::{render, terminal, update};

/// Tick cadence while requests are in flight (spinner animation).
const ACTIVE_POLL: std::time::Duration = std::time::Duration::from_millis(100);

/// Poll duration when idle; longer timeout reduces CPU usage.
const IDLE_POLL: std::time::Duration = std::time::Duration::from_millis(250);

/// Full-screen console runtime.
///
/// Owns the terminal and state. Terminal state is restored on drop and on
/// panic.
pub struct ConsoleRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: mpsc::UnboundedSender<UiEvent>,
    inbox_rx: mpsc::UnboundedReceiver<UiEvent>,
    /// Effects of the initial navigation, executed when the loop starts.
    startup_effects: Vec<UiEffect>,
    last_tick: std::time::Instant,
}

impl ConsoleRuntime {
    /// Creates a new console runtime and enters the alternate screen.
    pub fn new(
        config: Config,
        session: Arc<SessionStore>,
        api: Arc<ApiClient>,
    ) -> Result<Self> {
        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let (state, startup_effects) = AppState::new(config, session, api);
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            startup_effects,
            last_tick: std::time::Instant::now(),
        })
    }

    /// Runs the main event loop until quit.
    pub fn run(&mut self) -> Result<()> {
        let startup = std::mem::take(&mut self.startup_effects);
        self.execute_effects(startup);

        let mut dirty = true;
        while !self.state.tui.should_quit {
            let events = self.collect_events()?;
            if !events.is_empty() {
                dirty = true;
            }

            for event in events {
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the inbox and the terminal, emitting a tick at
    /// the poll cadence.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Drain inbox - all async API results arrive here
        while let Ok(event) = self.inbox_rx.try_recv() {
            events.push(event);
        }

        let tick_interval = if self.state.tui.loading.is_loading() {
            ACTIVE_POLL
        } else {
            IDLE_POLL
        };

        // Block on terminal input until the next tick is due, unless events
        // are already waiting.
        let poll_duration = if events.is_empty() {
            tick_interval.saturating_sub(self.last_tick.elapsed())
        } else {
            std::time::Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            // Drain any remaining buffered events (non-blocking)
            while event::poll(std::time::Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = std::time::Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        self.execute_effects(effects);
    }

    /// Spawns an async API task; its completion arrives through the inbox.
    ///
    /// Sends `ApiStarted` immediately so the loading indicator reflects the
    /// spawn, not the completion.
    fn spawn_api<F, Fut>(&self, f: F)
    where
        F: FnOnce(Arc<ApiClient>, Arc<SessionStore>) -> Fut + Send + 'static,
        Fut: Future<Output = ApiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let api = Arc::clone(&self.state.tui.api);
        let session = Arc::clone(&self.state.tui.session);
        let _ = tx.send(UiEvent::ApiStarted);
        tokio::spawn(async move {
            let _ = tx.send(UiEvent::Api(f(api, session).await));
        });
    }

    /// Executes a single effect by dispatching to the appropriate handler.
    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }

            UiEffect::Login { email, password } => {
                self.spawn_api(move |api, session| async move {
                    let result = login_pipeline(&api, &session, email, password).await;
                    ApiEvent::LoginFinished(result)
                });
            }
            UiEffect::Logout => {
                // Durable session clearing is fast local I/O; done inline so
                // the redirect is immediate.
                let result = self
                    .state
                    .tui
                    .session
                    .clear()
                    .map_err(|err| err.to_string());
                self.dispatch_event(UiEvent::Api(ApiEvent::LoggedOut(result)));
            }
            UiEffect::FetchProfile => {
                self.spawn_api(|api, session| async move {
                    let result = api.get_profile().await;
                    if let Ok(profile) = &result {
                        session.set_profile(Some(profile.clone()));
                    }
                    ApiEvent::ProfileLoaded(result)
                });
            }
            UiEffect::ChangePassword {
                old_password,
                new_password,
            } => {
                self.spawn_api(move |api, _| async move {
                    let req = ChangePasswordRequest {
                        old_password,
                        new_password,
                    };
                    ApiEvent::PasswordChanged(api.change_password(&req).await)
                });
            }

            UiEffect::LoadPosts { page, status } => {
                let page_size = self.state.tui.config.page_size;
                self.spawn_api(move |api, _| async move {
                    ApiEvent::PostsLoaded(api.list_posts(page, page_size, status).await)
                });
            }
            UiEffect::LoadPost { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::PostLoaded(api.get_post(&id).await)
                });
            }
            UiEffect::SavePost { id, req } => {
                self.spawn_api(move |api, _| async move {
                    let result = match &id {
                        Some(id) => api.update_post(id, &req).await,
                        None => api.create_post(&req).await,
                    };
                    ApiEvent::PostSaved(result)
                });
            }
            UiEffect::DeletePost { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::PostDeleted(api.delete_post(&id).await)
                });
            }
            UiEffect::PublishPost { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::PostPublication(api.publish_post(&id).await)
                });
            }
            UiEffect::UnpublishPost { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::PostPublication(api.unpublish_post(&id).await)
                });
            }

            UiEffect::LoadCategories => {
                self.spawn_api(|api, _| async move {
                    ApiEvent::CategoriesLoaded(api.list_categories().await)
                });
            }
            UiEffect::LoadCategory { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::CategoryLoaded(api.get_category(&id).await)
                });
            }
            UiEffect::SaveCategory { id, req } => {
                self.spawn_api(move |api, _| async move {
                    let result = match &id {
                        Some(id) => api.update_category(id, &req).await,
                        None => api.create_category(&req).await,
                    };
                    ApiEvent::CategorySaved(result)
                });
            }
            UiEffect::DeleteCategory { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::CategoryDeleted(api.delete_category(&id).await)
                });
            }

            UiEffect::LoadTags { page } => {
                let page_size = self.state.tui.config.page_size;
                self.spawn_api(move |api, _| async move {
                    ApiEvent::TagsLoaded(api.list_tags(page, page_size).await)
                });
            }
            UiEffect::LoadTag { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::TagLoaded(api.get_tag(&id).await)
                });
            }
            UiEffect::SaveTag { id, req } => {
                self.spawn_api(move |api, _| async move {
                    let result = match &id {
                        Some(id) => api.update_tag(id, &req).await,
                        None => api.create_tag(&req).await,
                    };
                    ApiEvent::TagSaved(result)
                });
            }
            UiEffect::DeleteTag { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::TagDeleted(api.delete_tag(&id).await)
                });
            }

            UiEffect::LoadUsers { page } => {
                let page_size = self.state.tui.config.page_size;
                self.spawn_api(move |api, _| async move {
                    ApiEvent::UsersLoaded(api.list_users(page, page_size).await)
                });
            }
            UiEffect::RegisterUser { req } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::UserSaved(api.register_user(&req).await)
                });
            }
            UiEffect::SetUserLock { id, locked } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::UserSaved(api.lock_user(&id, locked).await)
                });
            }

            UiEffect::LoadFiles { page } => {
                let page_size = self.state.tui.config.page_size;
                self.spawn_api(move |api, _| async move {
                    ApiEvent::FilesLoaded(api.list_files(page, page_size).await)
                });
            }
            UiEffect::UploadFile { path } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::FileUploaded(api.upload_file(&path).await)
                });
            }
            UiEffect::DeleteFile { id } => {
                self.spawn_api(move |api, _| async move {
                    ApiEvent::FileDeleted(api.delete_file(&id).await)
                });
            }
        }
    }
}

/// The login flow: exchange credentials, persist the token, then cache the
/// profile. A profile fetch failure does not fail the login — the cache is
/// filled lazily later.
async fn login_pipeline(
    api: &ApiClient,
    session: &SessionStore,
    email: String,
    password: String,
) -> Result<(), ApiError> {
    let response = api.login(&LoginRequest { email, password }).await?;
    session
        .set_token(Some(response.access_token))
        .map_err(|err| ApiError::api(format!("Failed to persist session: {err}")))?;

    match api.get_profile().await {
        Ok(profile) => session.set_profile(Some(profile)),
        Err(err) => tracing::warn!(error = %err, "profile fetch after login failed"),
    }
    Ok(())
}

impl Drop for ConsoleRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
