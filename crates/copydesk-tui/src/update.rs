//! Console reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects. Dialog key routing comes first (the
//! open dialog owns the keyboard), then the current page, then the global
//! bindings.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

use crate::effects::UiEffect;
use crate::events::{ApiEvent, UiEvent};
use crate::features::{self, PageUpdate};
use crate::router::{self, Route};
use crate::state::AppState;

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::ApiStarted => {
            app.tui.loading.show();
            vec![]
        }
        UiEvent::Terminal(terminal_event) => handle_terminal_event(app, terminal_event),
        UiEvent::Api(api_event) => handle_api_event(app, api_event),
    }
}

/// Handles one API completion.
///
/// This is the single interception point layered between the API client's
/// incoming hook and the page handlers: the page sees the original result
/// first (its local state settles), then an expired session triggers
/// exactly one redirect to login. The session itself was already cleared by
/// the client before the event was delivered.
fn handle_api_event(app: &mut AppState, event: ApiEvent) -> Vec<UiEffect> {
    app.tui.loading.hide();

    let session_expired = event
        .error()
        .is_some_and(copydesk_core::api::ApiError::is_session_expired);

    let page_update = features::handle_api_event(&mut app.tui, event);
    let mut effects = apply_page_update(app, page_update);

    if session_expired && app.tui.route != Route::Login {
        tracing::debug!("session expired, redirecting to login");
        effects.extend(router::navigate(&mut app.tui, Route::Login));
    }

    effects
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Mouse(mouse) => {
            if let MouseEventKind::Down(MouseButton::Left) = mouse.kind
                && let Some(closed) = app.dialogs.handle_click(mouse.column, mouse.row)
            {
                let page_update = features::handle_dialog_close(&mut app.tui, &closed);
                return apply_page_update(app, page_update);
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    // Ctrl+C always quits, even while a form or dialog owns the keyboard.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return vec![UiEffect::Quit];
    }

    // The open dialog owns the keyboard.
    if app.dialogs.is_open() {
        if let Some(closed) = app.dialogs.handle_key(key) {
            let page_update = features::handle_dialog_close(&mut app.tui, &closed);
            return apply_page_update(app, page_update);
        }
        return vec![];
    }

    // Give the page the first shot, then fall back to global bindings.
    let page_update = features::handle_key(&mut app.tui, key);
    if page_update.handled {
        return apply_page_update(app, page_update);
    }
    handle_global_key(app, key)
}

fn handle_global_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('q') => vec![UiEffect::Quit],
        KeyCode::Char('l') if ctrl => vec![UiEffect::Logout],
        KeyCode::Char('1') => router::navigate(&mut app.tui, Route::Home),
        KeyCode::Char('2') => router::navigate(&mut app.tui, Route::Posts),
        KeyCode::Char('3') => router::navigate(&mut app.tui, Route::Categories),
        KeyCode::Char('4') => router::navigate(&mut app.tui, Route::Tags),
        KeyCode::Char('5') => router::navigate(&mut app.tui, Route::Users),
        KeyCode::Char('6') => router::navigate(&mut app.tui, Route::Files),
        KeyCode::Char('7') => router::navigate(&mut app.tui, Route::Profile),
        _ => vec![],
    }
}

/// Applies a page handler's requested changes: status note, navigation,
/// dialog opening, and pass-through effects.
fn apply_page_update(app: &mut AppState, page_update: PageUpdate) -> Vec<UiEffect> {
    let PageUpdate {
        handled: _,
        mut effects,
        dialog,
        goto,
        status,
    } = page_update;

    if let Some(status) = status {
        app.tui.status = Some(status);
    }
    if let Some(route) = goto {
        effects.extend(router::navigate(&mut app.tui, route));
    }
    if let Some(request) = dialog {
        // Pages route results through their armed actions when the dialog
        // closes; the handle is for callers that await asynchronously.
        let _handle = app.dialogs.open(request);
    }

    effects
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use copydesk_core::api::{ApiClient, ApiError};
    use copydesk_core::config::Config;
    use copydesk_core::session::{Role, SessionStore, UserProfile};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use tempfile::TempDir;

    use super::*;

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

    fn signed_in_app(dir: &TempDir) -> AppState {
        let session =
            Arc::new(SessionStore::load_from(dir.path().join("session.json")).unwrap());
        session.set_token(Some("tok".to_string())).unwrap();
        session.set_profile(Some(profile(Role::Admin)));
        let config = Config::default();
        let api = Arc::new(ApiClient::new(&config, Arc::clone(&session)).unwrap());
        AppState::new(config, session, api).0
    }

    fn key_event(code: KeyCode) -> UiEvent {
        UiEvent::Terminal(Event::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    #[test]
    fn global_keys_navigate_between_pages() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = signed_in_app(&dir);
        assert_eq!(app.tui.route, Route::Home);

        let effects = update(&mut app, key_event(KeyCode::Char('2')));
        assert_eq!(app.tui.route, Route::Posts);
        assert!(
            effects
                .iter()
                .any(|e| matches!(e, UiEffect::LoadPosts { page: 1, .. }))
        );
    }

    #[test]
    fn quit_key_emits_quit_effect() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = signed_in_app(&dir);
        let effects = update(&mut app, key_event(KeyCode::Char('q')));
        assert!(matches!(effects.as_slice(), [UiEffect::Quit]));
    }

    #[test]
    fn open_dialog_swallows_global_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = signed_in_app(&dir);
        app.dialogs
            .open(crate::dialogs::DialogRequest::error("Boom"));

        let effects = update(&mut app, key_event(KeyCode::Char('q')));
        assert!(effects.is_empty());
        assert!(app.dialogs.is_open());

        // Enter closes the dialog instead of reaching the page.
        update(&mut app, key_event(KeyCode::Enter));
        assert!(!app.dialogs.is_open());
    }

    #[test]
    fn session_expired_completion_redirects_to_login_once() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = signed_in_app(&dir);
        update(&mut app, key_event(KeyCode::Char('2')));
        assert_eq!(app.tui.route, Route::Posts);

        // Simulate what the API client does on a 401 before the completion
        // arrives: the session is already cleared.
        app.tui.session.clear().unwrap();
        update(
            &mut app,
            UiEvent::Api(ApiEvent::PostsLoaded(Err(ApiError::session_expired("")))),
        );

        assert_eq!(app.tui.route, Route::Login);
    }

    #[test]
    fn loading_indicator_follows_start_and_completion() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = signed_in_app(&dir);

        update(&mut app, UiEvent::ApiStarted);
        assert!(app.tui.loading.is_loading());

        update(
            &mut app,
            UiEvent::Api(ApiEvent::PostsLoaded(Err(ApiError::api("nope")))),
        );
        assert!(!app.tui.loading.is_loading());
    }

    #[test]
    fn logout_effect_emitted_on_ctrl_l() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = signed_in_app(&dir);
        let effects = update(
            &mut app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(
                KeyCode::Char('l'),
                KeyModifiers::CONTROL,
            ))),
        );
        assert!(matches!(effects.as_slice(), [UiEffect::Logout]));
    }
}
