//! Sign-in page.

use copydesk_core::api::ApiError;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::PageUpdate;
use crate::common::{Form, FormKey, TextField, render_form};
use crate::dialogs::DialogRequest;
use crate::effects::UiEffect;
use crate::router::Route;

const EMAIL: usize = 0;
const PASSWORD: usize = 1;

#[derive(Debug)]
pub struct LoginPage {
    pub form: Form,
    pub submitting: bool,
}

impl LoginPage {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![TextField::new("Email"), TextField::masked("Password")]),
            submitting: false,
        }
    }
}

impl Default for LoginPage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_key(page: &mut LoginPage, key: KeyEvent) -> PageUpdate {
    if page.submitting {
        // Don't let a second submit race the first.
        return PageUpdate::handled();
    }

    match page.form.handle_key(key) {
        FormKey::Consumed | FormKey::Cancel => PageUpdate::handled(),
        FormKey::Submit => {
            let email = page.form.value(EMAIL).to_string();
            let password = page.form.value(PASSWORD).to_string();

            // Presence/format checks only; the server owns real validation.
            if email.is_empty() || !email.contains('@') || !email.contains('.') {
                page.form.error = Some("Enter a valid email address.".to_string());
                return PageUpdate::handled();
            }
            if password.chars().count() < 6 {
                page.form.error = Some("Password must be at least 6 characters.".to_string());
                return PageUpdate::handled();
            }

            page.submitting = true;
            PageUpdate::handled().with_effect(UiEffect::Login { email, password })
        }
    }
}

pub fn on_login_finished(page: &mut LoginPage, result: Result<(), ApiError>) -> PageUpdate {
    match result {
        Ok(()) => PageUpdate::handled().with_goto(Route::Home),
        Err(err) => {
            page.submitting = false;
            PageUpdate::handled()
                .with_dialog(DialogRequest::error(err.message).with_title("Sign-in failed"))
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &LoginPage) {
    let width = 48.min(area.width.saturating_sub(4));
    let height = 12.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" copydesk — sign in ")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
    frame.render_widget(block, popup);

    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );
    render_form(frame, inner, &page.form, Color::Cyan);

    let footer = Rect::new(inner.x, inner.y + inner.height.saturating_sub(1), inner.width, 1);
    let hint = if page.submitting {
        Line::from(Span::styled(
            "Signing in...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Cyan)),
            Span::styled(" sign in • ", Style::default().fg(Color::DarkGray)),
            Span::styled("Tab", Style::default().fg(Color::Cyan)),
            Span::styled(" next field", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(Paragraph::new(hint), footer);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(page: &mut LoginPage, text: &str) {
        for c in text.chars() {
            handle_key(page, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn submit_with_bad_email_sets_error_and_no_effect() {
        let mut page = LoginPage::new();
        type_text(&mut page, "not-an-email");
        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert!(page.form.error.is_some());
        assert!(!page.submitting);
    }

    #[test]
    fn submit_with_short_password_sets_error() {
        let mut page = LoginPage::new();
        type_text(&mut page, "jane@example.com");
        handle_key(&mut page, key(KeyCode::Tab));
        type_text(&mut page, "abc");
        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert!(page.form.error.is_some());
    }

    #[test]
    fn valid_submit_emits_login_effect() {
        let mut page = LoginPage::new();
        type_text(&mut page, "jane@example.com");
        handle_key(&mut page, key(KeyCode::Tab));
        type_text(&mut page, "hunter22");

        let update = handle_key(&mut page, key(KeyCode::Enter));

        assert!(page.submitting);
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::Login { email, password }]
                if email == "jane@example.com" && password == "hunter22"
        ));

        // Further keys are swallowed while submitting.
        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
    }

    #[test]
    fn failed_login_surfaces_error_dialog_with_server_message() {
        let mut page = LoginPage::new();
        page.submitting = true;

        let update = on_login_finished(
            &mut page,
            Err(ApiError::session_expired(
                r#"{"success": false, "message": "Invalid credentials"}"#,
            )),
        );

        assert!(!page.submitting);
        let dialog = update.dialog.expect("error dialog");
        assert_eq!(dialog.message(), Some("Invalid credentials"));
    }

    #[test]
    fn successful_login_navigates_home() {
        let mut page = LoginPage::new();
        let update = on_login_finished(&mut page, Ok(()));
        assert_eq!(update.goto, Some(Route::Home));
    }
}
