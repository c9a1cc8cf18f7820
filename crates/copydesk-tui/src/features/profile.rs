//! Profile page: the signed-in user's details plus password change.

use copydesk_core::api::ApiError;
use copydesk_core::session::UserProfile;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::PageUpdate;
use crate::common::{Form, FormKey, TextField, render_form, short_date};
use crate::dialogs::DialogRequest;
use crate::effects::UiEffect;
use crate::router::Route;

const OLD_PASSWORD: usize = 0;
const NEW_PASSWORD: usize = 1;
const CONFIRM_PASSWORD: usize = 2;

#[derive(Debug)]
pub struct ProfilePage {
    /// Freshly fetched profile for display (the session cache is updated by
    /// the fetch handler as well).
    pub user: Option<UserProfile>,
    pub password_form: Option<Form>,
}

impl ProfilePage {
    pub fn new() -> Self {
        Self {
            user: None,
            password_form: None,
        }
    }
}

impl Default for ProfilePage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_key(page: &mut ProfilePage, key: KeyEvent) -> PageUpdate {
    if let Some(form) = &mut page.password_form {
        return match form.handle_key(key) {
            FormKey::Consumed => PageUpdate::handled(),
            FormKey::Cancel => {
                page.password_form = None;
                PageUpdate::handled()
            }
            FormKey::Submit => {
                if form.value(OLD_PASSWORD).is_empty() {
                    form.error = Some("Current password is required.".to_string());
                    return PageUpdate::handled();
                }
                if form.value(NEW_PASSWORD).chars().count() < 6 {
                    form.error =
                        Some("New password must be at least 6 characters.".to_string());
                    return PageUpdate::handled();
                }
                if form.value(NEW_PASSWORD) != form.value(CONFIRM_PASSWORD) {
                    form.error = Some("Passwords do not match.".to_string());
                    return PageUpdate::handled();
                }
                let effect = UiEffect::ChangePassword {
                    old_password: form.value(OLD_PASSWORD).to_string(),
                    new_password: form.value(NEW_PASSWORD).to_string(),
                };
                PageUpdate::handled().with_effect(effect)
            }
        };
    }

    match key.code {
        KeyCode::Char('w') => {
            page.password_form = Some(Form::new(vec![
                TextField::masked("Current password"),
                TextField::masked("New password"),
                TextField::masked("Confirm new password"),
            ]));
            PageUpdate::handled()
        }
        KeyCode::Char('r') => PageUpdate::handled().with_effect(UiEffect::FetchProfile),
        KeyCode::Esc => PageUpdate::handled().with_goto(Route::Home),
        _ => PageUpdate::ignored(),
    }
}

pub fn on_profile_loaded(
    page: &mut ProfilePage,
    result: Result<UserProfile, ApiError>,
) -> PageUpdate {
    match result {
        Ok(user) => {
            page.user = Some(user);
            PageUpdate::handled()
        }
        // The original console swallows profile fetch errors; surface a
        // status note only.
        Err(err) => PageUpdate::handled().with_status(format!("Failed to load profile: {err}")),
    }
}

pub fn on_password_changed(page: &mut ProfilePage, result: Result<(), ApiError>) -> PageUpdate {
    match result {
        Ok(()) => {
            page.password_form = None;
            PageUpdate::handled().with_dialog(DialogRequest::success("Password changed."))
        }
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &ProfilePage) {
    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );

    if let Some(form) = &page.password_form {
        render_form(frame, inner, form, Color::Cyan);
        return;
    }

    let mut lines = Vec::new();
    match &page.user {
        Some(user) => {
            let detail = |label: &str, value: String| {
                Line::from(vec![
                    Span::styled(format!("{label:<16}"), Style::default().fg(Color::DarkGray)),
                    Span::styled(value, Style::default().fg(Color::White)),
                ])
            };
            lines.push(detail("Name", user.full_name.clone()));
            lines.push(detail("Email", user.email.clone()));
            lines.push(detail("Role", user.role.label().to_string()));
            lines.push(detail(
                "Date of birth",
                user.date_of_birth.clone().unwrap_or_else(|| "-".to_string()),
            ));
            lines.push(detail(
                "Locked",
                if user.locked { "yes" } else { "no" }.to_string(),
            ));
            lines.push(detail("Member since", short_date(&user.created_at)));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Loading profile...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled("w", Style::default().fg(Color::Cyan)),
        Span::styled(" change password • ", Style::default().fg(Color::DarkGray)),
        Span::styled("r", Style::default().fg(Color::Cyan)),
        Span::styled(" refresh", Style::default().fg(Color::DarkGray)),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(page: &mut ProfilePage, text: &str) {
        for c in text.chars() {
            handle_key(page, key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn mismatched_passwords_are_rejected() {
        let mut page = ProfilePage::new();
        handle_key(&mut page, key(KeyCode::Char('w')));
        type_text(&mut page, "oldpass");
        handle_key(&mut page, key(KeyCode::Tab));
        type_text(&mut page, "newpass1");
        handle_key(&mut page, key(KeyCode::Tab));
        type_text(&mut page, "newpass2");

        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert!(page.password_form.as_ref().unwrap().error.is_some());
    }

    #[test]
    fn matching_passwords_emit_change_effect() {
        let mut page = ProfilePage::new();
        handle_key(&mut page, key(KeyCode::Char('w')));
        type_text(&mut page, "oldpass");
        handle_key(&mut page, key(KeyCode::Tab));
        type_text(&mut page, "newpass1");
        handle_key(&mut page, key(KeyCode::Tab));
        type_text(&mut page, "newpass1");

        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::ChangePassword { old_password, new_password }]
                if old_password == "oldpass" && new_password == "newpass1"
        ));
    }
}
