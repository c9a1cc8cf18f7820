//! User registration form (admin only).

use copydesk_core::api::users::RegisterRequest;
use copydesk_core::session::Role;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::PageUpdate;
use crate::common::{Form, FormKey, TextField, render_form};
use crate::effects::UiEffect;
use crate::router::Route;

const FULL_NAME: usize = 0;
const EMAIL: usize = 1;
const PASSWORD: usize = 2;
const ROLE: usize = 3;
const DATE_OF_BIRTH: usize = 4;

#[derive(Debug)]
pub struct UserFormPage {
    pub form: Form,
    pub saving: bool,
}

impl UserFormPage {
    pub fn new() -> Self {
        Self {
            form: Form::new(vec![
                TextField::new("Full name"),
                TextField::new("Email"),
                TextField::masked("Password"),
                TextField::new("Role (admin/writer/guest)"),
                TextField::new("Date of birth (optional)"),
            ]),
            saving: false,
        }
    }
}

impl Default for UserFormPage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_key(page: &mut UserFormPage, key: KeyEvent) -> PageUpdate {
    if page.saving {
        return PageUpdate::handled();
    }

    match page.form.handle_key(key) {
        FormKey::Consumed => PageUpdate::handled(),
        FormKey::Cancel => PageUpdate::handled().with_goto(Route::Users),
        FormKey::Submit => {
            if page.form.value(FULL_NAME).is_empty() {
                page.form.error = Some("Full name is required.".to_string());
                return PageUpdate::handled();
            }
            let email = page.form.value(EMAIL);
            if email.is_empty() || !email.contains('@') || !email.contains('.') {
                page.form.error = Some("Enter a valid email address.".to_string());
                return PageUpdate::handled();
            }
            if page.form.value(PASSWORD).chars().count() < 6 {
                page.form.error = Some("Password must be at least 6 characters.".to_string());
                return PageUpdate::handled();
            }
            let role = match page.form.optional(ROLE) {
                None => None,
                Some(text) => match Role::from_id(&text) {
                    Some(role) => Some(role),
                    None => {
                        page.form.error =
                            Some("Role must be admin, writer or guest.".to_string());
                        return PageUpdate::handled();
                    }
                },
            };

            page.saving = true;
            let req = RegisterRequest {
                full_name: page.form.value(FULL_NAME).to_string(),
                email: email.to_string(),
                password: page.form.value(PASSWORD).to_string(),
                date_of_birth: page.form.optional(DATE_OF_BIRTH),
                role,
            };
            PageUpdate::handled().with_effect(UiEffect::RegisterUser { req })
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &UserFormPage) {
    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );
    render_form(frame, inner, &page.form, Color::Cyan);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyModifiers};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn filled_page() -> UserFormPage {
        let mut page = UserFormPage::new();
        page.form.set_value(FULL_NAME, "Jane Doe");
        page.form.set_value(EMAIL, "jane@example.com");
        page.form.set_value(PASSWORD, "hunter22");
        page
    }

    #[test]
    fn invalid_role_is_rejected() {
        let mut page = filled_page();
        page.form.set_value(ROLE, "editor");
        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert!(page.form.error.is_some());
    }

    #[test]
    fn empty_role_defers_to_server_default() {
        let mut page = filled_page();
        let update = handle_key(&mut page, key(KeyCode::Enter));
        match update.effects.as_slice() {
            [UiEffect::RegisterUser { req }] => assert!(req.role.is_none()),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn explicit_role_is_parsed() {
        let mut page = filled_page();
        page.form.set_value(ROLE, "writer");
        let update = handle_key(&mut page, key(KeyCode::Enter));
        match update.effects.as_slice() {
            [UiEffect::RegisterUser { req }] => assert_eq!(req.role, Some(Role::Writer)),
            other => panic!("unexpected effects: {other:?}"),
        }
    }
}
