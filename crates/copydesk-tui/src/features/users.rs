//! User administration page (admin only, enforced by the route guard).

use copydesk_core::api::{ApiError, Page};
use copydesk_core::session::UserProfile;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use serde_json::Value;

use super::PageUpdate;
use crate::common::{render_empty, render_list_footer, render_table, short_date, truncate_with_ellipsis};
use crate::dialogs::DialogRequest;
use crate::effects::UiEffect;
use crate::router::Route;

#[derive(Debug)]
pub struct UsersPage {
    pub users: Vec<UserProfile>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub selected: usize,
    /// Armed lock/unlock: (user id, target locked state).
    pub pending_lock: Option<(String, bool)>,
}

impl UsersPage {
    pub fn new() -> Self {
        Self {
            users: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 0,
            selected: 0,
            pending_lock: None,
        }
    }

    fn selected_user(&self) -> Option<&UserProfile> {
        self.users.get(self.selected)
    }
}

impl Default for UsersPage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_key(page: &mut UsersPage, key: KeyEvent) -> PageUpdate {
    match key.code {
        KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
            PageUpdate::handled()
        }
        KeyCode::Down => {
            if page.selected + 1 < page.users.len() {
                page.selected += 1;
            }
            PageUpdate::handled()
        }
        KeyCode::Left if page.page > 1 => {
            page.page -= 1;
            PageUpdate::handled().with_effect(UiEffect::LoadUsers { page: page.page })
        }
        KeyCode::Right if page.page < page.total_pages => {
            page.page += 1;
            PageUpdate::handled().with_effect(UiEffect::LoadUsers { page: page.page })
        }
        KeyCode::Char('r') => {
            PageUpdate::handled().with_effect(UiEffect::LoadUsers { page: page.page })
        }
        KeyCode::Char('n') => PageUpdate::handled().with_goto(Route::UserCreate),
        KeyCode::Char('k') => match page.selected_user() {
            Some(user) => {
                let target = !user.locked;
                let verb = if target { "Lock" } else { "Unlock" };
                let name = truncate_with_ellipsis(&user.full_name, 32);
                page.pending_lock = Some((user.id.clone(), target));
                PageUpdate::handled().with_dialog(
                    DialogRequest::warning(format!("{verb} the account of \"{name}\"?"))
                        .with_title(format!("{verb} User")),
                )
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Esc => PageUpdate::handled().with_goto(Route::Home),
        _ => PageUpdate::ignored(),
    }
}

pub fn on_dialog_close(page: &mut UsersPage, result: &Value) -> PageUpdate {
    let pending = page.pending_lock.take();
    match (result.as_bool(), pending) {
        (Some(true), Some((id, locked))) => {
            PageUpdate::handled().with_effect(UiEffect::SetUserLock { id, locked })
        }
        _ => PageUpdate::handled(),
    }
}

pub fn on_users_loaded(
    page: &mut UsersPage,
    result: Result<Page<UserProfile>, ApiError>,
) -> PageUpdate {
    match result {
        Ok(data) => {
            page.total = data.total;
            page.page = data.page;
            page.total_pages = data.total_pages();
            page.users = data.items;
            if page.selected >= page.users.len() {
                page.selected = page.users.len().saturating_sub(1);
            }
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled().with_status(format!("Failed to load users: {err}")),
    }
}

pub fn on_user_saved(page: &mut UsersPage, result: Result<UserProfile, ApiError>) -> PageUpdate {
    match result {
        Ok(user) => {
            let message = if user.locked {
                "User locked."
            } else {
                "User unlocked."
            };
            if let Some(existing) = page.users.iter_mut().find(|u| u.id == user.id) {
                *existing = user;
            }
            PageUpdate::handled().with_dialog(DialogRequest::success(message))
        }
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &UsersPage) {
    let body = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(3),
    );
    let footer = Rect::new(body.x, area.y + area.height.saturating_sub(1), body.width, 1);

    if page.users.is_empty() {
        render_empty(frame, body, "No users.");
    } else {
        let rows: Vec<Vec<String>> = page
            .users
            .iter()
            .map(|user| {
                vec![
                    truncate_with_ellipsis(&user.full_name, 26),
                    truncate_with_ellipsis(&user.email, 30),
                    user.role.label().to_string(),
                    if user.locked { "locked" } else { "-" }.to_string(),
                    short_date(&user.created_at),
                ]
            })
            .collect();
        render_table(
            frame,
            body,
            &["Name", "Email", "Role", "Locked", "Created"],
            &[
                Constraint::Min(20),
                Constraint::Min(24),
                Constraint::Length(8),
                Constraint::Length(8),
                Constraint::Length(10),
            ],
            &rows,
            page.selected,
        );
    }

    let hints = [("n", "new"), ("k", "lock/unlock"), ("←→", "page")];
    render_list_footer(frame, footer, page.page, page.total_pages, page.total, &hints);
}

#[cfg(test)]
mod tests {
    use copydesk_core::session::Role;
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn user(id: &str, locked: bool) -> UserProfile {
        UserProfile {
            id: id.to_string(),
            full_name: format!("User {id}"),
            email: format!("{id}@example.com"),
            date_of_birth: None,
            role: Role::Writer,
            locked,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn lock_key_arms_opposite_of_current_state() {
        let mut page = UsersPage::new();
        on_users_loaded(
            &mut page,
            Ok(Page {
                items: vec![user("a", false), user("b", true)],
                total: 2,
                page: 1,
                page_size: 10,
            }),
        );

        handle_key(&mut page, key(KeyCode::Char('k')));
        assert_eq!(page.pending_lock, Some(("a".to_string(), true)));

        page.selected = 1;
        handle_key(&mut page, key(KeyCode::Char('k')));
        assert_eq!(page.pending_lock, Some(("b".to_string(), false)));
    }

    #[test]
    fn confirmed_lock_emits_effect() {
        let mut page = UsersPage::new();
        page.pending_lock = Some(("a".to_string(), true));

        let update = on_dialog_close(&mut page, &Value::Bool(true));
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::SetUserLock { id, locked: true }] if id == "a"
        ));
    }
}
