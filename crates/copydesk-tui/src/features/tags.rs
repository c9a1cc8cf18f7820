//! Tags list page.

use copydesk_core::api::tags::Tag;
use copydesk_core::api::{ApiError, Page};
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
pub struct TagsPage {
    pub tags: Vec<Tag>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub selected: usize,
    pub pending_delete: Option<String>,
}

impl TagsPage {
    pub fn new() -> Self {
        Self {
            tags: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 0,
            selected: 0,
            pending_delete: None,
        }
    }

    fn selected_tag(&self) -> Option<&Tag> {
        self.tags.get(self.selected)
    }
}

impl Default for TagsPage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_key(page: &mut TagsPage, key: KeyEvent) -> PageUpdate {
    match key.code {
        KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
            PageUpdate::handled()
        }
        KeyCode::Down => {
            if page.selected + 1 < page.tags.len() {
                page.selected += 1;
            }
            PageUpdate::handled()
        }
        KeyCode::Left if page.page > 1 => {
            page.page -= 1;
            PageUpdate::handled().with_effect(UiEffect::LoadTags { page: page.page })
        }
        KeyCode::Right if page.page < page.total_pages => {
            page.page += 1;
            PageUpdate::handled().with_effect(UiEffect::LoadTags { page: page.page })
        }
        KeyCode::Char('r') => {
            PageUpdate::handled().with_effect(UiEffect::LoadTags { page: page.page })
        }
        KeyCode::Char('n') => PageUpdate::handled().with_goto(Route::TagCreate),
        KeyCode::Char('e') => match page.selected_tag() {
            Some(tag) => PageUpdate::handled().with_goto(Route::TagEdit(tag.id.clone())),
            None => PageUpdate::handled(),
        },
        KeyCode::Char('d') => match page.selected_tag() {
            Some(tag) => {
                let name = truncate_with_ellipsis(&tag.name, 32);
                let usage_count = tag.usage_count;
                page.pending_delete = Some(tag.id.clone());
                PageUpdate::handled().with_dialog(
                    DialogRequest::confirm(format!(
                        "Delete \"{name}\"? It is used by {usage_count} posts.",
                    ))
                    .with_title("Delete Tag"),
                )
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Esc => PageUpdate::handled().with_goto(Route::Home),
        _ => PageUpdate::ignored(),
    }
}

pub fn on_dialog_close(page: &mut TagsPage, result: &Value) -> PageUpdate {
    let pending = page.pending_delete.take();
    match (result.as_bool(), pending) {
        (Some(true), Some(id)) => PageUpdate::handled().with_effect(UiEffect::DeleteTag { id }),
        _ => PageUpdate::handled(),
    }
}

pub fn on_tags_loaded(page: &mut TagsPage, result: Result<Page<Tag>, ApiError>) -> PageUpdate {
    match result {
        Ok(data) => {
            page.total = data.total;
            page.page = data.page;
            page.total_pages = data.total_pages();
            page.tags = data.items;
            if page.selected >= page.tags.len() {
                page.selected = page.tags.len().saturating_sub(1);
            }
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled().with_status(format!("Failed to load tags: {err}")),
    }
}

pub fn on_tag_deleted(page: &mut TagsPage, result: Result<(), ApiError>) -> PageUpdate {
    match result {
        Ok(()) => PageUpdate::handled()
            .with_effect(UiEffect::LoadTags { page: page.page })
            .with_dialog(DialogRequest::success("Tag deleted.")),
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &TagsPage) {
    let body = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(3),
    );
    let footer = Rect::new(body.x, area.y + area.height.saturating_sub(1), body.width, 1);

    if page.tags.is_empty() {
        render_empty(frame, body, "No tags yet. Press n to add one.");
    } else {
        let rows: Vec<Vec<String>> = page
            .tags
            .iter()
            .map(|tag| {
                vec![
                    truncate_with_ellipsis(&tag.name, 28),
                    tag.slug.as_str().to_string(),
                    tag.usage_count.to_string(),
                    short_date(&tag.updated_at),
                ]
            })
            .collect();
        render_table(
            frame,
            body,
            &["Name", "Slug", "Usage", "Updated"],
            &[
                Constraint::Min(20),
                Constraint::Length(24),
                Constraint::Length(7),
                Constraint::Length(10),
            ],
            &rows,
            page.selected,
        );
    }

    let hints = [("n", "new"), ("e", "edit"), ("d", "delete"), ("←→", "page")];
    render_list_footer(frame, footer, page.page, page.total_pages, page.total, &hints);
}
