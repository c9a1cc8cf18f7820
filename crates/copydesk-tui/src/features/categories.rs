//! Categories list page (flattened tree).

use copydesk_core::api::categories::{Category, flatten_tree};
use copydesk_core::api::ApiError;
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
pub struct CategoriesPage {
    /// Depth-first flattened tree, each row paired with its depth.
    pub rows: Vec<(usize, Category)>,
    pub selected: usize,
    pub pending_delete: Option<String>,
}

impl CategoriesPage {
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            selected: 0,
            pending_delete: None,
        }
    }

    fn selected_category(&self) -> Option<&Category> {
        self.rows.get(self.selected).map(|(_, category)| category)
    }
}

impl Default for CategoriesPage {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_key(page: &mut CategoriesPage, key: KeyEvent) -> PageUpdate {
    match key.code {
        KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
            PageUpdate::handled()
        }
        KeyCode::Down => {
            if page.selected + 1 < page.rows.len() {
                page.selected += 1;
            }
            PageUpdate::handled()
        }
        KeyCode::Char('r') => PageUpdate::handled().with_effect(UiEffect::LoadCategories),
        KeyCode::Char('n') => PageUpdate::handled().with_goto(Route::CategoryCreate),
        KeyCode::Char('e') => match page.selected_category() {
            Some(category) => {
                PageUpdate::handled().with_goto(Route::CategoryEdit(category.id.clone()))
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Char('d') => match page.selected_category() {
            Some(category) => {
                let name = truncate_with_ellipsis(&category.name, 32);
                page.pending_delete = Some(category.id.clone());
                PageUpdate::handled().with_dialog(
                    DialogRequest::confirm(format!(
                        "Delete \"{name}\"? Its posts keep no category."
                    ))
                    .with_title("Delete Category"),
                )
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Esc => PageUpdate::handled().with_goto(Route::Home),
        _ => PageUpdate::ignored(),
    }
}

pub fn on_dialog_close(page: &mut CategoriesPage, result: &Value) -> PageUpdate {
    let pending = page.pending_delete.take();
    match (result.as_bool(), pending) {
        (Some(true), Some(id)) => {
            PageUpdate::handled().with_effect(UiEffect::DeleteCategory { id })
        }
        _ => PageUpdate::handled(),
    }
}

pub fn on_categories_loaded(
    page: &mut CategoriesPage,
    result: Result<Vec<Category>, ApiError>,
) -> PageUpdate {
    match result {
        Ok(roots) => {
            page.rows = flatten_tree(&roots);
            if page.selected >= page.rows.len() {
                page.selected = page.rows.len().saturating_sub(1);
            }
            PageUpdate::handled()
        }
        Err(err) => {
            PageUpdate::handled().with_status(format!("Failed to load categories: {err}"))
        }
    }
}

pub fn on_category_deleted(
    _page: &mut CategoriesPage,
    result: Result<(), ApiError>,
) -> PageUpdate {
    match result {
        Ok(()) => PageUpdate::handled()
            .with_effect(UiEffect::LoadCategories)
            .with_dialog(DialogRequest::success("Category deleted.")),
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &CategoriesPage) {
    let body = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(3),
    );
    let footer = Rect::new(body.x, area.y + area.height.saturating_sub(1), body.width, 1);

    if page.rows.is_empty() {
        render_empty(frame, body, "No categories yet. Press n to add one.");
    } else {
        let rows: Vec<Vec<String>> = page
            .rows
            .iter()
            .map(|(depth, category)| {
                let indent = "  ".repeat(*depth);
                vec![
                    format!("{indent}{}", truncate_with_ellipsis(&category.name, 30)),
                    category.slug.clone().unwrap_or_else(|| "-".to_string()),
                    truncate_with_ellipsis(&category.path, 30),
                    short_date(&category.updated_at),
                ]
            })
            .collect();
        render_table(
            frame,
            body,
            &["Name", "Slug", "Path", "Updated"],
            &[
                Constraint::Min(24),
                Constraint::Length(20),
                Constraint::Min(20),
                Constraint::Length(10),
            ],
            &rows,
            page.selected,
        );
    }

    let hints = [("n", "new"), ("e", "edit"), ("d", "delete"), ("r", "reload")];
    render_list_footer(frame, footer, 1, 1, page.rows.len() as u64, &hints);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn node(id: &str, children: Vec<Category>) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            slug: None,
            parent_id: None,
            path: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            children,
        }
    }

    #[test]
    fn loaded_tree_is_flattened_with_depths() {
        let mut page = CategoriesPage::new();
        on_categories_loaded(
            &mut page,
            Ok(vec![node("a", vec![node("a1", vec![])]), node("b", vec![])]),
        );
        let depths: Vec<usize> = page.rows.iter().map(|(d, _)| *d).collect();
        assert_eq!(depths, vec![0, 1, 0]);
    }

    #[test]
    fn delete_flow_arms_and_fires() {
        let mut page = CategoriesPage::new();
        on_categories_loaded(&mut page, Ok(vec![node("a", vec![])]));

        handle_key(&mut page, key(KeyCode::Char('d')));
        assert_eq!(page.pending_delete.as_deref(), Some("a"));

        let update = on_dialog_close(&mut page, &Value::Bool(true));
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::DeleteCategory { id }] if id == "a"
        ));
    }
}
