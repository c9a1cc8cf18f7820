//! Category create/edit form.

use copydesk_core::api::categories::{Category, CategoryCreateRequest};
use copydesk_core::api::ApiError;
use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;

use super::PageUpdate;
use crate::common::{Form, FormKey, TextField, render_form};
use crate::dialogs::DialogRequest;
use crate::effects::UiEffect;
use crate::router::Route;

const NAME: usize = 0;
const SLUG: usize = 1;
const DESCRIPTION: usize = 2;
const PARENT: usize = 3;

#[derive(Debug)]
pub struct CategoryFormPage {
    pub id: Option<String>,
    pub form: Form,
    pub loading: bool,
    pub saving: bool,
}

impl CategoryFormPage {
    pub fn create() -> Self {
        Self {
            id: None,
            form: Form::new(vec![
                TextField::new("Name"),
                TextField::new("Slug"),
                TextField::new("Description"),
                TextField::new("Parent category id"),
            ]),
            loading: false,
            saving: false,
        }
    }

    pub fn edit(id: String) -> Self {
        Self {
            id: Some(id),
            loading: true,
            ..Self::create()
        }
    }

    pub fn fill(&mut self, category: &Category) {
        self.form.set_value(NAME, category.name.clone());
        self.form
            .set_value(SLUG, category.slug.clone().unwrap_or_default());
        self.form
            .set_value(DESCRIPTION, category.description.clone().unwrap_or_default());
        self.form
            .set_value(PARENT, category.parent_id.clone().unwrap_or_default());
        self.loading = false;
    }
}

pub fn handle_key(page: &mut CategoryFormPage, key: KeyEvent) -> PageUpdate {
    if page.saving || page.loading {
        return PageUpdate::handled();
    }

    match page.form.handle_key(key) {
        FormKey::Consumed => PageUpdate::handled(),
        FormKey::Cancel => PageUpdate::handled().with_goto(Route::Categories),
        FormKey::Submit => {
            if page.form.value(NAME).is_empty() {
                page.form.error = Some("Name is required.".to_string());
                return PageUpdate::handled();
            }
            page.saving = true;
            let req = CategoryCreateRequest {
                name: page.form.value(NAME).to_string(),
                description: page.form.optional(DESCRIPTION),
                parent_id: page.form.optional(PARENT),
                slug: page.form.optional(SLUG),
            };
            PageUpdate::handled().with_effect(UiEffect::SaveCategory {
                id: page.id.clone(),
                req,
            })
        }
    }
}

pub fn on_category_loaded(
    page: &mut CategoryFormPage,
    result: Result<Category, ApiError>,
) -> PageUpdate {
    match result {
        Ok(category) => {
            page.fill(&category);
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled()
            .with_goto(Route::Categories)
            .with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn on_category_saved(
    page: &mut CategoryFormPage,
    result: Result<Category, ApiError>,
) -> PageUpdate {
    match result {
        Ok(_) => PageUpdate::handled()
            .with_goto(Route::Categories)
            .with_dialog(DialogRequest::success("Category saved.")),
        Err(err) => {
            page.saving = false;
            PageUpdate::handled().with_dialog(DialogRequest::error(err.message))
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &CategoryFormPage) {
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

    #[test]
    fn submit_requires_name() {
        let mut page = CategoryFormPage::create();
        let update = handle_key(
            &mut page,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        );
        assert!(update.effects.is_empty());
        assert!(page.form.error.is_some());
    }

    #[test]
    fn submit_builds_request_with_optionals() {
        let mut page = CategoryFormPage::create();
        page.form.set_value(NAME, "News");
        page.form.set_value(PARENT, "c-root");

        let update = handle_key(
            &mut page,
            KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE),
        );

        match update.effects.as_slice() {
            [UiEffect::SaveCategory { id: None, req }] => {
                assert_eq!(req.name, "News");
                assert_eq!(req.parent_id.as_deref(), Some("c-root"));
                assert!(req.description.is_none());
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }
}
