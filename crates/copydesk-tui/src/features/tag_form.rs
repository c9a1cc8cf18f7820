//! Tag create/edit form.

use copydesk_core::api::tags::{Tag, TagCreateRequest};
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

#[derive(Debug)]
pub struct TagFormPage {
    pub id: Option<String>,
    pub form: Form,
    pub loading: bool,
    pub saving: bool,
}

impl TagFormPage {
    pub fn create() -> Self {
        Self {
            id: None,
            form: Form::new(vec![
                TextField::new("Name"),
                TextField::new("Slug"),
                TextField::new("Description"),
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

    pub fn fill(&mut self, tag: &Tag) {
        self.form.set_value(NAME, tag.name.clone());
        self.form.set_value(SLUG, tag.slug.as_str());
        self.form
            .set_value(DESCRIPTION, tag.description.clone().unwrap_or_default());
        self.loading = false;
    }
}

pub fn handle_key(page: &mut TagFormPage, key: KeyEvent) -> PageUpdate {
    if page.saving || page.loading {
        return PageUpdate::handled();
    }

    match page.form.handle_key(key) {
        FormKey::Consumed => PageUpdate::handled(),
        FormKey::Cancel => PageUpdate::handled().with_goto(Route::Tags),
        FormKey::Submit => {
            if page.form.value(NAME).is_empty() {
                page.form.error = Some("Name is required.".to_string());
                return PageUpdate::handled();
            }
            page.saving = true;
            let req = TagCreateRequest {
                name: page.form.value(NAME).to_string(),
                description: page.form.optional(DESCRIPTION),
                slug: page.form.optional(SLUG),
            };
            PageUpdate::handled().with_effect(UiEffect::SaveTag {
                id: page.id.clone(),
                req,
            })
        }
    }
}

pub fn on_tag_loaded(page: &mut TagFormPage, result: Result<Tag, ApiError>) -> PageUpdate {
    match result {
        Ok(tag) => {
            page.fill(&tag);
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled()
            .with_goto(Route::Tags)
            .with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn on_tag_saved(page: &mut TagFormPage, result: Result<Tag, ApiError>) -> PageUpdate {
    match result {
        Ok(_) => PageUpdate::handled()
            .with_goto(Route::Tags)
            .with_dialog(DialogRequest::success("Tag saved.")),
        Err(err) => {
            page.saving = false;
            PageUpdate::handled().with_dialog(DialogRequest::error(err.message))
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &TagFormPage) {
    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );
    render_form(frame, inner, &page.form, Color::Cyan);
}
