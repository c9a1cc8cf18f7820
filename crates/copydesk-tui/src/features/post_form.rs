//! Post create/edit form.

use copydesk_core::api::categories::{Category, flatten_tree};
use copydesk_core::api::posts::{Post, PostCreateRequest};
use copydesk_core::api::ApiError;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use super::PageUpdate;
use crate::common::{Form, FormKey, TextField, render_form};
use crate::dialogs::DialogRequest;
use crate::effects::UiEffect;
use crate::router::Route;

const TITLE: usize = 0;
const SLUG: usize = 1;
const EXCERPT: usize = 2;
const TAGS: usize = 3;
const CONTENT: usize = 4;

#[derive(Debug)]
pub struct PostFormPage {
    /// Edit target; None when creating.
    pub id: Option<String>,
    pub form: Form,
    /// Flattened category tree for the picker, with depths.
    pub categories: Vec<(usize, Category)>,
    /// Index into `categories` of the chosen category.
    pub category_index: Option<usize>,
    /// Category id of a loaded post, resolved once the tree arrives.
    pending_category_id: Option<String>,
    pub loading: bool,
    pub saving: bool,
}

fn empty_form() -> Form {
    Form::new(vec![
        TextField::new("Title"),
        TextField::new("Slug"),
        TextField::new("Excerpt"),
        TextField::new("Tags (comma-separated)"),
        TextField::multiline("Content"),
    ])
}

impl PostFormPage {
    pub fn create() -> Self {
        Self {
            id: None,
            form: empty_form(),
            categories: Vec::new(),
            category_index: None,
            pending_category_id: None,
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

    /// Fills the form from a loaded post.
    pub fn fill(&mut self, post: &Post) {
        self.form.set_value(TITLE, post.title.clone());
        self.form.set_value(SLUG, post.slug.as_str());
        self.form
            .set_value(EXCERPT, post.excerpt.clone().unwrap_or_default());
        self.form.set_value(TAGS, post.tags.join(", "));
        self.form.set_value(CONTENT, post.content.clone());
        self.pending_category_id = post.category.as_ref().map(|c| c.id.clone());
        self.resolve_category();
        self.loading = false;
    }

    pub fn set_categories(&mut self, roots: &[Category]) {
        self.categories = flatten_tree(roots);
        self.resolve_category();
    }

    fn resolve_category(&mut self) {
        if let Some(id) = &self.pending_category_id {
            self.category_index = self.categories.iter().position(|(_, c)| &c.id == id);
        }
    }

    /// Cycles the category picker: none, then each category in tree order.
    fn cycle_category(&mut self) {
        if self.categories.is_empty() {
            return;
        }
        self.pending_category_id = None;
        self.category_index = match self.category_index {
            None => Some(0),
            Some(index) if index + 1 < self.categories.len() => Some(index + 1),
            Some(_) => None,
        };
    }

    fn build_request(&self) -> PostCreateRequest {
        let tags: Vec<String> = self
            .form
            .value(TAGS)
            .split(',')
            .map(str::trim)
            .filter(|tag| !tag.is_empty())
            .map(ToString::to_string)
            .collect();
        PostCreateRequest {
            title: self.form.value(TITLE).to_string(),
            content: self.form.value(CONTENT).to_string(),
            slug: self.form.value(SLUG).to_string(),
            excerpt: self.form.optional(EXCERPT),
            tags: (!tags.is_empty()).then_some(tags),
            category_id: self
                .category_index
                .and_then(|index| self.categories.get(index))
                .map(|(_, category)| category.id.clone()),
        }
    }
}

pub fn handle_key(page: &mut PostFormPage, key: KeyEvent) -> PageUpdate {
    if page.saving || page.loading {
        return PageUpdate::handled();
    }

    // Category cycling sits outside the form fields.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('k') {
        page.cycle_category();
        return PageUpdate::handled();
    }

    match page.form.handle_key(key) {
        FormKey::Consumed => PageUpdate::handled(),
        FormKey::Cancel => PageUpdate::handled().with_goto(Route::Posts),
        FormKey::Submit => {
            if page.form.value(TITLE).is_empty() {
                page.form.error = Some("Title is required.".to_string());
                return PageUpdate::handled();
            }
            if page.form.value(SLUG).is_empty() {
                page.form.error = Some("Slug is required.".to_string());
                return PageUpdate::handled();
            }
            if page.form.value(CONTENT).is_empty() {
                page.form.error = Some("Content is required.".to_string());
                return PageUpdate::handled();
            }

            page.saving = true;
            let req = page.build_request();
            PageUpdate::handled().with_effect(UiEffect::SavePost {
                id: page.id.clone(),
                req,
            })
        }
    }
}

pub fn on_post_loaded(page: &mut PostFormPage, result: Result<Post, ApiError>) -> PageUpdate {
    match result {
        Ok(post) => {
            page.fill(&post);
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled()
            .with_goto(Route::Posts)
            .with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn on_post_saved(page: &mut PostFormPage, result: Result<Post, ApiError>) -> PageUpdate {
    match result {
        Ok(_) => PageUpdate::handled()
            .with_goto(Route::Posts)
            .with_dialog(DialogRequest::success("Post saved.")),
        Err(err) => {
            page.saving = false;
            PageUpdate::handled().with_dialog(DialogRequest::error(err.message))
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &PostFormPage) {
    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(3),
    );

    if page.loading {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                "Loading post...",
                Style::default().fg(Color::DarkGray),
            ))),
            inner,
        );
        return;
    }

    render_form(frame, inner, &page.form, Color::Cyan);

    let category = page
        .category_index
        .and_then(|index| page.categories.get(index))
        .map_or("(none)", |(_, c)| c.name.as_str());
    let footer = Rect::new(inner.x, area.y + area.height.saturating_sub(2), inner.width, 1);
    let line = Line::from(vec![
        Span::styled("Category: ", Style::default().fg(Color::DarkGray)),
        Span::styled(category.to_string(), Style::default().fg(Color::White)),
        Span::styled(
            "  •  ctrl+k cycle • ctrl+s save • esc cancel",
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), footer);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn category(id: &str) -> Category {
        Category {
            id: id.to_string(),
            name: id.to_uppercase(),
            description: None,
            slug: None,
            parent_id: None,
            path: String::new(),
            created_at: String::new(),
            updated_at: String::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn submit_requires_title_slug_and_content() {
        let mut page = PostFormPage::create();
        let update = handle_key(&mut page, key(KeyCode::Enter));
        assert!(update.effects.is_empty());
        assert_eq!(page.form.error.as_deref(), Some("Title is required."));
    }

    #[test]
    fn valid_submit_builds_request_with_tags_and_category() {
        let mut page = PostFormPage::create();
        page.set_categories(&[category("c1"), category("c2")]);
        page.form.set_value(TITLE, "First");
        page.form.set_value(SLUG, "first");
        page.form.set_value(TAGS, "rust, tui, ");
        page.form.set_value(CONTENT, "Body");
        page.cycle_category();
        page.cycle_category();

        let update = handle_key(&mut page, key(KeyCode::Enter));

        assert!(page.saving);
        match update.effects.as_slice() {
            [UiEffect::SavePost { id: None, req }] => {
                assert_eq!(req.tags.as_deref(), Some(&["rust".to_string(), "tui".to_string()][..]));
                assert_eq!(req.category_id.as_deref(), Some("c2"));
                assert!(req.excerpt.is_none());
            }
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn category_cycles_back_to_none() {
        let mut page = PostFormPage::create();
        page.set_categories(&[category("c1")]);
        page.cycle_category();
        assert_eq!(page.category_index, Some(0));
        page.cycle_category();
        assert_eq!(page.category_index, None);
    }

    #[test]
    fn loaded_post_resolves_category_when_tree_arrives_later() {
        let mut page = PostFormPage::edit("p-1".to_string());
        let post: Post = serde_json::from_value(serde_json::json!({
            "_id": "p-1",
            "title": "First",
            "slug": "first",
            "content": "Body",
            "excerpt": "Teaser",
            "status": "draft",
            "tags": ["rust"],
            "category": {
                "_id": "c2", "name": "News", "path": "news",
                "created_at": "", "updated_at": "", "children": []
            },
            "views_count": 0,
            "likes_count": 0,
            "created_at": "",
            "updated_at": ""
        }))
        .unwrap();

        page.fill(&post);
        assert!(page.category_index.is_none());

        page.set_categories(&[category("c1"), category("c2")]);
        assert_eq!(page.category_index, Some(1));
        assert_eq!(page.form.value(TAGS), "rust");
        assert!(!page.loading);
    }
}
