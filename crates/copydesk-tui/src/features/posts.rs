//! Posts list page.

use copydesk_core::api::posts::{Post, PostStatus};
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

/// Action armed behind the open confirm dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostsAction {
    Delete(String),
    Publish(String),
    Unpublish(String),
}

#[derive(Debug)]
pub struct PostsPage {
    pub posts: Vec<Post>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub selected: usize,
    pub status_filter: Option<PostStatus>,
    pub pending: Option<PostsAction>,
}

impl PostsPage {
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 0,
            selected: 0,
            status_filter: None,
            pending: None,
        }
    }

    fn selected_post(&self) -> Option<&Post> {
        self.posts.get(self.selected)
    }

    fn reload(&self) -> UiEffect {
        UiEffect::LoadPosts {
            page: self.page,
            status: self.status_filter,
        }
    }

    fn apply_page(&mut self, page: Page<Post>) {
        self.total = page.total;
        self.page = page.page;
        self.total_pages = page.total_pages();
        self.posts = page.items;
        if self.selected >= self.posts.len() {
            self.selected = self.posts.len().saturating_sub(1);
        }
    }
}

impl Default for PostsPage {
    fn default() -> Self {
        Self::new()
    }
}

fn next_filter(current: Option<PostStatus>) -> Option<PostStatus> {
    match current {
        None => Some(PostStatus::Draft),
        Some(PostStatus::Draft) => Some(PostStatus::Published),
        Some(PostStatus::Published) => Some(PostStatus::Archived),
        Some(PostStatus::Archived) => None,
    }
}

pub fn handle_key(page: &mut PostsPage, key: KeyEvent) -> PageUpdate {
    match key.code {
        KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
            PageUpdate::handled()
        }
        KeyCode::Down => {
            if page.selected + 1 < page.posts.len() {
                page.selected += 1;
            }
            PageUpdate::handled()
        }
        KeyCode::Left if page.page > 1 => {
            page.page -= 1;
            let effect = page.reload();
            PageUpdate::handled().with_effect(effect)
        }
        KeyCode::Right if page.page < page.total_pages => {
            page.page += 1;
            let effect = page.reload();
            PageUpdate::handled().with_effect(effect)
        }
        KeyCode::Char('s') => {
            page.status_filter = next_filter(page.status_filter);
            page.page = 1;
            let effect = page.reload();
            PageUpdate::handled().with_effect(effect)
        }
        KeyCode::Char('r') => {
            let effect = page.reload();
            PageUpdate::handled().with_effect(effect)
        }
        KeyCode::Char('n') => PageUpdate::handled().with_goto(Route::PostCreate),
        KeyCode::Char('e') => match page.selected_post() {
            Some(post) => PageUpdate::handled().with_goto(Route::PostEdit(post.id.clone())),
            None => PageUpdate::handled(),
        },
        KeyCode::Char('d') => match page.selected_post() {
            Some(post) => {
                let title = truncate_with_ellipsis(&post.title, 32);
                page.pending = Some(PostsAction::Delete(post.id.clone()));
                PageUpdate::handled().with_dialog(
                    DialogRequest::confirm(format!(
                        "Delete \"{title}\"? This cannot be undone."
                    ))
                    .with_title("Delete Post"),
                )
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Char('p') => match page.selected_post() {
            Some(post) => {
                let title = truncate_with_ellipsis(&post.title, 32);
                let (action, dialog) = if post.status == PostStatus::Published {
                    (
                        PostsAction::Unpublish(post.id.clone()),
                        DialogRequest::warning(format!(
                            "Unpublish \"{title}\"? Readers will lose access."
                        ))
                        .with_title("Unpublish Post"),
                    )
                } else {
                    (
                        PostsAction::Publish(post.id.clone()),
                        DialogRequest::confirm(format!("Publish \"{title}\"?"))
                            .with_title("Publish Post"),
                    )
                };
                page.pending = Some(action);
                PageUpdate::handled().with_dialog(dialog)
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Esc => PageUpdate::handled().with_goto(Route::Home),
        _ => PageUpdate::ignored(),
    }
}

/// Routes the confirm dialog's close back to the armed action.
pub fn on_dialog_close(page: &mut PostsPage, result: &Value) -> PageUpdate {
    let action = page.pending.take();
    if result.as_bool() != Some(true) {
        return PageUpdate::handled();
    }
    match action {
        Some(PostsAction::Delete(id)) => {
            PageUpdate::handled().with_effect(UiEffect::DeletePost { id })
        }
        Some(PostsAction::Publish(id)) => {
            PageUpdate::handled().with_effect(UiEffect::PublishPost { id })
        }
        Some(PostsAction::Unpublish(id)) => {
            PageUpdate::handled().with_effect(UiEffect::UnpublishPost { id })
        }
        None => PageUpdate::handled(),
    }
}

pub fn on_posts_loaded(page: &mut PostsPage, result: Result<Page<Post>, ApiError>) -> PageUpdate {
    match result {
        Ok(data) => {
            page.apply_page(data);
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled().with_status(format!("Failed to load posts: {err}")),
    }
}

pub fn on_post_deleted(page: &mut PostsPage, result: Result<(), ApiError>) -> PageUpdate {
    match result {
        Ok(()) => {
            let effect = page.reload();
            PageUpdate::handled()
                .with_effect(effect)
                .with_dialog(DialogRequest::success("Post deleted."))
        }
        Err(err) => {
            PageUpdate::handled().with_dialog(DialogRequest::error(err.message))
        }
    }
}

pub fn on_post_publication(page: &mut PostsPage, result: Result<Post, ApiError>) -> PageUpdate {
    match result {
        Ok(post) => {
            let message = if post.status == PostStatus::Published {
                "Post published."
            } else {
                "Post unpublished."
            };
            if let Some(existing) = page.posts.iter_mut().find(|p| p.id == post.id) {
                *existing = post;
            }
            PageUpdate::handled().with_dialog(DialogRequest::success(message))
        }
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &PostsPage) {
    let body = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(3),
    );
    let footer = Rect::new(body.x, area.y + area.height.saturating_sub(1), body.width, 1);

    if page.posts.is_empty() {
        let message = match page.status_filter {
            Some(status) => format!("No {} posts.", status.label().to_lowercase()),
            None => "No posts yet. Press n to write one.".to_string(),
        };
        render_empty(frame, body, &message);
    } else {
        let rows: Vec<Vec<String>> = page
            .posts
            .iter()
            .map(|post| {
                vec![
                    truncate_with_ellipsis(&post.title, 40),
                    post.status.label().to_string(),
                    post.category
                        .as_ref()
                        .map_or(String::from("-"), |c| c.name.clone()),
                    post.tags.join(", "),
                    post.views_count.to_string(),
                    short_date(&post.updated_at),
                ]
            })
            .collect();
        render_table(
            frame,
            body,
            &["Title", "Status", "Category", "Tags", "Views", "Updated"],
            &[
                Constraint::Min(24),
                Constraint::Length(10),
                Constraint::Length(14),
                Constraint::Length(20),
                Constraint::Length(6),
                Constraint::Length(10),
            ],
            &rows,
            page.selected,
        );
    }

    let filter_hint = match page.status_filter {
        Some(status) => status.label(),
        None => "all",
    };
    let hints = [
        ("n", "new"),
        ("e", "edit"),
        ("d", "delete"),
        ("p", "publish"),
        ("s", filter_hint),
        ("←→", "page"),
    ];
    render_list_footer(frame, footer, page.page, page.total_pages, page.total, &hints);
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn post(id: &str, status: PostStatus) -> Post {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "title": format!("Post {id}"),
            "slug": format!("post-{id}"),
            "content": "Body",
            "status": status.id(),
            "tags": [],
            "views_count": 0,
            "likes_count": 0,
            "created_at": "2026-01-01T00:00:00Z",
            "updated_at": "2026-01-01T00:00:00Z"
        }))
        .unwrap()
    }

    fn loaded_page() -> PostsPage {
        let mut page = PostsPage::new();
        page.apply_page(Page {
            items: vec![post("a", PostStatus::Draft), post("b", PostStatus::Published)],
            total: 2,
            page: 1,
            page_size: 10,
        });
        page
    }

    #[test]
    fn delete_arms_pending_action_and_opens_confirm() {
        let mut page = loaded_page();
        let update = handle_key(&mut page, key(KeyCode::Char('d')));
        assert_eq!(page.pending, Some(PostsAction::Delete("a".to_string())));
        assert!(update.dialog.is_some());
    }

    #[test]
    fn confirmed_dialog_fires_the_armed_action_once() {
        let mut page = loaded_page();
        handle_key(&mut page, key(KeyCode::Char('d')));

        let update = on_dialog_close(&mut page, &Value::Bool(true));
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::DeletePost { id }] if id == "a"
        ));
        assert!(page.pending.is_none());

        // A second close (stale) does nothing.
        let update = on_dialog_close(&mut page, &Value::Bool(true));
        assert!(update.effects.is_empty());
    }

    #[test]
    fn cancelled_dialog_disarms_without_effect() {
        let mut page = loaded_page();
        handle_key(&mut page, key(KeyCode::Char('d')));

        let update = on_dialog_close(&mut page, &Value::Bool(false));
        assert!(update.effects.is_empty());
        assert!(page.pending.is_none());
    }

    #[test]
    fn publish_key_picks_direction_from_status() {
        let mut page = loaded_page();
        handle_key(&mut page, key(KeyCode::Char('p')));
        assert_eq!(page.pending, Some(PostsAction::Publish("a".to_string())));

        page.selected = 1;
        handle_key(&mut page, key(KeyCode::Char('p')));
        assert_eq!(page.pending, Some(PostsAction::Unpublish("b".to_string())));
    }

    #[test]
    fn status_filter_cycles_and_resets_page() {
        let mut page = loaded_page();
        page.page = 3;
        let update = handle_key(&mut page, key(KeyCode::Char('s')));
        assert_eq!(page.status_filter, Some(PostStatus::Draft));
        assert_eq!(page.page, 1);
        assert!(matches!(
            update.effects.as_slice(),
            [UiEffect::LoadPosts { page: 1, status: Some(PostStatus::Draft) }]
        ));
    }

    #[test]
    fn selection_clamps_after_shorter_reload() {
        let mut page = loaded_page();
        page.selected = 1;
        page.apply_page(Page {
            items: vec![post("a", PostStatus::Draft)],
            total: 1,
            page: 1,
            page_size: 10,
        });
        assert_eq!(page.selected, 0);
    }
}
