//! Uploaded media page.

use std::path::PathBuf;

use copydesk_core::api::files::StoredFile;
use copydesk_core::api::{ApiError, Page};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use serde_json::Value;

use super::PageUpdate;
use crate::common::{render_empty, render_list_footer, render_table, truncate_with_ellipsis};
use crate::dialogs::{DialogData, DialogRequest, DialogTransition, DialogView};
use crate::effects::UiEffect;
use crate::router::Route;

#[derive(Debug)]
pub struct FilesPage {
    pub files: Vec<StoredFile>,
    pub total: u64,
    pub page: u32,
    pub total_pages: u32,
    pub selected: usize,
    pub pending_delete: Option<String>,
}

impl FilesPage {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            total: 0,
            page: 1,
            total_pages: 0,
            selected: 0,
            pending_delete: None,
        }
    }

    fn selected_file(&self) -> Option<&StoredFile> {
        self.files.get(self.selected)
    }
}

impl Default for FilesPage {
    fn default() -> Self {
        Self::new()
    }
}

/// Caller-supplied dialog content: a one-line path prompt.
///
/// Closes with the entered path as a string; the chrome (Esc, backdrop)
/// closes with `Null`, which the page treats as a cancel.
#[derive(Debug, Default)]
struct UploadPrompt {
    input: String,
}

impl DialogView for UploadPrompt {
    fn render(&self, frame: &mut Frame, area: Rect, _data: &DialogData) {
        let lines = vec![
            Line::from(Span::styled(
                "Path of the file to upload:",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(vec![
                Span::styled("> ", Style::default().fg(Color::DarkGray)),
                Span::styled(self.input.clone(), Style::default().fg(Color::White)),
                Span::styled("█", Style::default().fg(Color::Cyan)),
            ]),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn handle_key(&mut self, key: KeyEvent, _data: &DialogData) -> DialogTransition {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => {
                let path = self.input.trim();
                if path.is_empty() {
                    DialogTransition::Stay
                } else {
                    DialogTransition::Close(Value::String(path.to_string()))
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
                DialogTransition::Stay
            }
            KeyCode::Char(c) if !ctrl => {
                self.input.push(c);
                DialogTransition::Stay
            }
            _ => DialogTransition::Stay,
        }
    }
}

pub fn handle_key(page: &mut FilesPage, key: KeyEvent) -> PageUpdate {
    match key.code {
        KeyCode::Up => {
            page.selected = page.selected.saturating_sub(1);
            PageUpdate::handled()
        }
        KeyCode::Down => {
            if page.selected + 1 < page.files.len() {
                page.selected += 1;
            }
            PageUpdate::handled()
        }
        KeyCode::Left if page.page > 1 => {
            page.page -= 1;
            PageUpdate::handled().with_effect(UiEffect::LoadFiles { page: page.page })
        }
        KeyCode::Right if page.page < page.total_pages => {
            page.page += 1;
            PageUpdate::handled().with_effect(UiEffect::LoadFiles { page: page.page })
        }
        KeyCode::Char('r') => {
            PageUpdate::handled().with_effect(UiEffect::LoadFiles { page: page.page })
        }
        KeyCode::Char('u') => PageUpdate::handled().with_dialog(
            DialogRequest::view(Box::new(UploadPrompt::default()))
                .with_title("Upload File")
                .with_size(56, 6),
        ),
        KeyCode::Char('d') => match page.selected_file() {
            Some(file) => {
                let name = file.name.clone().unwrap_or_else(|| file.id.clone());
                page.pending_delete = Some(file.id.clone());
                PageUpdate::handled().with_dialog(
                    DialogRequest::confirm(format!(
                        "Delete \"{}\"?",
                        truncate_with_ellipsis(&name, 32)
                    ))
                    .with_title("Delete File"),
                )
            }
            None => PageUpdate::handled(),
        },
        KeyCode::Esc => PageUpdate::handled().with_goto(Route::Home),
        _ => PageUpdate::ignored(),
    }
}

pub fn on_dialog_close(page: &mut FilesPage, result: &Value) -> PageUpdate {
    // A delete confirm was armed; its close settles that flow.
    if let Some(id) = page.pending_delete.take() {
        return if result.as_bool() == Some(true) {
            PageUpdate::handled().with_effect(UiEffect::DeleteFile { id })
        } else {
            PageUpdate::handled()
        };
    }

    // Otherwise the upload prompt closed; a string is the chosen path and
    // Null is a cancel.
    match result.as_str() {
        Some(path) => PageUpdate::handled().with_effect(UiEffect::UploadFile {
            path: PathBuf::from(path),
        }),
        None => PageUpdate::handled(),
    }
}

pub fn on_files_loaded(
    page: &mut FilesPage,
    result: Result<Page<StoredFile>, ApiError>,
) -> PageUpdate {
    match result {
        Ok(data) => {
            page.total = data.total;
            page.page = data.page;
            page.total_pages = data.total_pages();
            page.files = data.items;
            if page.selected >= page.files.len() {
                page.selected = page.files.len().saturating_sub(1);
            }
            PageUpdate::handled()
        }
        Err(err) => PageUpdate::handled().with_status(format!("Failed to load files: {err}")),
    }
}

pub fn on_file_uploaded(
    page: &mut FilesPage,
    result: Result<StoredFile, ApiError>,
) -> PageUpdate {
    match result {
        Ok(_) => PageUpdate::handled()
            .with_effect(UiEffect::LoadFiles { page: page.page })
            .with_dialog(DialogRequest::success("File uploaded.")),
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn on_file_deleted(page: &mut FilesPage, result: Result<(), ApiError>) -> PageUpdate {
    match result {
        Ok(()) => PageUpdate::handled()
            .with_effect(UiEffect::LoadFiles { page: page.page })
            .with_dialog(DialogRequest::success("File deleted.")),
        Err(err) => PageUpdate::handled().with_dialog(DialogRequest::error(err.message)),
    }
}

pub fn render(frame: &mut Frame, area: Rect, page: &FilesPage) {
    let body = Rect::new(
        area.x + 1,
        area.y + 1,
        area.width.saturating_sub(2),
        area.height.saturating_sub(3),
    );
    let footer = Rect::new(body.x, area.y + area.height.saturating_sub(1), body.width, 1);

    if page.files.is_empty() {
        render_empty(frame, body, "No files. Press u to upload one.");
    } else {
        let rows: Vec<Vec<String>> = page
            .files
            .iter()
            .map(|file| {
                vec![
                    truncate_with_ellipsis(file.name.as_deref().unwrap_or("-"), 28),
                    file.mime_type.clone(),
                    truncate_with_ellipsis(file.url.as_deref().unwrap_or("-"), 36),
                    file.uploaded_by.clone().unwrap_or_else(|| "-".to_string()),
                ]
            })
            .collect();
        render_table(
            frame,
            body,
            &["Name", "Type", "URL", "Uploaded by"],
            &[
                Constraint::Min(20),
                Constraint::Length(16),
                Constraint::Min(24),
                Constraint::Length(16),
            ],
            &rows,
            page.selected,
        );
    }

    let hints = [("u", "upload"), ("d", "delete"), ("←→", "page")];
    render_list_footer(frame, footer, page.page, page.total_pages, page.total, &hints);
}
