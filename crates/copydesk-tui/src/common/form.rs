//! Minimal form widget: a focused list of labelled text fields.
//!
//! Every create/edit page in the console is a stack of text fields with the
//! same key handling, so the mechanics live here once: Tab/Down and
//! Shift-Tab/Up move focus, characters and Backspace edit the focused
//! field, Enter submits (or inserts a newline in a multiline field, where
//! Ctrl+S submits), Esc cancels.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// One labelled input.
#[derive(Debug, Clone)]
pub struct TextField {
    pub label: &'static str,
    pub value: String,
    /// Render the value as bullets (passwords).
    pub mask: bool,
    /// Enter inserts a newline instead of submitting.
    pub multiline: bool,
}

impl TextField {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            mask: false,
            multiline: false,
        }
    }

    pub fn masked(label: &'static str) -> Self {
        Self {
            mask: true,
            ..Self::new(label)
        }
    }

    pub fn multiline(label: &'static str) -> Self {
        Self {
            multiline: true,
            ..Self::new(label)
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Outcome of feeding a key to a form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKey {
    /// The key edited the form or moved focus.
    Consumed,
    /// The user asked to submit.
    Submit,
    /// The user asked to leave the form.
    Cancel,
}

/// Focused stack of text fields plus a validation error slot.
#[derive(Debug, Clone)]
pub struct Form {
    pub fields: Vec<TextField>,
    pub focus: usize,
    pub error: Option<String>,
}

impl Form {
    pub fn new(fields: Vec<TextField>) -> Self {
        Self {
            fields,
            focus: 0,
            error: None,
        }
    }

    /// Returns the trimmed value of the field at `index`.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map_or("", |field| field.value.trim())
    }

    /// Returns the trimmed value at `index`, or None when empty.
    pub fn optional(&self, index: usize) -> Option<String> {
        let value = self.value(index);
        (!value.is_empty()).then(|| value.to_string())
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) {
        if let Some(field) = self.fields.get_mut(index) {
            field.value = value.into();
        }
    }

    fn next(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + 1) % self.fields.len();
        }
    }

    fn prev(&mut self) {
        if !self.fields.is_empty() {
            self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
        }
    }

    /// Feeds a key to the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> FormKey {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        // Clear the validation error on any edit
        if !matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
            self.error = None;
        }

        match key.code {
            KeyCode::Esc => FormKey::Cancel,
            KeyCode::Char('s') if ctrl => FormKey::Submit,
            KeyCode::Enter => {
                if self.fields.get(self.focus).is_some_and(|f| f.multiline) {
                    if let Some(field) = self.fields.get_mut(self.focus) {
                        field.value.push('\n');
                    }
                    FormKey::Consumed
                } else {
                    FormKey::Submit
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                self.next();
                FormKey::Consumed
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.prev();
                FormKey::Consumed
            }
            KeyCode::Backspace => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.pop();
                }
                FormKey::Consumed
            }
            KeyCode::Char(c) if !ctrl => {
                if let Some(field) = self.fields.get_mut(self.focus) {
                    field.value.push(c);
                }
                FormKey::Consumed
            }
            _ => FormKey::Consumed,
        }
    }
}

/// Renders a form top-down inside `area`; one label line and one value line
/// per field (multiline fields get their extra lines), then the error.
pub fn render_form(frame: &mut Frame, area: Rect, form: &Form, accent: Color) {
    let mut y = area.y;

    for (index, field) in form.fields.iter().enumerate() {
        if y >= area.y + area.height {
            break;
        }
        let focused = index == form.focus;

        let label_style = if focused {
            Style::default().fg(accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(field.label, label_style))),
            Rect::new(area.x, y, area.width, 1),
        );
        y += 1;

        let display = if field.mask {
            "•".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };

        let line_count = if field.multiline {
            display.lines().count().clamp(1, 5) as u16
        } else {
            1
        };
        if y + line_count > area.y + area.height {
            break;
        }

        let mut text = display;
        if focused {
            text.push('█');
        }
        frame.render_widget(
            Paragraph::new(text).style(Style::default().fg(Color::White)),
            Rect::new(area.x + 2, y, area.width.saturating_sub(2), line_count),
        );
        y += line_count + 1;
    }

    if let Some(error) = &form.error
        && y < area.y + area.height
    {
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            ))),
            Rect::new(area.x, y, area.width, 1),
        );
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn form() -> Form {
        Form::new(vec![
            TextField::new("Name"),
            TextField::masked("Password"),
            TextField::multiline("Body"),
        ])
    }

    #[test]
    fn typing_edits_the_focused_field() {
        let mut form = form();
        form.handle_key(key(KeyCode::Char('h')));
        form.handle_key(key(KeyCode::Char('i')));
        assert_eq!(form.value(0), "hi");

        form.handle_key(key(KeyCode::Backspace));
        assert_eq!(form.value(0), "h");
    }

    #[test]
    fn tab_cycles_focus_both_ways() {
        let mut form = form();
        form.handle_key(key(KeyCode::Tab));
        assert_eq!(form.focus, 1);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus, 0);
        form.handle_key(key(KeyCode::BackTab));
        assert_eq!(form.focus, 2);
    }

    #[test]
    fn enter_submits_single_line_but_breaks_multiline() {
        let mut form = form();
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormKey::Submit);

        form.focus = 2;
        assert_eq!(form.handle_key(key(KeyCode::Enter)), FormKey::Consumed);
        assert_eq!(form.fields[2].value, "\n");

        let ctrl_s = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);
        assert_eq!(form.handle_key(ctrl_s), FormKey::Submit);
    }

    #[test]
    fn edits_clear_the_error() {
        let mut form = form();
        form.error = Some("Required".to_string());
        form.handle_key(key(KeyCode::Char('x')));
        assert!(form.error.is_none());
    }
}
