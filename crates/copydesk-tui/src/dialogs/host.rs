//! The dialog host: the one rendering surface for the broker.
//!
//! Exactly one host call per frame, wired into the top-level render after
//! the page so the dialog lands on top. When the broker is idle nothing is
//! drawn and the page owns the whole frame again.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::{BuiltinKind, DialogBroker, DialogContent, DialogRequest};

const DEFAULT_WIDTH: u16 = 52;
const DEFAULT_HEIGHT: u16 = 9;

/// Renders the open dialog, if any, and records its rect on the broker for
/// backdrop hit-testing.
pub fn render_dialog(frame: &mut Frame, area: Rect, broker: &DialogBroker) {
    let Some(request) = broker.current() else {
        return;
    };

    let width = request.width.unwrap_or(DEFAULT_WIDTH);
    let height = request.height.unwrap_or(DEFAULT_HEIGHT);
    let popup = centered_area(area, width, height);
    broker.set_area(popup);

    let accent = border_color(request);
    let title = request
        .title
        .as_deref()
        .unwrap_or_else(|| default_title(request));

    frame.render_widget(Clear, popup);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent))
        .title(format!(" {title} "))
        .title_style(Style::default().fg(accent).add_modifier(Modifier::BOLD));
    frame.render_widget(block, popup);

    let inner = Rect::new(
        popup.x + 2,
        popup.y + 1,
        popup.width.saturating_sub(4),
        popup.height.saturating_sub(2),
    );

    match &request.content {
        DialogContent::Builtin(kind) => render_builtin(frame, inner, request, *kind, accent),
        DialogContent::View(view) => view.render(frame, inner, &request.data),
    }
}

fn render_builtin(
    frame: &mut Frame,
    inner: Rect,
    request: &DialogRequest,
    kind: BuiltinKind,
    accent: Color,
) {
    let message = request.message().unwrap_or_else(|| match kind {
        BuiltinKind::Success => "Operation completed successfully.",
        BuiltinKind::Error => "An error occurred. Please try again.",
        BuiltinKind::Warning | BuiltinKind::Confirm => "Please confirm this action.",
    });

    let body_height = inner.height.saturating_sub(1);
    let body = Rect::new(inner.x, inner.y, inner.width, body_height);
    frame.render_widget(
        Paragraph::new(message.to_string())
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White)),
        body,
    );

    let mut hints: Vec<(&str, &str)> = match kind {
        BuiltinKind::Success | BuiltinKind::Error => vec![("Enter", "ok")],
        BuiltinKind::Warning | BuiltinKind::Confirm => vec![("Enter", "confirm")],
    };
    if request.show_close_button {
        hints.push(("Esc", "close"));
    }
    render_hints(frame, inner, &hints, accent);
}

fn default_title(request: &DialogRequest) -> &'static str {
    match &request.content {
        DialogContent::Builtin(kind) => kind.default_title(),
        DialogContent::View(_) => "Dialog",
    }
}

fn border_color(request: &DialogRequest) -> Color {
    match &request.content {
        DialogContent::Builtin(BuiltinKind::Success) => Color::Green,
        DialogContent::Builtin(BuiltinKind::Error) => Color::Red,
        DialogContent::Builtin(BuiltinKind::Warning) => Color::Yellow,
        DialogContent::Builtin(BuiltinKind::Confirm) | DialogContent::View(_) => Color::Cyan,
    }
}

/// Centers a `width` x `height` rect inside `area`, shrinking to fit.
pub fn centered_area(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

/// Renders a centered line of keyboard hints at the bottom of `area`.
pub fn render_hints(frame: &mut Frame, area: Rect, hints: &[(&str, &str)], highlight: Color) {
    if area.height == 0 {
        return;
    }
    let hints_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(highlight)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let para = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(para, hints_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_area_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        let popup = centered_area(area, 52, 9);
        assert_eq!(popup, Rect::new(24, 15, 52, 9));

        // Larger than the frame: shrinks to fit with margins.
        let popup = centered_area(Rect::new(0, 0, 30, 8), 52, 9);
        assert!(popup.width <= 26);
        assert!(popup.height <= 6);
    }
}
