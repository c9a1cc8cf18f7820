//! Landing page: identity and key bindings.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::state::TuiState;

#[derive(Debug, Default)]
pub struct HomePage;

pub fn render(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let mut lines = vec![Line::from(Span::styled(
        "Welcome to copydesk",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    match tui.current_profile() {
        Some(profile) => {
            lines.push(Line::from(vec![
                Span::raw("Signed in as "),
                Span::styled(profile.full_name.clone(), Style::default().fg(Color::White)),
                Span::styled(
                    format!(" <{}> ({})", profile.email, profile.role.label()),
                    Style::default().fg(Color::DarkGray),
                ),
            ]));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Loading profile...",
                Style::default().fg(Color::DarkGray),
            )));
        }
    }

    lines.push(Line::default());
    for (key, action) in [
        ("2", "posts"),
        ("3", "categories"),
        ("4", "tags"),
        ("5", "users (admin)"),
        ("6", "files"),
        ("7", "profile"),
        ("ctrl+l", "sign out"),
        ("q", "quit"),
    ] {
        lines.push(Line::from(vec![
            Span::styled(format!("  {key:<7}"), Style::default().fg(Color::Cyan)),
            Span::styled(action, Style::default().fg(Color::DarkGray)),
        ]));
    }

    let inner = Rect::new(
        area.x + 2,
        area.y + 1,
        area.width.saturating_sub(4),
        area.height.saturating_sub(2),
    );
    frame.render_widget(Paragraph::new(lines), inner);
}
