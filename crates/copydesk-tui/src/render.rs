//! Pure view functions for the console.
//!
//! Functions here take state by immutable reference, draw to a ratatui
//! frame, and never mutate state or return effects. The dialog host is
//! invoked last so the open dialog lands on top of the page — this is the
//! single host instance per running console.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::dialogs::host;
use crate::features;
use crate::state::{AppState, TuiState};

/// Height of the header bar.
const HEADER_HEIGHT: u16 = 1;

/// Height of the status line below the page.
const STATUS_HEIGHT: u16 = 1;

/// Spinner frames for the status line animation.
const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Renders the entire console to the frame.
pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(1),
            Constraint::Length(STATUS_HEIGHT),
        ])
        .split(area);

    render_header(frame, chunks[0], &app.tui);
    features::render(frame, chunks[1], &app.tui);
    render_status_line(frame, chunks[2], &app.tui);

    // The one dialog host: materializes whatever the broker holds.
    host::render_dialog(frame, area, &app.dialogs);
}

fn render_header(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let mut spans = vec![
        Span::styled(
            " copydesk ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}", tui.route.title()),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
    ];

    // Identity comes through the replay-latest profile subscription.
    if let Some(profile) = tui.profile_rx.borrow().as_ref() {
        spans.push(Span::styled(
            format!("  ·  {} ({})", profile.email, profile.role.label()),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_status_line(frame: &mut Frame, area: Rect, tui: &TuiState) {
    let left = if tui.loading.is_loading() {
        let spinner = SPINNER_FRAMES[tui.spinner_frame % SPINNER_FRAMES.len()];
        Line::from(vec![
            Span::styled(format!(" {spinner} "), Style::default().fg(Color::Cyan)),
            Span::styled("working...", Style::default().fg(Color::DarkGray)),
        ])
    } else if let Some(status) = &tui.status {
        Line::from(Span::styled(
            format!(" {status}"),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(Span::styled(
            " ready",
            Style::default().fg(Color::DarkGray),
        ))
    };
    frame.render_widget(Paragraph::new(left), area);

    let right = Line::from(vec![
        Span::styled("1-7", Style::default().fg(Color::Cyan)),
        Span::styled(" pages • ", Style::default().fg(Color::DarkGray)),
        Span::styled("ctrl+l", Style::default().fg(Color::Cyan)),
        Span::styled(" sign out • ", Style::default().fg(Color::DarkGray)),
        Span::styled("q", Style::default().fg(Color::Cyan)),
        Span::styled(" quit ", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(right).alignment(Alignment::Right),
        area,
    );
}
