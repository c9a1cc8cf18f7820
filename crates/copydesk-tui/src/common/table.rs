//! Table rendering shared by the list pages.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table};

/// Renders a list as a table with a highlighted selection row.
pub fn render_table(
    frame: &mut Frame,
    area: Rect,
    headers: &[&'static str],
    widths: &[Constraint],
    rows: &[Vec<String>],
    selected: usize,
) {
    let header = Row::new(
        headers
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().fg(Color::DarkGray))),
    )
    .bottom_margin(1);

    let rows = rows.iter().enumerate().map(|(index, cells)| {
        let style = if index == selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        Row::new(cells.iter().map(|cell| Cell::from(cell.clone()))).style(style)
    });

    let table = Table::new(rows, widths.to_vec()).header(header);
    frame.render_widget(table, area);
}

/// Builds the "Page X/Y · N items" footer line.
pub fn pagination_line(page: u32, total_pages: u32, total: u64) -> Line<'static> {
    Line::from(Span::styled(
        format!("Page {page}/{} · {total} items", total_pages.max(1)),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Renders a footer: pagination on the left, key hints on the right.
pub fn render_list_footer(
    frame: &mut Frame,
    area: Rect,
    page: u32,
    total_pages: u32,
    total: u64,
    hints: &[(&str, &str)],
) {
    if area.height == 0 {
        return;
    }
    frame.render_widget(
        Paragraph::new(pagination_line(page, total_pages, total)),
        area,
    );

    let mut spans = Vec::new();
    for (i, (key, action)) in hints.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" • ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {action}"),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(ratatui::layout::Alignment::Right),
        area,
    );
}

/// Renders an empty-state message for a list page.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(Color::DarkGray),
        ))),
        area,
    );
}
