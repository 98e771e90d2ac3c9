use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::history::HistoryDrawer;
use crate::models::ChatSession;

/// Overlays the session history drawer on the left edge of the chat area.
pub fn draw_history_drawer(
    f: &mut Frame<'_>,
    area: Rect,
    drawer: &HistoryDrawer,
    sessions: &[ChatSession],
) {
    let width = (area.width * 2 / 5).clamp(24, 48).min(area.width);
    let panel = Rect {
        x: area.x,
        y: area.y,
        width,
        height: area.height,
    };

    f.render_widget(Clear, panel);

    let filtered = drawer.filtered(sessions);
    let title = format!("History ({})", filtered.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(Color::LightYellow).bg(Color::Black));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(vec![
        Span::styled("🔎 ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            drawer.search.clone(),
            Style::default().fg(Color::White),
        ),
        Span::styled("▏", Style::default().fg(Color::DarkGray)),
    ]));
    lines.push(Line::from(Span::styled(
        "─".repeat(inner.width as usize),
        Style::default().fg(Color::DarkGray),
    )));

    if filtered.is_empty() {
        let hint = if drawer.search.is_empty() {
            "No chats yet."
        } else {
            "No chats match the search."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, session) in filtered.iter().enumerate() {
        let style = if i == drawer.cursor {
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let marker = if i == drawer.cursor { "➤ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, style),
            Span::styled(session.title.clone(), style),
        ]));
    }

    f.render_widget(Paragraph::new(lines), inner);
}
