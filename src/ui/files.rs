use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::files::{FilesScreen, TextViewer};

/// Draws the document library: the file list on the left and, when a file
/// is opened, the extracted-text viewer on the right.
pub fn draw_files_screen(f: &mut Frame<'_>, area: Rect, screen: &FilesScreen, show_cursor: bool) {
    let chunks = if screen.viewer.is_some() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)].as_ref())
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)].as_ref())
            .split(area)
    };

    draw_file_list(f, chunks[0], screen, show_cursor);
    if let Some(viewer) = &screen.viewer {
        draw_text_viewer(f, chunks[1], viewer);
    }
}

fn draw_file_list(f: &mut Frame, area: Rect, screen: &FilesScreen, show_cursor: bool) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Files")
        .style(Style::default().fg(Color::LightYellow).bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(2), // search
                Constraint::Min(1),    // list
                Constraint::Length(1), // status or upload prompt
            ]
            .as_ref(),
        )
        .split(inner);

    f.render_widget(
        Paragraph::new(vec![
            Line::from(vec![
                Span::styled("🔎 ", Style::default().fg(Color::DarkGray)),
                Span::styled(screen.search.clone(), Style::default().fg(Color::White)),
            ]),
            Line::from(Span::styled(
                "─".repeat(rows[0].width as usize),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        rows[0],
    );

    let filtered = screen.filtered();
    let mut lines: Vec<Line> = Vec::new();
    if screen.loading && screen.files.is_empty() {
        lines.push(Line::from(Span::styled(
            "Loading files...",
            Style::default().fg(Color::DarkGray),
        )));
    } else if filtered.is_empty() {
        let hint = if screen.search.is_empty() {
            "No documents yet. Press Ctrl+U to upload one."
        } else {
            "No documents match the search."
        };
        lines.push(Line::from(Span::styled(
            hint,
            Style::default().fg(Color::DarkGray),
        )));
    }

    for (i, file) in filtered.iter().enumerate() {
        let selected = i == screen.cursor;
        let name_style = if selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let marker = if selected { "➤ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker, name_style),
            Span::styled(format!("📄 {}", file.name), name_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {} · {}", file.uploaded_at, file.status),
            Style::default().fg(Color::DarkGray),
        )));
    }

    f.render_widget(Paragraph::new(lines), rows[1]);

    match &screen.upload_prompt {
        Some(path) => {
            f.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled("📎 ", Style::default().fg(Color::Yellow)),
                    Span::styled(path.clone(), Style::default().fg(Color::White)),
                ])),
                rows[2],
            );
            if show_cursor {
                let cursor_x = rows[2].x + 2 + path.len() as u16;
                f.set_cursor_position((cursor_x.min(rows[2].x + rows[2].width), rows[2].y));
            }
        }
        None => {
            if let Some(status) = &screen.status {
                f.render_widget(
                    Paragraph::new(Line::from(Span::styled(
                        status.clone(),
                        Style::default().fg(Color::Yellow),
                    ))),
                    rows[2],
                );
            }
        }
    }
}

fn draw_text_viewer(f: &mut Frame, area: Rect, viewer: &TextViewer) {
    let title = format!("📖 {}", viewer.file_name);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(Color::LightCyan).bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(1)].as_ref())
        .split(inner);

    let header = if viewer.loading {
        "Extracting text...".to_string()
    } else if viewer.pages.is_empty() {
        "No extracted text.".to_string()
    } else {
        format!("Page {}/{}", viewer.page_index + 1, viewer.pages.len())
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            header,
            Style::default().fg(Color::DarkGray),
        ))),
        rows[0],
    );

    if let Some(error) = &viewer.error {
        f.render_widget(
            Paragraph::new(Span::styled(error.clone(), Style::default().fg(Color::Red))),
            rows[1],
        );
        return;
    }

    let text = viewer
        .current_page()
        .map(|p| p.text.as_str())
        .unwrap_or_default();
    let wrap_width = (rows[1].width as usize).max(8);
    let lines: Vec<Line> = textwrap::wrap(text, wrap_width)
        .into_iter()
        .map(|l| {
            Line::from(Span::styled(
                l.into_owned(),
                Style::default().fg(Color::White),
            ))
        })
        .collect();
    f.render_widget(Paragraph::new(lines), rows[1]);
}
