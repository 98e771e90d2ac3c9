use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::composer::{Composer, Mode, MODEL_OPTIONS};
use crate::markdown;
use crate::models::{ChatMessage, Sender};
use crate::session::SessionController;
use crate::status_indicator::StatusIndicator;

const USER_FG: Color = Color::Rgb(255, 223, 128);
const BOT_FG: Color = Color::Rgb(144, 238, 144);

/// Draws one chat page: transcript, activity row, optional mode bar and the
/// input prompt. The history drawer and model picker are overlaid on top by
/// the caller.
pub fn draw_chat_screen(
    f: &mut Frame<'_>,
    area: Rect,
    composer: &Composer,
    controller: &mut SessionController,
    indicator: &mut StatusIndicator,
    show_cursor: bool,
) {
    let constraints = if composer.modes_enabled {
        vec![
            Constraint::Min(1),    // transcript
            Constraint::Length(1), // activity
            Constraint::Length(1), // mode bar
            Constraint::Length(3), // input
        ]
    } else {
        vec![
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(3),
        ]
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    draw_transcript(f, chunks[0], controller);

    indicator.set_busy(controller.loading || controller.uploading);
    if controller.uploading {
        indicator.set_status("Uploading document...");
    } else {
        indicator.clear_status();
    }
    indicator.update_spinner();
    indicator.render(f, chunks[1]);

    if composer.modes_enabled {
        draw_mode_bar(f, chunks[2], composer, controller);
        draw_input(f, chunks[3], composer, show_cursor);
    } else {
        draw_input(f, chunks[2], composer, show_cursor);
    }

    if composer.model_panel_open {
        draw_model_panel(f, area, composer);
    }
}

fn draw_transcript(f: &mut Frame, area: Rect, controller: &mut SessionController) {
    let mut lines: Vec<Line> = Vec::new();

    if controller.messages.is_empty() && !controller.loading {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "  Ask anything to get started.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    for message in &controller.messages {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(message_lines(message, area.width));
    }

    let max_scroll = lines
        .len()
        .saturating_sub(area.height as usize)
        .min(u16::MAX as usize) as u16;
    if controller.scroll > max_scroll {
        controller.scroll = max_scroll;
    }

    let paragraph = Paragraph::new(lines).block(Block::default());
    f.render_widget(paragraph.scroll((controller.scroll, 0)), area);
}

/// Renders one message as a framed bubble. Bot text goes through the
/// markdown renderer; user text is shown verbatim.
fn message_lines(message: &ChatMessage, area_width: u16) -> Vec<Line<'static>> {
    let from_user = message.from == Sender::User;
    let (label, accent, body) = if from_user {
        (
            "You",
            Style::default().fg(USER_FG).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::White),
        )
    } else {
        (
            "Noesis",
            Style::default().fg(BOT_FG).add_modifier(Modifier::BOLD),
            Style::default().fg(Color::Gray),
        )
    };
    let indent = if from_user { "  " } else { "" };
    let wrap_width = (area_width as usize)
        .saturating_sub(indent.len() + 2)
        .max(8);

    let content = if from_user {
        markdown::literal_lines(&message.text, body)
    } else {
        markdown::render_markdown(&message.text, body)
    };

    let mut out = Vec::new();
    out.push(Line::from(vec![
        Span::raw(indent.to_string()),
        Span::styled(format!("┌─ {}", label), accent),
    ]));
    for line in content {
        for wrapped in markdown::wrap_line(&line, wrap_width) {
            let mut spans = vec![
                Span::raw(indent.to_string()),
                Span::styled("│ ", Style::default().fg(accent.fg.unwrap_or(Color::Gray))),
            ];
            spans.extend(wrapped.spans);
            out.push(Line::from(spans));
        }
    }
    out.push(Line::from(vec![
        Span::raw(indent.to_string()),
        Span::styled("╰─", accent),
    ]));
    out
}

fn draw_mode_bar(f: &mut Frame, area: Rect, composer: &Composer, controller: &SessionController) {
    let mut spans: Vec<Span> = vec![Span::raw(" ")];
    for mode in Mode::ALL {
        let style = if composer.active_mode == Some(mode) {
            Style::default()
                .fg(Color::Black)
                .bg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
        spans.push(Span::raw(" "));
    }
    if let Some(file) = &controller.attached_file {
        spans.push(Span::styled(
            format!("📎 {}", file.name),
            Style::default().fg(Color::Yellow),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_input(f: &mut Frame, area: Rect, composer: &Composer, show_cursor: bool) {
    let separator = "─".repeat(area.width as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator.clone(),
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: 1,
        },
    );

    let (prefix, text) = match &composer.attach_prompt {
        Some(path) => ("📎 ", path.as_str()),
        None => ("→ ", composer.input.as_str()),
    };
    let prefix_style = if composer.attach_prompt.is_some() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Line::from(vec![
        Span::styled(prefix, prefix_style),
        Span::styled(text.to_string(), Style::default().fg(Color::White)),
    ]);

    let visible_width = area.width.saturating_sub(2);
    let text_width = text.width() as u16;
    let scroll_offset = if text_width > visible_width {
        text_width - visible_width
    } else {
        0
    };

    f.render_widget(
        Paragraph::new(input).scroll((0, scroll_offset)),
        Rect {
            x: area.x,
            y: area.y + 1,
            width: area.width,
            height: area.height - 2,
        },
    );

    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            separator,
            Style::default().fg(Color::DarkGray),
        ))),
        Rect {
            x: area.x,
            y: area.y + area.height - 1,
            width: area.width,
            height: 1,
        },
    );

    if show_cursor {
        let cursor_x = area.x + 2 + text_width - scroll_offset;
        f.set_cursor_position((cursor_x, area.y + 1));
    }
}

fn draw_model_panel(f: &mut Frame, area: Rect, composer: &Composer) {
    let width = 36.min(area.width);
    let height = (MODEL_OPTIONS.len() as u16 + 2).min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup);

    let items: Vec<ListItem> = MODEL_OPTIONS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == composer.model_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {}", name)).style(style)
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Select Model")
            .style(Style::default().fg(Color::LightMagenta).bg(Color::Black)),
    );
    f.render_widget(list, popup);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Page;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};

    fn row_text(buffer: &Buffer, y: u16) -> String {
        (0..buffer.area.width)
            .filter_map(|x| buffer.cell((x, y)).map(|c| c.symbol()))
            .collect()
    }

    #[test]
    fn long_bot_lines_wrap_inside_the_bubble() {
        let message = ChatMessage::bot("one two three four five six seven eight");

        let lines = message_lines(&message, 20);

        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.width() <= 20));
        let second: String = lines[1].spans.iter().map(|s| s.content.as_ref()).collect();
        assert!(second.starts_with("│ one"));
    }

    #[test]
    fn scroll_clamp_survives_very_long_transcripts() {
        let mut controller = SessionController::new(Page::Chat);
        let text = "x\n".repeat(70_000);
        controller.messages.push(ChatMessage::user(text.trim_end()));
        controller.scroll_to_bottom();

        let backend = TestBackend::new(40, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_transcript(f, area, &mut controller);
            })
            .unwrap();

        assert_eq!(controller.scroll, u16::MAX);
    }

    #[test]
    fn upload_in_flight_shows_a_yellow_status() {
        let composer = Composer::with_modes();
        let mut controller = SessionController::new(Page::Chat);
        controller.uploading = true;
        let mut indicator = StatusIndicator::new();

        let backend = TestBackend::new(60, 12);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                draw_chat_screen(f, area, &composer, &mut controller, &mut indicator, false);
            })
            .unwrap();

        let buffer = terminal.backend().buffer();
        let status_row = (0..buffer.area.height)
            .find(|&y| row_text(buffer, y).contains("Uploading document..."))
            .unwrap();
        let first = buffer.cell((2, status_row)).unwrap();
        assert_eq!(first.symbol(), "U");
        assert_eq!(first.fg, Color::Yellow);
    }
}
