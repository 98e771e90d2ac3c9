use crate::app::{App, Screen};
use crate::ui::Panels;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Draws the footer with dynamic instructions
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &App, panels: &Panels) {
    let instructions = match app.screen {
        Screen::MainMenu => {
            "Use Up/Down arrows to navigate, Enter to select, 'q' or Esc to quit."
        }
        Screen::Home | Screen::Chat => chat_instructions(app),
        Screen::Files => {
            if panels.files.viewer.is_some() {
                "Left/Right or PgUp/PgDn to turn pages, Esc to close the viewer."
            } else if panels.files.upload_prompt.is_some() {
                "Type a file path and press Enter to upload, Esc to cancel."
            } else {
                "Up/Down to select, Enter to view text, Del to delete, Ctrl+U to upload, type to search, Esc for menu."
            }
        }
        Screen::Courses => {
            if panels.courses.detail_open {
                "Esc to close the course details."
            } else {
                "Up/Down to select, Enter for details, Left/Right category, Tab level, type to search, Esc for menu."
            }
        }
        Screen::QuitConfirm => "Press 'y' to confirm quit or 'n' to cancel.",
    };

    let footer = Paragraph::new(instructions)
        .style(Style::default().fg(Color::LightCyan))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(footer, area);
}

fn chat_instructions(app: &App) -> &'static str {
    let (drawer, composer) = match app.screen {
        Screen::Home => (&app.home_drawer, &app.home_composer),
        _ => (&app.chat_drawer, &app.chat_composer),
    };
    if drawer.open {
        "Up/Down to pick a session, Enter to open, type to search, Ctrl+N new chat, Ctrl+L clear all, Esc to close."
    } else if composer.model_panel_open {
        "Up/Down to choose a model, Enter to confirm, Esc to close."
    } else if composer.attach_prompt.is_some() {
        "Type a file path and press Enter to upload, Esc to cancel."
    } else if composer.modes_enabled {
        "Enter to send. Ctrl+H history, Ctrl+N new, Ctrl+R/T/B/S/W modes, Ctrl+E models, Ctrl+O attach, Esc for menu."
    } else {
        "Type your message and press Enter to send. Ctrl+H history, Ctrl+N new chat, Esc for menu."
    }
}
