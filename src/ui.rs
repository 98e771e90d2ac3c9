// src/ui.rs

pub mod chat;
pub mod courses;
pub mod drawer;
pub mod files;
pub mod footer;
pub mod header;
pub mod main_menu;
pub mod quit_confirm;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::error;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::{
    io,
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::mpsc;

use crate::app::{App, Screen};
use crate::courses::CoursesScreen;
use crate::errors::NoesisResult;
use crate::files::FilesScreen;
use crate::key_handlers;
use crate::session::SessionController;

/// Mutable views of the shared panel state, locked once per frame so the
/// draw pass works on plain references.
pub struct Panels<'a> {
    pub home: &'a mut SessionController,
    pub chat: &'a mut SessionController,
    pub files: &'a mut FilesScreen,
    pub courses: &'a mut CoursesScreen,
}

/// Sets up the terminal, runs the event loop and restores the terminal on
/// the way out.
pub async fn run_ui() -> NoesisResult<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let app = App::new()?;
    let res = run_app(&mut terminal, app).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        error!("ui loop exited with error: {}", err);
        eprintln!("{}", err);
    }

    res
}

/// Main loop of the application.
async fn run_app<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> NoesisResult<()> {
    let (tx, mut rx) = mpsc::channel::<Event>(100);

    // Input pump: forwards terminal events and emits a tick every 250ms so
    // the spinner and background updates stay visible.
    tokio::spawn(async move {
        let mut last_tick = Instant::now();
        loop {
            let timeout = Duration::from_millis(100);
            if event::poll(timeout).unwrap_or(false) {
                if let Ok(event) = event::read() {
                    if tx.send(Event::Input(event)).await.is_err() {
                        return;
                    }
                }
            }

            if last_tick.elapsed() >= Duration::from_millis(250) {
                if tx.send(Event::Tick).await.is_err() {
                    return;
                }
                last_tick = Instant::now();
            }
        }
    });

    loop {
        let home_handle = Arc::clone(&app.home);
        let chat_handle = Arc::clone(&app.chat);
        let files_handle = Arc::clone(&app.files);
        let courses_handle = Arc::clone(&app.courses);
        {
            let mut home = home_handle.lock().await;
            let mut chat = chat_handle.lock().await;
            let mut files = files_handle.lock().await;
            let mut courses = courses_handle.lock().await;
            let mut panels = Panels {
                home: &mut home,
                chat: &mut chat,
                files: &mut files,
                courses: &mut courses,
            };
            terminal.draw(|f| draw(f, &mut app, &mut panels))?;
        }

        tokio::select! {
            Some(event) = rx.recv() => {
                match event {
                    Event::Input(CEvent::Key(key)) => {
                        key_handlers::handle_key(key, &mut app).await?;
                    }
                    Event::Input(_) => {}
                    Event::Tick => {}
                }
            }
            else => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Enum for different types of events.
enum Event {
    Input(CEvent),
    Tick,
}

/// Renders the current screen: header, screen body, footer, plus any
/// overlays the screen carries.
pub fn draw(f: &mut Frame<'_>, app: &mut App, panels: &mut Panels<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(7),
                Constraint::Min(1),
                Constraint::Length(1),
            ]
            .as_ref(),
        )
        .split(f.area());

    header::draw_header(f, chunks[0]);

    match app.screen {
        Screen::MainMenu => main_menu::draw_main_menu(f, chunks[1], app),
        Screen::Home => draw_chat_page(f, chunks[1], app, panels.home, true),
        Screen::Chat => draw_chat_page(f, chunks[1], app, panels.chat, false),
        Screen::Files => {
            files::draw_files_screen(f, chunks[1], panels.files, true);
        }
        Screen::Courses => courses::draw_courses_screen(f, chunks[1], panels.courses),
        Screen::QuitConfirm => quit_confirm::draw_quit_confirm(f, chunks[1]),
    }

    footer::draw_footer(f, chunks[2], app, panels);
}

fn draw_chat_page(
    f: &mut Frame<'_>,
    area: Rect,
    app: &mut App,
    controller: &mut SessionController,
    home: bool,
) {
    let (composer, drawer) = if home {
        (&app.home_composer, &app.home_drawer)
    } else {
        (&app.chat_composer, &app.chat_drawer)
    };
    let show_cursor = !drawer.open && !composer.model_panel_open;
    chat::draw_chat_screen(
        f,
        area,
        composer,
        controller,
        &mut app.status_indicator,
        show_cursor,
    );
    if drawer.open {
        drawer::draw_history_drawer(f, area, drawer, &controller.sessions);
    }
}
