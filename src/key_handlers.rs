use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;

use crate::app::{App, Screen};
use crate::composer::Mode;
use crate::courses;
use crate::errors::NoesisResult;
use crate::files;
use crate::session;

/// Routes a key press to the handler for the current screen. Background
/// work is spawned here; handlers themselves only mutate state.
pub async fn handle_key(key: KeyEvent, app: &mut App) -> NoesisResult<()> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.screen = Screen::QuitConfirm;
        return Ok(());
    }

    match app.screen {
        Screen::MainMenu => handle_main_menu_input(key, app).await,
        Screen::Home | Screen::Chat => handle_chat_input(key, app).await,
        Screen::Files => handle_files_input(key, app).await,
        Screen::Courses => handle_courses_input(key, app).await,
        Screen::QuitConfirm => {
            handle_quit_confirm_input(key, app);
            Ok(())
        }
    }
}

async fn handle_main_menu_input(key: KeyEvent, app: &mut App) -> NoesisResult<()> {
    match key.code {
        KeyCode::Up => app.menu_up(),
        KeyCode::Down => app.menu_down(),
        KeyCode::Enter => match app.selected_menu_item {
            0 => enter_chat_screen(app, Screen::Home).await,
            1 => enter_chat_screen(app, Screen::Chat).await,
            2 => {
                app.screen = Screen::Files;
                let api = app.api.clone();
                let screen = Arc::clone(&app.files);
                tokio::spawn(async move {
                    files::load_files(api, screen).await;
                });
            }
            3 => {
                app.screen = Screen::Courses;
                let api = app.api.clone();
                let screen = Arc::clone(&app.courses);
                tokio::spawn(async move {
                    courses::load_courses(api, screen).await;
                });
            }
            _ => app.screen = Screen::QuitConfirm,
        },
        KeyCode::Char('q') | KeyCode::Esc => app.screen = Screen::QuitConfirm,
        _ => {}
    }
    Ok(())
}

async fn enter_chat_screen(app: &mut App, screen: Screen) {
    app.screen = screen;
    let controller = app.active_session();
    let needs_history = !controller.lock().await.history_loaded;
    if needs_history {
        let api = app.api.clone();
        tokio::spawn(async move {
            session::load_history(api, controller).await;
        });
    }
}

async fn handle_chat_input(key: KeyEvent, app: &mut App) -> NoesisResult<()> {
    if app.active_drawer().open {
        return handle_drawer_input(key, app).await;
    }
    if app.active_composer().model_panel_open {
        handle_model_panel_input(key, app);
        return Ok(());
    }
    if app.active_composer().attach_prompt.is_some() {
        handle_attach_prompt_input(key, app);
        return Ok(());
    }

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.screen = Screen::MainMenu,
        KeyCode::Enter => send_current_input(app).await,
        KeyCode::PageUp => app.active_session().lock().await.scroll_up(),
        KeyCode::PageDown => app.active_session().lock().await.scroll_down(),
        KeyCode::Backspace => app.active_composer().backspace(),
        KeyCode::Char(c) if ctrl => match c {
            'u' => app.active_session().lock().await.scroll_up(),
            'd' => app.active_session().lock().await.scroll_down(),
            'h' => app.active_drawer().toggle(),
            'n' => app.active_session().lock().await.start_new(),
            'l' => {
                let api = app.api.clone();
                let controller = app.active_session();
                tokio::spawn(async move {
                    session::clear_history(api, controller).await;
                });
            }
            'o' if app.active_composer().modes_enabled => {
                app.active_composer().open_attach_prompt();
            }
            'r' => toggle_mode(app, Mode::DeepResearch),
            't' => toggle_mode(app, Mode::DeepThinking),
            'b' => toggle_mode(app, Mode::AiBrain),
            's' => toggle_mode(app, Mode::StudyLearn),
            'w' => toggle_mode(app, Mode::WebSearch),
            'e' => toggle_mode(app, Mode::ModelSelect),
            _ => {}
        },
        KeyCode::Char(c) => app.active_composer().push_char(c),
        _ => {}
    }
    Ok(())
}

fn toggle_mode(app: &mut App, mode: Mode) {
    let composer = app.active_composer();
    if composer.modes_enabled {
        composer.toggle_mode(mode);
    }
}

/// The composer is drained only after `begin_send` admits the draft; a
/// rejected Enter leaves the text in place.
async fn send_current_input(app: &mut App) {
    let controller = app.active_session();
    let admitted = {
        let mut guard = controller.lock().await;
        guard.begin_send(&app.active_composer().input)
    };
    let Some(message) = admitted else {
        return;
    };
    app.active_composer().take_input();
    let mode = app.active_composer().active_mode_slug().map(str::to_string);
    let api = app.api.clone();
    tokio::spawn(async move {
        session::send_message(api, controller, message, mode).await;
    });
}

async fn handle_drawer_input(key: KeyEvent, app: &mut App) -> NoesisResult<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => app.active_drawer().close(),
        KeyCode::Up => app.active_drawer().cursor_up(),
        KeyCode::Down => {
            let controller = app.active_session();
            let guard = controller.lock().await;
            app.active_drawer().cursor_down(&guard.sessions);
        }
        KeyCode::Enter => {
            let controller = app.active_session();
            let mut guard = controller.lock().await;
            let picked = app.active_drawer().selected(&guard.sessions).cloned();
            if let Some(session) = picked {
                guard.select_session(&session);
                app.active_drawer().close();
            }
        }
        KeyCode::Backspace => app.active_drawer().search_backspace(),
        KeyCode::Char('n') if ctrl => {
            app.active_session().lock().await.start_new();
            app.active_drawer().close();
        }
        KeyCode::Char('l') if ctrl => {
            let api = app.api.clone();
            let controller = app.active_session();
            tokio::spawn(async move {
                session::clear_history(api, controller).await;
            });
        }
        KeyCode::Char(c) if !ctrl => app.active_drawer().search_push_char(c),
        _ => {}
    }
    Ok(())
}

fn handle_model_panel_input(key: KeyEvent, app: &mut App) {
    let composer = app.active_composer();
    match key.code {
        KeyCode::Up => composer.model_cursor_up(),
        KeyCode::Down => composer.model_cursor_down(),
        KeyCode::Enter | KeyCode::Esc => composer.choose_model(),
        _ => {}
    }
}

fn handle_attach_prompt_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Esc => app.active_composer().cancel_attach_prompt(),
        KeyCode::Backspace => app.active_composer().attach_backspace(),
        KeyCode::Enter => {
            if let Some(path) = app.active_composer().take_attach_path() {
                let api = app.api.clone();
                let controller = app.active_session();
                tokio::spawn(async move {
                    session::upload_document(api, controller, path).await;
                });
            }
        }
        KeyCode::Char(c) => app.active_composer().attach_push_char(c),
        _ => {}
    }
}

async fn handle_files_input(key: KeyEvent, app: &mut App) -> NoesisResult<()> {
    let screen = Arc::clone(&app.files);
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let mut guard = screen.lock().await;

    if guard.upload_prompt.is_some() {
        match key.code {
            KeyCode::Esc => guard.cancel_upload_prompt(),
            KeyCode::Backspace => guard.upload_backspace(),
            KeyCode::Enter => {
                if let Some(path) = guard.take_upload_path() {
                    drop(guard);
                    let api = app.api.clone();
                    tokio::spawn(async move {
                        files::upload_to_library(api, screen, path).await;
                    });
                }
            }
            KeyCode::Char(c) => guard.upload_push_char(c),
            _ => {}
        }
        return Ok(());
    }

    if guard.viewer.is_some() {
        match key.code {
            KeyCode::Esc => guard.close_viewer(),
            KeyCode::Left | KeyCode::PageUp => {
                if let Some(viewer) = guard.viewer.as_mut() {
                    viewer.prev_page();
                }
            }
            KeyCode::Right | KeyCode::PageDown => {
                if let Some(viewer) = guard.viewer.as_mut() {
                    viewer.next_page();
                }
            }
            _ => {}
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => app.screen = Screen::MainMenu,
        KeyCode::Up => guard.cursor_up(),
        KeyCode::Down => guard.cursor_down(),
        KeyCode::Enter => {
            if let Some(file) = guard.selected() {
                let file_id = file.id.clone();
                let file_name = file.name.clone();
                drop(guard);
                let api = app.api.clone();
                tokio::spawn(async move {
                    files::open_text_viewer(api, screen, file_id, file_name).await;
                });
            }
        }
        KeyCode::Delete => {
            if let Some(file) = guard.selected() {
                let file_id = file.id.clone();
                drop(guard);
                let api = app.api.clone();
                tokio::spawn(async move {
                    files::delete_file(api, screen, file_id).await;
                });
            }
        }
        KeyCode::Char('u') if ctrl => guard.open_upload_prompt(),
        KeyCode::Backspace => guard.search_backspace(),
        KeyCode::Char(c) if !ctrl => guard.search_push_char(c),
        _ => {}
    }
    Ok(())
}

async fn handle_courses_input(key: KeyEvent, app: &mut App) -> NoesisResult<()> {
    let screen = Arc::clone(&app.courses);
    let mut guard = screen.lock().await;

    if guard.detail_open {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
            guard.close_detail();
        }
        return Ok(());
    }

    match key.code {
        KeyCode::Esc => app.screen = Screen::MainMenu,
        KeyCode::Up => guard.cursor_up(),
        KeyCode::Down => guard.cursor_down(),
        KeyCode::Enter => guard.open_detail(),
        KeyCode::Left => guard.cycle_category_back(),
        KeyCode::Right => guard.cycle_category(),
        KeyCode::Tab => guard.cycle_level(),
        KeyCode::Backspace => guard.search_backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            guard.search_push_char(c)
        }
        _ => {}
    }
    Ok(())
}

fn handle_quit_confirm_input(key: KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            app.should_quit = true;
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            app.screen = Screen::MainMenu;
        }
        _ => {}
    }
}
