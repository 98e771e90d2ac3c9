use std::sync::Arc;
use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::composer::Composer;
use crate::courses::CoursesScreen;
use crate::errors::NoesisResult;
use crate::files::FilesScreen;
use crate::history::HistoryDrawer;
use crate::models::Page;
use crate::session::SessionController;
use crate::status_indicator::StatusIndicator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    Home,
    Chat,
    Files,
    Courses,
    QuitConfirm,
}

/// Top-level application state. The per-page controllers live behind
/// `Arc<Mutex<..>>` so background request tasks can update them while the
/// event loop keeps running; everything else is owned by the loop.
pub struct App {
    pub screen: Screen,
    pub menu_items: Vec<&'static str>,
    pub selected_menu_item: usize,
    pub api: ApiClient,
    pub home: Arc<Mutex<SessionController>>,
    pub chat: Arc<Mutex<SessionController>>,
    pub home_composer: Composer,
    pub chat_composer: Composer,
    pub home_drawer: HistoryDrawer,
    pub chat_drawer: HistoryDrawer,
    pub files: Arc<Mutex<FilesScreen>>,
    pub courses: Arc<Mutex<CoursesScreen>>,
    pub status_indicator: StatusIndicator,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> NoesisResult<App> {
        Ok(App {
            screen: Screen::MainMenu,
            menu_items: vec![
                "🏠 Home",
                "💬 Chat",
                "📁 Files",
                "📚 Courses",
                "🚪 Quit",
            ],
            selected_menu_item: 0,
            api: ApiClient::new()?,
            home: Arc::new(Mutex::new(SessionController::new(Page::Home))),
            chat: Arc::new(Mutex::new(SessionController::new(Page::Chat))),
            home_composer: Composer::plain(),
            chat_composer: Composer::with_modes(),
            home_drawer: HistoryDrawer::new(),
            chat_drawer: HistoryDrawer::new(),
            files: Arc::new(Mutex::new(FilesScreen::new())),
            courses: Arc::new(Mutex::new(CoursesScreen::new())),
            status_indicator: StatusIndicator::new(),
            should_quit: false,
        })
    }

    /// The session controller backing the currently shown chat page.
    pub fn active_session(&self) -> Arc<Mutex<SessionController>> {
        match self.screen {
            Screen::Home => Arc::clone(&self.home),
            _ => Arc::clone(&self.chat),
        }
    }

    pub fn active_composer(&mut self) -> &mut Composer {
        match self.screen {
            Screen::Home => &mut self.home_composer,
            _ => &mut self.chat_composer,
        }
    }

    pub fn active_drawer(&mut self) -> &mut HistoryDrawer {
        match self.screen {
            Screen::Home => &mut self.home_drawer,
            _ => &mut self.chat_drawer,
        }
    }

    pub fn menu_up(&mut self) {
        if self.selected_menu_item > 0 {
            self.selected_menu_item -= 1;
        }
    }

    pub fn menu_down(&mut self) {
        if self.selected_menu_item + 1 < self.menu_items.len() {
            self.selected_menu_item += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_cursor_stays_in_bounds() {
        let mut app = App::new().unwrap();
        app.menu_up();
        assert_eq!(app.selected_menu_item, 0);
        for _ in 0..20 {
            app.menu_down();
        }
        assert_eq!(app.selected_menu_item, app.menu_items.len() - 1);
    }

    #[test]
    fn active_session_follows_screen() {
        let mut app = App::new().unwrap();
        app.screen = Screen::Home;
        assert!(Arc::ptr_eq(&app.active_session(), &app.home));
        app.screen = Screen::Chat;
        assert!(Arc::ptr_eq(&app.active_session(), &app.chat));
    }
}
