use crate::models::ChatSession;

/// History drawer state: visibility, the search box, and a cursor into the
/// filtered list. The filter is purely client-side; the backend is never
/// consulted for search.
#[derive(Debug, Clone, Default)]
pub struct HistoryDrawer {
    pub open: bool,
    pub search: String,
    pub cursor: usize,
}

impl HistoryDrawer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
        if self.open {
            self.cursor = 0;
        }
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn search_push_char(&mut self, c: char) {
        self.search.push(c);
        self.cursor = 0;
    }

    pub fn search_backspace(&mut self) {
        self.search.pop();
        self.cursor = 0;
    }

    /// Case-insensitive substring match over session titles; an empty query
    /// passes everything through in stored order.
    pub fn filtered<'a>(&self, sessions: &'a [ChatSession]) -> Vec<&'a ChatSession> {
        if self.search.trim().is_empty() {
            return sessions.iter().collect();
        }
        let needle = self.search.to_lowercase();
        sessions
            .iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .collect()
    }

    pub fn cursor_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn cursor_down(&mut self, sessions: &[ChatSession]) {
        let len = self.filtered(sessions).len();
        if len > 0 && self.cursor + 1 < len {
            self.cursor += 1;
        }
    }

    pub fn selected<'a>(&self, sessions: &'a [ChatSession]) -> Option<&'a ChatSession> {
        self.filtered(sessions).get(self.cursor).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionId;

    fn session(id: &str, title: &str) -> ChatSession {
        ChatSession {
            id: SessionId::new(id),
            title: title.to_string(),
            messages: Vec::new(),
        }
    }

    fn sample() -> Vec<ChatSession> {
        vec![
            session("1", "Linear algebra questions"),
            session("2", "Rust borrow checker"),
            session("3", "More linear regression"),
        ]
    }

    #[test]
    fn empty_search_passes_everything_in_order() {
        let drawer = HistoryDrawer::default();
        let sessions = sample();

        let filtered = drawer.filtered(&sessions);
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].title, "Linear algebra questions");
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let mut drawer = HistoryDrawer::default();
        for c in "LINEAR".chars() {
            drawer.search_push_char(c);
        }
        let sessions = sample();

        let filtered = drawer.filtered(&sessions);
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|s| s.title.to_lowercase().contains("linear")));
    }

    #[test]
    fn typing_resets_the_cursor() {
        let mut drawer = HistoryDrawer::default();
        let sessions = sample();

        drawer.cursor_down(&sessions);
        assert_eq!(drawer.cursor, 1);

        drawer.search_push_char('r');
        assert_eq!(drawer.cursor, 0);
    }

    #[test]
    fn cursor_clamps_to_filtered_length() {
        let mut drawer = HistoryDrawer::default();
        for c in "rust".chars() {
            drawer.search_push_char(c);
        }
        let sessions = sample();

        for _ in 0..5 {
            drawer.cursor_down(&sessions);
        }
        assert_eq!(drawer.cursor, 0);

        let selected = drawer.selected(&sessions).unwrap();
        assert_eq!(selected.title, "Rust borrow checker");
    }

    #[test]
    fn selected_honors_cursor_position() {
        let mut drawer = HistoryDrawer::default();
        let sessions = sample();

        drawer.cursor_down(&sessions);
        drawer.cursor_down(&sessions);

        assert_eq!(
            drawer.selected(&sessions).unwrap().title,
            "More linear regression"
        );
    }
}
