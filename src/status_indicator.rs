use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// One-line activity readout: a spinner while a request is in flight plus
/// an optional status message. Ticked from the event loop.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    busy: bool,
    status_text: String,
    spinner_idx: usize,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status_text = status.into();
    }

    pub fn clear_status(&mut self) {
        self.status_text.clear();
    }

    pub fn update_spinner(&mut self) {
        self.spinner_idx = self.spinner_idx.wrapping_add(1);
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let spinner = if self.busy {
            SPINNER_FRAMES[self.spinner_idx % SPINNER_FRAMES.len()]
        } else {
            " "
        };

        let text = if !self.status_text.is_empty() {
            self.status_text.as_str()
        } else if self.busy {
            "Waiting for reply..."
        } else {
            ""
        };

        let color = if !self.status_text.is_empty() {
            Color::Yellow
        } else {
            Color::DarkGray
        };

        let line = Line::from(vec![
            Span::styled(spinner, Style::default().fg(Color::Gray)),
            Span::raw(" "),
            Span::styled(text, Style::default().fg(color)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spinner_index_wraps_without_panicking() {
        let mut indicator = StatusIndicator::new();
        indicator.spinner_idx = usize::MAX;
        indicator.update_spinner();
        assert_eq!(indicator.spinner_idx, 0);
    }

    #[test]
    fn status_text_survives_busy_toggling() {
        let mut indicator = StatusIndicator::new();
        indicator.set_status("Uploading...");
        indicator.set_busy(true);
        indicator.set_busy(false);
        assert!(!indicator.busy);
        assert_eq!(indicator.status_text, "Uploading...");

        indicator.clear_status();
        assert_eq!(indicator.status_text, "");
    }
}
