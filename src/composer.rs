/// Chat modes the backend understands. At most one is active at a time;
/// the slug is what goes on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    DeepResearch,
    DeepThinking,
    AiBrain,
    StudyLearn,
    WebSearch,
    ModelSelect,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::DeepResearch,
        Mode::DeepThinking,
        Mode::AiBrain,
        Mode::StudyLearn,
        Mode::WebSearch,
        Mode::ModelSelect,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Mode::DeepResearch => "deep-research",
            Mode::DeepThinking => "deep-thinking",
            Mode::AiBrain => "ai-brain",
            Mode::StudyLearn => "study-learn",
            Mode::WebSearch => "web-search",
            Mode::ModelSelect => "model-select",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Mode::DeepResearch => "Deep Research",
            Mode::DeepThinking => "Deep Thinking",
            Mode::AiBrain => "AI Brain",
            Mode::StudyLearn => "Study & Learn",
            Mode::WebSearch => "Web Search",
            Mode::ModelSelect => "Model Select",
        }
    }
}

/// Static model names shown by the Model Select panel. Choosing one closes
/// the panel and nothing else; the backend has no parameter for it.
pub const MODEL_OPTIONS: [&str; 10] = [
    "OpenAI GPT-4o",
    "OpenAI GPT-4.1",
    "Claude Opus",
    "Claude Sonnet",
    "Google Gemini 1.5",
    "Groq LLaMA 3",
    "Mistral Large",
    "Cohere Command R+",
    "Perplexity Pro",
    "xAI Grok",
];

/// Input line plus the mode chrome around it. The Home screen uses the
/// plain variant (no modes, no upload); the Chat screen gets the full bar.
/// The uploaded-file id itself lives on the session controller.
#[derive(Debug, Clone)]
pub struct Composer {
    pub input: String,
    pub modes_enabled: bool,
    pub active_mode: Option<Mode>,
    pub model_panel_open: bool,
    pub model_cursor: usize,
    pub attach_prompt: Option<String>,
}

impl Composer {
    pub fn plain() -> Self {
        Self {
            input: String::new(),
            modes_enabled: false,
            active_mode: None,
            model_panel_open: false,
            model_cursor: 0,
            attach_prompt: None,
        }
    }

    pub fn with_modes() -> Self {
        Self {
            modes_enabled: true,
            ..Self::plain()
        }
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn backspace(&mut self) {
        self.input.pop();
    }

    /// Drains the input buffer for sending.
    pub fn take_input(&mut self) -> String {
        self.input.drain(..).collect()
    }

    /// Re-pressing the active mode clears it; pressing a different mode
    /// switches directly, with no intermediate "no mode" state. The model
    /// panel is open exactly while `model-select` is the fresh activation.
    pub fn toggle_mode(&mut self, mode: Mode) {
        if !self.modes_enabled {
            return;
        }
        if self.active_mode == Some(mode) {
            self.active_mode = None;
            self.model_panel_open = false;
        } else {
            self.active_mode = Some(mode);
            self.model_panel_open = mode == Mode::ModelSelect;
            if self.model_panel_open {
                self.model_cursor = 0;
            }
        }
    }

    pub fn active_mode_slug(&self) -> Option<&'static str> {
        self.active_mode.map(|m| m.slug())
    }

    pub fn model_cursor_up(&mut self) {
        if self.model_cursor > 0 {
            self.model_cursor -= 1;
        }
    }

    pub fn model_cursor_down(&mut self) {
        if self.model_cursor + 1 < MODEL_OPTIONS.len() {
            self.model_cursor += 1;
        }
    }

    /// Picking a model only dismisses the panel; the active mode stays.
    pub fn choose_model(&mut self) {
        self.model_panel_open = false;
    }

    pub fn open_attach_prompt(&mut self) {
        if self.modes_enabled {
            self.attach_prompt = Some(String::new());
        }
    }

    pub fn cancel_attach_prompt(&mut self) {
        self.attach_prompt = None;
    }

    pub fn attach_push_char(&mut self, c: char) {
        if let Some(path) = self.attach_prompt.as_mut() {
            path.push(c);
        }
    }

    pub fn attach_backspace(&mut self) {
        if let Some(path) = self.attach_prompt.as_mut() {
            path.pop();
        }
    }

    /// Closes the prompt and hands back the typed path, if any.
    pub fn take_attach_path(&mut self) -> Option<String> {
        let path = self.attach_prompt.take()?;
        let trimmed = path.trim().to_string();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repressing_active_mode_clears_it() {
        let mut composer = Composer::with_modes();

        composer.toggle_mode(Mode::DeepResearch);
        assert_eq!(composer.active_mode, Some(Mode::DeepResearch));

        composer.toggle_mode(Mode::DeepResearch);
        assert_eq!(composer.active_mode, None);
    }

    #[test]
    fn switching_modes_is_direct() {
        let mut composer = Composer::with_modes();

        composer.toggle_mode(Mode::WebSearch);
        composer.toggle_mode(Mode::StudyLearn);

        assert_eq!(composer.active_mode, Some(Mode::StudyLearn));
        assert_eq!(composer.active_mode_slug(), Some("study-learn"));
    }

    #[test]
    fn model_select_drives_the_panel() {
        let mut composer = Composer::with_modes();

        composer.toggle_mode(Mode::ModelSelect);
        assert!(composer.model_panel_open);

        composer.toggle_mode(Mode::DeepThinking);
        assert!(!composer.model_panel_open);
        assert_eq!(composer.active_mode, Some(Mode::DeepThinking));

        composer.toggle_mode(Mode::ModelSelect);
        composer.toggle_mode(Mode::ModelSelect);
        assert!(!composer.model_panel_open);
        assert_eq!(composer.active_mode, None);
    }

    #[test]
    fn choosing_a_model_closes_the_panel_and_nothing_else() {
        let mut composer = Composer::with_modes();

        composer.toggle_mode(Mode::ModelSelect);
        composer.model_cursor_down();
        composer.model_cursor_down();
        composer.choose_model();

        assert!(!composer.model_panel_open);
        assert_eq!(composer.active_mode, Some(Mode::ModelSelect));
    }

    #[test]
    fn model_cursor_stays_in_bounds() {
        let mut composer = Composer::with_modes();
        composer.toggle_mode(Mode::ModelSelect);

        for _ in 0..MODEL_OPTIONS.len() + 5 {
            composer.model_cursor_down();
        }
        assert_eq!(composer.model_cursor, MODEL_OPTIONS.len() - 1);

        for _ in 0..MODEL_OPTIONS.len() + 5 {
            composer.model_cursor_up();
        }
        assert_eq!(composer.model_cursor, 0);
    }

    #[test]
    fn plain_composer_ignores_modes_and_attach() {
        let mut composer = Composer::plain();

        composer.toggle_mode(Mode::DeepResearch);
        assert_eq!(composer.active_mode, None);

        composer.open_attach_prompt();
        assert!(composer.attach_prompt.is_none());
    }

    #[test]
    fn attach_prompt_round_trip() {
        let mut composer = Composer::with_modes();

        composer.open_attach_prompt();
        for c in "  /tmp/notes.pdf ".chars() {
            composer.attach_push_char(c);
        }
        assert_eq!(composer.take_attach_path().as_deref(), Some("/tmp/notes.pdf"));
        assert!(composer.attach_prompt.is_none());
    }

    #[test]
    fn empty_attach_path_is_none() {
        let mut composer = Composer::with_modes();

        composer.open_attach_prompt();
        composer.attach_push_char(' ');
        assert_eq!(composer.take_attach_path(), None);
    }

    #[test]
    fn take_input_drains_the_buffer() {
        let mut composer = Composer::plain();
        for c in "hello".chars() {
            composer.push_char(c);
        }
        composer.backspace();

        assert_eq!(composer.take_input(), "hell");
        assert!(composer.input.is_empty());
    }
}
