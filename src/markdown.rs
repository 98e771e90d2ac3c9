use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const CODE_FG: Color = Color::Rgb(209, 154, 102);
const GUTTER_FG: Color = Color::DarkGray;

/// Turns assistant markdown into styled terminal lines. Raw HTML is passed
/// through as literal text, never interpreted: assistant output gets
/// formatting, not markup execution.
pub fn render_markdown(text: &str, base: Style) -> Vec<Line<'static>> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut writer = MarkdownWriter::new(base);

    for event in Parser::new_ext(text, options) {
        if writer.in_code_block {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    writer.in_code_block = false;
                    writer.blank();
                }
                Event::Text(t) | Event::Code(t) => {
                    for code_line in t.lines() {
                        writer.push_code_line(code_line);
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(tag) => match tag {
                Tag::Paragraph => writer.begin_block(),
                Tag::Heading { .. } => {
                    writer.flush_line();
                    writer.heading = true;
                }
                Tag::BlockQuote(_) => {
                    writer.flush_line();
                    writer.quote_depth += 1;
                }
                Tag::List(start) => {
                    writer.flush_line();
                    writer.list_stack.push(match start {
                        Some(n) => ListKind::Ordered(n),
                        None => ListKind::Bullet,
                    });
                }
                Tag::Item => writer.begin_item(),
                Tag::CodeBlock(kind) => {
                    writer.flush_line();
                    if let CodeBlockKind::Fenced(lang) = kind {
                        if !lang.is_empty() {
                            writer.push_code_header(&lang);
                        }
                    }
                    writer.in_code_block = true;
                }
                Tag::Emphasis => writer.emphasis = true,
                Tag::Strong => writer.strong = true,
                Tag::Strikethrough => writer.strike = true,
                Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. } => {
                    writer.link = Some((dest_url.to_string(), writer.spans.len()));
                }
                _ => {}
            },
            Event::End(tag_end) => match tag_end {
                TagEnd::Paragraph => {
                    writer.flush_line();
                    writer.blank();
                }
                TagEnd::Heading(_) => {
                    writer.flush_line();
                    writer.heading = false;
                    writer.blank();
                }
                TagEnd::BlockQuote(_) => {
                    writer.flush_line();
                    writer.quote_depth = writer.quote_depth.saturating_sub(1);
                    writer.blank();
                }
                TagEnd::List(_) => {
                    writer.flush_line();
                    writer.list_stack.pop();
                    if writer.list_stack.is_empty() {
                        writer.blank();
                    }
                }
                TagEnd::Item => writer.flush_line(),
                TagEnd::Emphasis => writer.emphasis = false,
                TagEnd::Strong => writer.strong = false,
                TagEnd::Strikethrough => writer.strike = false,
                TagEnd::Link | TagEnd::Image => writer.finish_link(),
                _ => {}
            },
            Event::Text(t) => writer.push_text(&t),
            Event::Code(t) => writer.push_inline_code(&t),
            // The trust boundary: markup from the model shows up as text.
            Event::Html(t) => {
                for html_line in t.lines() {
                    writer.push_text(html_line);
                    writer.flush_line();
                }
            }
            Event::InlineHtml(t) => writer.push_text(&t),
            Event::SoftBreak => writer.push_text(" "),
            Event::HardBreak => writer.flush_line(),
            Event::Rule => {
                writer.flush_line();
                writer.push_rule();
                writer.blank();
            }
            Event::TaskListMarker(checked) => {
                writer.push_text(if checked { "[x] " } else { "[ ] " });
            }
            _ => {}
        }
    }

    writer.finish()
}

/// The user side of the transcript: every character shown exactly as typed,
/// no markdown interpretation.
pub fn literal_lines(text: &str, base: Style) -> Vec<Line<'static>> {
    text.split('\n')
        .map(|l| Line::from(Span::styled(l.to_string(), base)))
        .collect()
}

/// Greedy word wrap that keeps span styles intact. Words longer than the
/// width are broken by character.
pub fn wrap_line(line: &Line<'static>, width: usize) -> Vec<Line<'static>> {
    if width == 0 || line.width() <= width {
        return vec![line.clone()];
    }

    let mut wrapper = LineWrapper {
        width,
        lines: Vec::new(),
        current: Vec::new(),
        current_width: 0,
    };

    for span in &line.spans {
        for word in span.content.split_inclusive(' ') {
            wrapper.push_word(word, span.style);
        }
    }

    wrapper.finish()
}

#[derive(Clone, Copy)]
enum ListKind {
    Bullet,
    Ordered(u64),
}

struct MarkdownWriter {
    base: Style,
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    strong: bool,
    emphasis: bool,
    strike: bool,
    heading: bool,
    quote_depth: usize,
    list_stack: Vec<ListKind>,
    item_open: bool,
    in_code_block: bool,
    link: Option<(String, usize)>,
}

impl MarkdownWriter {
    fn new(base: Style) -> Self {
        Self {
            base,
            lines: Vec::new(),
            spans: Vec::new(),
            strong: false,
            emphasis: false,
            strike: false,
            heading: false,
            quote_depth: 0,
            list_stack: Vec::new(),
            item_open: false,
            in_code_block: false,
            link: None,
        }
    }

    fn current_style(&self) -> Style {
        let mut style = self.base;
        if self.heading {
            style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
        }
        if self.strong {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.emphasis {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strike {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        style
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.spans
            .push(Span::styled(text.to_string(), self.current_style()));
    }

    fn push_inline_code(&mut self, code: &str) {
        self.spans.push(Span::styled(
            code.to_string(),
            Style::default().fg(CODE_FG).add_modifier(Modifier::BOLD),
        ));
    }

    fn push_code_line(&mut self, code: &str) {
        self.flush_line();
        self.lines.push(Line::from(vec![
            Span::styled("▎ ".to_string(), Style::default().fg(GUTTER_FG)),
            Span::styled(
                code.to_string(),
                Style::default().fg(CODE_FG).add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    fn push_code_header(&mut self, lang: &str) {
        self.lines.push(Line::from(vec![
            Span::styled("▎ ".to_string(), Style::default().fg(GUTTER_FG)),
            Span::styled(
                lang.to_string(),
                self.base.add_modifier(Modifier::DIM | Modifier::ITALIC),
            ),
        ]));
    }

    fn push_rule(&mut self) {
        self.lines.push(Line::from(Span::styled(
            "─".repeat(32),
            Style::default().fg(GUTTER_FG),
        )));
    }

    // Paragraph open. Inside a freshly started list item the marker is
    // already on the current line and must not be flushed away.
    fn begin_block(&mut self) {
        if self.item_open {
            self.item_open = false;
            return;
        }
        self.flush_line();
        self.push_quote_prefix();
    }

    fn begin_item(&mut self) {
        self.flush_line();
        self.item_open = true;
        self.push_quote_prefix();
        let depth = self.list_stack.len();
        if depth > 1 {
            self.spans.push(Span::styled(
                "  ".repeat(depth - 1),
                self.base,
            ));
        }
        if let Some(kind) = self.list_stack.last_mut() {
            let marker = match kind {
                ListKind::Bullet => "• ".to_string(),
                ListKind::Ordered(n) => {
                    let marker = format!("{}. ", n);
                    *n += 1;
                    marker
                }
            };
            self.spans.push(Span::styled(marker, self.base));
        }
    }

    fn push_quote_prefix(&mut self) {
        if self.quote_depth > 0 {
            self.spans.push(Span::styled(
                "> ".repeat(self.quote_depth),
                self.base.add_modifier(Modifier::DIM),
            ));
        }
    }

    fn finish_link(&mut self) {
        if let Some((url, start)) = self.link.take() {
            if url.is_empty() {
                return;
            }
            let text: String = self.spans[start.min(self.spans.len())..]
                .iter()
                .map(|s| s.content.as_ref())
                .collect();
            if text != url {
                self.spans.push(Span::styled(
                    format!(" ({})", url),
                    self.base.add_modifier(Modifier::DIM),
                ));
            }
        }
    }

    fn flush_line(&mut self) {
        self.item_open = false;
        if !self.spans.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.spans)));
        }
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| l.width() > 0) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.width() == 0) {
            self.lines.pop();
        }
        self.lines
    }
}

struct LineWrapper {
    width: usize,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    current_width: usize,
}

impl LineWrapper {
    fn push_word(&mut self, word: &str, style: Style) {
        let mut word = word;
        if self.current_width == 0 {
            word = word.trim_start();
        }
        if word.is_empty() {
            return;
        }

        let word_width = word.width();
        if self.current_width > 0 && self.current_width + word_width > self.width {
            self.flush();
            word = word.trim_start();
            if word.is_empty() {
                return;
            }
        }

        if word.width() > self.width {
            self.push_oversized(word, style);
            return;
        }

        self.append(word, style);
    }

    fn push_oversized(&mut self, word: &str, style: Style) {
        let mut buf = String::new();
        let mut buf_width = 0;
        for ch in word.chars() {
            let ch_width = ch.width().unwrap_or(0);
            let available = self.width.saturating_sub(self.current_width).max(1);
            if buf_width + ch_width > available && !buf.is_empty() {
                self.append(&buf, style);
                self.flush();
                buf.clear();
                buf_width = 0;
            }
            buf.push(ch);
            buf_width += ch_width;
        }
        if !buf.is_empty() {
            self.append(&buf, style);
        }
    }

    fn append(&mut self, text: &str, style: Style) {
        self.current_width += text.width();
        if let Some(last) = self.current.last_mut() {
            if last.style == style {
                last.content.to_mut().push_str(text);
                return;
            }
        }
        self.current.push(Span::styled(text.to_string(), style));
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.lines.push(Line::from(std::mem::take(&mut self.current)));
            self.current_width = 0;
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        if self.lines.is_empty() {
            self.lines.push(Line::default());
        }
        self.lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn all_text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(text_of).collect()
    }

    #[test]
    fn heading_is_styled_without_hashes() {
        let lines = render_markdown("# Getting Started", Style::default());

        assert_eq!(text_of(&lines[0]), "Getting Started");
        assert!(lines[0].spans[0]
            .style
            .add_modifier
            .contains(Modifier::BOLD));
    }

    #[test]
    fn strong_and_emphasis_become_modifiers() {
        let lines = render_markdown("plain **bold** and *slanted*", Style::default());
        let spans = &lines[0].spans;

        let bold = spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));

        let slanted = spans.iter().find(|s| s.content == "slanted").unwrap();
        assert!(slanted.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn fenced_code_block_shows_language_and_content() {
        let lines = render_markdown("```rust\nfn main() {}\n```", Style::default());
        let texts = all_text(&lines);

        assert!(texts.iter().any(|t| t.contains("rust")));
        let code = lines
            .iter()
            .find(|l| text_of(l).contains("fn main() {}"))
            .unwrap();
        assert_eq!(code.spans.last().unwrap().style.fg, Some(CODE_FG));
    }

    #[test]
    fn inline_html_is_literal_text() {
        let lines = render_markdown("before <b>mid</b> after", Style::default());

        assert_eq!(text_of(&lines[0]), "before <b>mid</b> after");
    }

    #[test]
    fn block_html_is_literal_text() {
        let lines = render_markdown("<div class=\"x\">\nhello\n</div>", Style::default());
        let texts = all_text(&lines);

        assert!(texts.iter().any(|t| t.contains("<div class=\"x\">")));
    }

    #[test]
    fn lists_get_markers() {
        let lines = render_markdown("- alpha\n- beta\n\n1. one\n2. two", Style::default());
        let texts = all_text(&lines);

        assert!(texts.contains(&"• alpha".to_string()));
        assert!(texts.contains(&"• beta".to_string()));
        assert!(texts.contains(&"1. one".to_string()));
        assert!(texts.contains(&"2. two".to_string()));
    }

    #[test]
    fn blockquote_lines_are_prefixed() {
        let lines = render_markdown("> quoted text", Style::default());

        assert!(text_of(&lines[0]).starts_with("> "));
    }

    #[test]
    fn link_url_is_appended_when_it_differs_from_text() {
        let lines = render_markdown("[docs](https://example.com)", Style::default());

        assert_eq!(text_of(&lines[0]), "docs (https://example.com)");
    }

    #[test]
    fn user_text_stays_literal() {
        let base = Style::default();
        let lines = literal_lines("**not bold**\n`not code`", base);

        assert_eq!(text_of(&lines[0]), "**not bold**");
        assert_eq!(text_of(&lines[1]), "`not code`");
        assert_eq!(lines[0].spans[0].style, base);
    }

    #[test]
    fn wrap_line_respects_width() {
        let line = Line::from(Span::raw("the quick brown fox jumps over the lazy dog"));
        let wrapped = wrap_line(&line, 12);

        assert!(wrapped.len() > 1);
        for l in &wrapped {
            assert!(l.width() <= 12, "line too wide: {:?}", text_of(l));
        }
        let rejoined: Vec<String> = wrapped
            .iter()
            .flat_map(|l| {
                text_of(l)
                    .split_whitespace()
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .collect();
        assert_eq!(rejoined.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_line_keeps_span_styles() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let line = Line::from(vec![
            Span::raw("plain words then "),
            Span::styled("heavily styled tail words", bold),
        ]);

        let wrapped = wrap_line(&line, 10);
        for l in &wrapped {
            for span in &l.spans {
                if span.content.contains("tail") {
                    assert_eq!(span.style, bold);
                }
            }
        }
    }

    #[test]
    fn wrap_line_breaks_oversized_words() {
        let line = Line::from(Span::raw("abcdefghijklmnopqrstuvwxyz"));
        let wrapped = wrap_line(&line, 8);

        assert!(wrapped.len() >= 3);
        for l in &wrapped {
            assert!(l.width() <= 8);
        }
    }

    #[test]
    fn short_lines_pass_through_unwrapped() {
        let line = Line::from(Span::raw("short"));
        let wrapped = wrap_line(&line, 40);

        assert_eq!(wrapped.len(), 1);
        assert_eq!(text_of(&wrapped[0]), "short");
    }
}
