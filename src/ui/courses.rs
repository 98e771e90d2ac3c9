use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::courses::CoursesScreen;
use crate::models::{Course, CourseStatus};

/// Draws the course catalog: filter row, the three status groups and an
/// optional detail popup.
pub fn draw_courses_screen(f: &mut Frame<'_>, area: Rect, screen: &CoursesScreen) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Courses")
        .style(Style::default().fg(Color::LightYellow).bg(Color::Black));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)].as_ref())
        .split(inner);

    draw_filter_row(f, rows[0], screen);
    draw_groups(f, rows[1], screen);

    if screen.detail_open {
        if let Some(course) = screen.selected() {
            draw_detail(f, area, course);
        }
    }
}

fn draw_filter_row(f: &mut Frame, area: Rect, screen: &CoursesScreen) {
    let level = match screen.level_filter {
        Some(level) => level.as_str(),
        None => "All",
    };
    let mut spans = vec![
        Span::styled("◂ ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            screen.category(),
            Style::default()
                .fg(Color::LightMagenta)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ▸", Style::default().fg(Color::DarkGray)),
        Span::raw("   "),
        Span::styled("Level: ", Style::default().fg(Color::DarkGray)),
        Span::styled(level, Style::default().fg(Color::White)),
        Span::raw("   "),
        Span::styled("🔎 ", Style::default().fg(Color::DarkGray)),
        Span::styled(screen.search.clone(), Style::default().fg(Color::White)),
    ];
    if screen.degraded {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            "offline catalog",
            Style::default().fg(Color::Yellow),
        ));
    } else if screen.loading {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            "loading...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    f.render_widget(
        Paragraph::new(vec![
            Line::from(spans),
            Line::from(Span::styled(
                "─".repeat(area.width as usize),
                Style::default().fg(Color::DarkGray),
            )),
        ]),
        area,
    );
}

fn draw_groups(f: &mut Frame, area: Rect, screen: &CoursesScreen) {
    let groups = [
        (
            CourseStatus::Ongoing,
            "Your Ongoing Courses",
            "No ongoing courses match the selected level.",
        ),
        (
            CourseStatus::Recommended,
            "AI-Recommended Courses",
            "No recommended courses match the selected level.",
        ),
        (
            CourseStatus::Library,
            "Course Library",
            "No courses in the library match the selected level.",
        ),
    ];

    let mut lines: Vec<Line> = Vec::new();
    let mut flat_idx = 0usize;
    for (status, heading, empty_hint) in groups {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            heading,
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        )));
        let members = screen.by_status(status);
        if members.is_empty() {
            lines.push(Line::from(Span::styled(
                empty_hint,
                Style::default().fg(Color::DarkGray),
            )));
            continue;
        }
        for course in members {
            let selected = flat_idx == screen.cursor;
            let style = if selected {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::LightMagenta)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if selected { "➤ " } else { "  " };
            lines.push(Line::from(vec![
                Span::styled(marker, style),
                Span::styled(course.title.clone(), style),
            ]));
            lines.push(Line::from(Span::styled(
                course_summary(course),
                Style::default().fg(Color::DarkGray),
            )));
            flat_idx += 1;
        }
    }

    f.render_widget(Paragraph::new(lines), area);
}

fn course_summary(course: &Course) -> String {
    let mut parts = vec![format!("     {}", course.level.as_str())];
    if let Some(duration) = &course.duration {
        parts.push(duration.clone());
    }
    if let Some(progress) = course.progress {
        parts.push(format!("⏳ {}%", progress));
    }
    if let Some(rating) = course.rating {
        parts.push(format!("★ {:.1}", rating));
    }
    parts.join(" · ")
}

fn draw_detail(f: &mut Frame, area: Rect, course: &Course) {
    let width = 52.min(area.width);
    let height = 12.min(area.height);
    let popup = Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, popup);

    let mut lines = vec![Line::from(vec![
        Span::styled("Level: ", Style::default().fg(Color::DarkGray)),
        Span::styled(course.level.as_str(), Style::default().fg(Color::White)),
    ])];
    if let Some(duration) = &course.duration {
        lines.push(Line::from(vec![
            Span::styled("Duration: ", Style::default().fg(Color::DarkGray)),
            Span::styled(duration.clone(), Style::default().fg(Color::White)),
        ]));
    }
    if !course.skills.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Skills: ", Style::default().fg(Color::DarkGray)),
            Span::styled(course.skills.join(", "), Style::default().fg(Color::White)),
        ]));
    }
    if !course.job_roles.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Job Roles: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                course.job_roles.join(", "),
                Style::default().fg(Color::White),
            ),
        ]));
    }
    if let Some(rating) = course.rating {
        lines.push(Line::from(vec![
            Span::styled("Rating: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("★ {:.1}", rating),
                Style::default().fg(Color::Yellow),
            ),
        ]));
    }
    if let Some(progress) = course.progress {
        lines.push(Line::from(vec![
            Span::styled("Progress: ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{}%", progress), Style::default().fg(Color::White)),
        ]));
    }

    let detail = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(course.title.clone())
                .style(Style::default().fg(Color::LightMagenta).bg(Color::Black)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(detail, popup);
}
