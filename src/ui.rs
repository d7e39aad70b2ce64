pub mod results;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, AppState};
use crate::bank::QuestionRecord;
use crate::config::ColorTheme;
use crate::session::SessionState;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;
const SIDEBAR_WIDTH: u16 = 34;

/// Colors for one color theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub correct: Color,
    pub wrong: Color,
    pub warning: Color,
}

impl Palette {
    pub fn for_theme(theme: ColorTheme) -> Self {
        match theme {
            ColorTheme::Dark => Self {
                accent: Color::Cyan,
                text: Color::White,
                dim: Color::DarkGray,
                correct: Color::Green,
                wrong: Color::Red,
                warning: Color::Yellow,
            },
            ColorTheme::Light => Self {
                accent: Color::Blue,
                text: Color::Black,
                dim: Color::Gray,
                correct: Color::Rgb(0, 128, 0),
                wrong: Color::Rgb(178, 34, 34),
                warning: Color::Rgb(184, 134, 11),
            },
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.state() {
            AppState::Quiz => render_quiz(self, area, buf),
            AppState::Results => results::render_results(self, area, buf),
        }
    }
}

fn render_quiz(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.quiz.session() else {
        return;
    };
    let Some(question) = session.current() else {
        return;
    };
    let palette = Palette::for_theme(app.color_theme);
    let t = &app.translations;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Length(1), // padding
            Constraint::Min(1),    // body
            Constraint::Length(1), // controls
        ])
        .split(area);

    render_header(app, session, palette, rows[0], buf);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)])
        .split(rows[2]);

    render_question(app, question, palette, columns[0], buf);
    render_stats(app, session, palette, columns[1], buf);

    let next = if session.is_last() {
        t.t("quiz.finish")
    } else {
        t.t("quiz.next")
    };
    Paragraph::new(Span::styled(
        t.lookup("quiz.controls", &[("next", next.as_str())]),
        Style::default().fg(palette.dim).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(rows[3], buf);
}

fn render_header(app: &App, session: &SessionState, palette: Palette, area: Rect, buf: &mut Buffer) {
    let index = session.current_index().unwrap_or(0);
    let counter = app.translations.lookup(
        "quiz.counter",
        &[
            ("current", &(index + 1).to_string()),
            ("total", &session.len().to_string()),
        ],
    );

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    Paragraph::new(Span::styled(
        app.title(),
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
    ))
    .render(halves[0], buf);

    Paragraph::new(Span::styled(counter, Style::default().fg(palette.dim)))
        .alignment(Alignment::Right)
        .render(halves[1], buf);
}

fn render_question(
    app: &App,
    question: &QuestionRecord,
    palette: Palette,
    area: Rect,
    buf: &mut Buffer,
) {
    let t = &app.translations;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(
            question.question.clone(),
            bold.fg(palette.text),
        )),
        Line::from(""),
    ];

    if question.choices.is_empty() {
        lines.push(Line::from(Span::styled(
            t.t("quiz.no_choices"),
            Style::default().fg(palette.dim).add_modifier(Modifier::ITALIC),
        )));
    }

    for (index, choice) in question.choices.iter().enumerate() {
        let (marker, style) = choice_style(question, choice, palette);
        lines.push(Line::from(vec![
            Span::styled(format!(" {marker} "), style),
            Span::styled(format!("{}. ", index + 1), style),
            Span::styled(choice.clone(), style),
        ]));
        lines.push(Line::from(""));
    }

    if app.quiz.hint_visible() {
        let hint = question
            .hint
            .clone()
            .unwrap_or_else(|| t.t("quiz.hint_missing"));
        lines.push(Line::from(vec![
            Span::styled(format!("{} : ", t.t("quiz.hint")), bold.fg(palette.warning)),
            Span::styled(hint, Style::default().fg(palette.warning)),
        ]));
    }

    Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::RIGHT).border_style(Style::default().fg(palette.dim)))
        .render(area, buf);
}

/// Marker and style for a choice; answered questions reveal the correct
/// choice and the user's wrong pick.
fn choice_style(question: &QuestionRecord, choice: &str, palette: Palette) -> (&'static str, Style) {
    match question.user_answer() {
        None => (" ", Style::default().fg(palette.text)),
        Some(_) if choice == question.correct_answer => (
            "✓",
            Style::default().fg(palette.correct).add_modifier(Modifier::BOLD),
        ),
        Some(answer) if answer == choice => (
            "✗",
            Style::default().fg(palette.wrong).add_modifier(Modifier::BOLD),
        ),
        Some(_) => (" ", Style::default().fg(palette.dim)),
    }
}

fn render_stats(app: &App, session: &SessionState, palette: Palette, area: Rect, buf: &mut Buffer) {
    let t = &app.translations;
    let stats = session.stats();
    let label_width = (SIDEBAR_WIDTH as usize).saturating_sub(4);
    let dim = Style::default().fg(palette.dim);
    let value = Style::default().fg(palette.text).add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(Span::styled(t.t("stats.theme"), dim)),
        Line::from(Span::styled(
            truncate_to_width(&stats.theme_label, label_width),
            value.fg(palette.accent),
        )),
        Line::from(""),
        stat_line(&t.t("stats.theme_left"), stats.remaining_in_theme, dim, value),
        stat_line(&t.t("stats.total_left"), stats.remaining_total, dim, value),
        stat_line(&t.t("stats.correct"), stats.score, dim, value.fg(palette.correct)),
        stat_line(&t.t("stats.wrong"), stats.errors, dim, value.fg(palette.wrong)),
    ];

    if let Some(countdown) = app.quiz.countdown().filter(|c| c.is_running()) {
        let urgent = countdown.remaining().as_secs() < 5 * 60;
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(format!("{} ", t.t("stats.time_left")), dim),
            Span::styled(
                countdown.display(),
                value.fg(if urgent { palette.wrong } else { palette.accent }),
            ),
        ]));
    }

    Paragraph::new(lines)
        .block(
            Block::default()
                .title(t.t("stats.title"))
                .borders(Borders::NONE),
        )
        .render(area.inner(ratatui::layout::Margin::new(2, 0)), buf);
}

fn stat_line<'a>(label: &str, count: usize, label_style: Style, value_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label} "), label_style),
        Span::styled(count.to_string(), value_style),
    ])
}

/// Cut `text` to at most `width` terminal columns, ending with an ellipsis
/// when something was removed.
pub fn truncate_to_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
pub(crate) fn rendered(app: &App, area: Rect) -> String {
    let mut buffer = Buffer::empty(area);
    app.render(area, &mut buffer);
    buffer
        .content()
        .iter()
        .map(|c| c.symbol())
        .collect::<String>()
}
