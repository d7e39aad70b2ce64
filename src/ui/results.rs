use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::quiz::Notice;
use crate::session::ThemeResult;
use crate::ui::{truncate_to_width, Palette};

const THEME_COLUMN_WIDTH: usize = 44;

pub(crate) fn render_results(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(session) = app.quiz.session() else {
        return;
    };
    let Some(final_score) = session.final_score() else {
        return;
    };
    let palette = Palette::for_theme(app.color_theme);
    let t = &app.translations;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(2)
        .vertical_margin(1)
        .constraints([
            Constraint::Length(6), // score summary
            Constraint::Length(2), // notice
            Constraint::Min(1),    // breakdown
            Constraint::Length(1), // controls
        ])
        .split(area);

    let grade = grade_color(final_score.percentage(), palette);
    let summary = vec![
        Line::from(Span::styled(
            t.t("results.title"),
            Style::default().fg(palette.accent).add_modifier(Modifier::BOLD),
        )),
        Line::from(app.title()),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{}  ({:.0}%)",
                t.lookup(
                    "results.final_score",
                    &[
                        ("score", &final_score.score.to_string()),
                        ("total", &final_score.total.to_string()),
                    ],
                ),
                final_score.percentage()
            ),
            Style::default().fg(grade).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            t.lookup(
                "results.unanswered",
                &[("count", &session.unanswered().to_string())],
            ),
            Style::default().fg(palette.dim),
        )),
    ];
    Paragraph::new(summary)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(palette.dim)),
        )
        .render(chunks[0], buf);

    if let Some(notice) = app.quiz.notice() {
        let text = match notice {
            Notice::TimeUp => t.t("notice.time_up"),
            Notice::BuildFailed(message) => message.clone(),
        };
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(palette.warning).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[1], buf);
    }

    let mut lines = vec![Line::from(Span::styled(
        t.t("results.breakdown"),
        Style::default().add_modifier(Modifier::UNDERLINED),
    ))];
    lines.extend(
        session
            .breakdown()
            .iter()
            .map(|row| breakdown_line(row, palette)),
    );
    Paragraph::new(lines)
        .scroll((app.results_scroll, 0))
        .render(chunks[2], buf);

    Paragraph::new(Span::styled(
        t.t("results.controls"),
        Style::default().fg(palette.dim).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[3], buf);
}

fn breakdown_line(row: &ThemeResult, palette: Palette) -> Line<'static> {
    let label = truncate_to_width(&row.theme_label, THEME_COLUMN_WIDTH);
    let color = if row.answered == 0 {
        palette.dim
    } else if row.correct == row.total {
        palette.correct
    } else if row.correct * 2 >= row.total {
        palette.warning
    } else {
        palette.wrong
    };
    Line::from(vec![
        Span::styled(
            format!("{label:<width$}", width = THEME_COLUMN_WIDTH),
            Style::default().fg(palette.text),
        ),
        Span::styled(
            format!("{:>3} / {:<3}", row.correct, row.total),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn grade_color(percentage: f64, palette: Palette) -> Color {
    match percentage as u32 {
        80..=100 => palette.correct,
        50..=79 => palette.warning,
        _ => palette.wrong,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::QuestionRecord;
    use crate::builder::{QuizConfiguration, SimulationConfig};
    use crate::config::ColorTheme;
    use crate::i18n::{Locale, Translations};
    use crate::quiz::QuizCommand;
    use crate::ui::rendered;
    use std::time::Duration;

    fn finished_app() -> App {
        let mut app = App::new(
            QuizConfiguration::Simulation(SimulationConfig::default()),
            Translations::load(Locale::Fr),
            ColorTheme::Light,
        );
        let questions = ["Principes & Valeurs", "Principes & Valeurs", "Histoire"]
            .iter()
            .enumerate()
            .map(|(i, label)| {
                QuestionRecord::new(
                    format!("q{i}"),
                    vec!["oui".into(), "non".into()],
                    "oui".into(),
                    None,
                    (*label).into(),
                )
            })
            .collect();
        app.start(questions).unwrap();
        app.quiz.handle(QuizCommand::Answer(0));
        app.quiz.handle(QuizCommand::Next);
        app.quiz.handle(QuizCommand::Answer(1));
        app.quiz.handle(QuizCommand::Next);
        app.quiz.handle(QuizCommand::Next);
        app
    }

    #[test]
    fn shows_final_score_and_breakdown() {
        let app = finished_app();
        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("Score Final : 1 / 3"));
        assert!(text.contains("Questions sans réponse : 1"));
        assert!(text.contains("Principes & Valeurs"));
        assert!(text.contains("Histoire"));
    }

    #[test]
    fn shows_time_up_notice() {
        let mut app = App::new(
            QuizConfiguration::Simulation(SimulationConfig {
                timed: true,
                ..SimulationConfig::default()
            }),
            Translations::load(Locale::Fr),
            ColorTheme::Dark,
        );
        app.start(vec![QuestionRecord::new(
            "q".into(),
            vec!["oui".into()],
            "oui".into(),
            None,
            "Institutions".into(),
        )])
        .unwrap();
        app.on_tick(Duration::from_secs(45 * 60));
        let text = rendered(&app, Rect::new(0, 0, 100, 24));
        assert!(text.contains("Temps écoulé"));
        assert!(text.contains("Score Final : 0 / 1"));
    }

    #[test]
    fn grade_colors_follow_percentage() {
        let palette = Palette::for_theme(ColorTheme::Dark);
        assert_eq!(grade_color(100.0, palette), palette.correct);
        assert_eq!(grade_color(80.0, palette), palette.correct);
        assert_eq!(grade_color(60.0, palette), palette.warning);
        assert_eq!(grade_color(10.0, palette), palette.wrong);
    }
}
