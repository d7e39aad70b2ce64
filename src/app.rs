use std::time::Duration;

use crossterm::event::KeyEvent;

use crate::bank::QuestionRecord;
use crate::builder::QuizConfiguration;
use crate::config::ColorTheme;
use crate::error::{BuildError, SessionError};
use crate::i18n::Translations;
use crate::keys::{action_for, Action};
use crate::quiz::{Notice, Quiz, QuizCommand};
use crate::runtime::QuizEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Quiz,
    Results,
}

/// What the event loop should do after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Restart,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub quiz: Quiz,
    pub configuration: QuizConfiguration,
    pub translations: Translations,
    pub color_theme: ColorTheme,
    pub results_scroll: u16,
}

impl App {
    pub fn new(
        configuration: QuizConfiguration,
        translations: Translations,
        color_theme: ColorTheme,
    ) -> Self {
        Self {
            quiz: Quiz::new(),
            configuration,
            translations,
            color_theme,
            results_scroll: 0,
        }
    }

    pub fn start(&mut self, questions: Vec<QuestionRecord>) -> Result<(), SessionError> {
        self.quiz.start(questions, self.configuration.is_timed())?;
        self.results_scroll = 0;
        Ok(())
    }

    /// Keep the finished session on screen and explain why no new one began.
    pub fn restart_failed(&mut self, err: &BuildError) {
        let message = describe_build_error(&self.translations, err);
        self.quiz.set_notice(Notice::BuildFailed(message));
    }

    pub fn state(&self) -> AppState {
        if self.quiz.is_finished() {
            AppState::Results
        } else {
            AppState::Quiz
        }
    }

    pub fn title(&self) -> String {
        match &self.configuration {
            QuizConfiguration::Simulation(_) => self.translations.t("mode.simulation"),
            QuizConfiguration::Theme(theme) => self
                .translations
                .lookup("mode.theme", &[("theme", theme.label.as_str())]),
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        match action_for(self.state(), key) {
            Some(Action::Quiz(command)) => {
                self.quiz.handle(command);
                Flow::Continue
            }
            Some(Action::ScrollDown) => {
                self.results_scroll = self.results_scroll.saturating_add(1);
                Flow::Continue
            }
            Some(Action::ScrollUp) => {
                self.results_scroll = self.results_scroll.saturating_sub(1);
                Flow::Continue
            }
            Some(Action::Restart) => Flow::Restart,
            Some(Action::Quit) => Flow::Quit,
            None => Flow::Continue,
        }
    }

    pub fn on_tick(&mut self, elapsed: Duration) {
        self.quiz.handle(QuizCommand::Tick(elapsed));
    }

    /// Apply one runtime event. Time elapsed since the previous event is
    /// charged to the countdown first, so no input lands after expiry and a
    /// steady stream of keys cannot hold the clock back.
    pub fn on_event(&mut self, event: QuizEvent, elapsed: Duration) -> Flow {
        self.on_tick(elapsed);
        match event {
            QuizEvent::Key(key) => self.on_key(key),
            QuizEvent::Resize | QuizEvent::Tick => Flow::Continue,
        }
    }
}

pub fn describe_build_error(t: &Translations, err: &BuildError) -> String {
    match err {
        BuildError::MissingApiKey => t.t("error.missing_api_key"),
        BuildError::GeneratorUnavailable => t.t("error.generator_unavailable"),
        BuildError::NoSituationalQuestions => t.t("error.no_situational"),
        BuildError::UnknownTheme(theme) => t.lookup("error.unknown_theme", &[("theme", theme)]),
        BuildError::EmptySession | BuildError::Session(SessionError::Empty) => {
            t.t("error.empty_session")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{SimulationConfig, ThemeConfig};
    use crate::i18n::Locale;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn app(timed: bool) -> App {
        let configuration = QuizConfiguration::Simulation(SimulationConfig {
            timed,
            ..SimulationConfig::default()
        });
        App::new(configuration, Translations::load(Locale::Fr), ColorTheme::Dark)
    }

    fn questions(n: usize) -> Vec<QuestionRecord> {
        (0..n)
            .map(|i| {
                QuestionRecord::new(
                    format!("q{i}"),
                    vec!["oui".into(), "non".into()],
                    "oui".into(),
                    None,
                    "Institutions".into(),
                )
            })
            .collect()
    }

    fn press(app: &mut App, code: KeyCode) -> Flow {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn walks_to_results() {
        let mut app = app(false);
        app.start(questions(2)).unwrap();
        assert_eq!(app.state(), AppState::Quiz);

        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('2'));
        press(&mut app, KeyCode::Right);

        assert_eq!(app.state(), AppState::Results);
        let session = app.quiz.session().unwrap();
        assert_eq!((session.score(), session.errors()), (1, 1));
        assert_eq!(press(&mut app, KeyCode::Char('r')), Flow::Restart);
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }

    #[test]
    fn timed_configuration_starts_countdown() {
        let mut app = app(true);
        app.start(questions(1)).unwrap();
        assert!(app.quiz.countdown().is_some_and(|c| c.is_running()));
        app.on_tick(Duration::from_secs(1));
        assert_eq!(
            app.quiz.countdown().unwrap().remaining(),
            crate::timer::SIMULATION_DURATION - Duration::from_secs(1)
        );
    }

    #[test]
    fn results_scroll_saturates() {
        let mut app = app(false);
        app.start(questions(1)).unwrap();
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.results_scroll, 0);
        press(&mut app, KeyCode::Down);
        assert_eq!(app.results_scroll, 1);
    }

    #[test]
    fn failed_restart_leaves_a_notice() {
        let mut app = app(false);
        app.start(questions(1)).unwrap();
        press(&mut app, KeyCode::Right);
        app.restart_failed(&BuildError::MissingApiKey);
        assert_eq!(app.state(), AppState::Results);
        assert!(matches!(app.quiz.notice(), Some(Notice::BuildFailed(msg)) if msg.contains("clé API")));
    }

    #[test]
    fn title_reflects_mode() {
        let theme = QuizConfiguration::Theme(ThemeConfig {
            theme_key: "bloc1_principes_valeurs".into(),
            count: 5,
            label: "Principes & Valeurs".into(),
        });
        let app = App::new(theme, Translations::load(Locale::Fr), ColorTheme::Dark);
        assert_eq!(app.title(), "Entraînement : Principes & Valeurs");
    }

    #[test]
    fn key_after_expiry_is_not_applied() {
        let mut app = app(true);
        app.start(questions(2)).unwrap();
        let key = QuizEvent::Key(KeyEvent::new(KeyCode::Char('1'), KeyModifiers::NONE));

        assert_eq!(
            app.on_event(key, crate::timer::SIMULATION_DURATION),
            Flow::Continue
        );
        assert_eq!(app.state(), AppState::Results);
        assert_eq!(app.quiz.notice(), Some(&Notice::TimeUp));
        let session = app.quiz.session().unwrap();
        assert_eq!((session.score(), session.errors()), (0, 0));
    }

    #[test]
    fn key_events_advance_the_clock() {
        let mut app = app(true);
        app.start(questions(2)).unwrap();
        let hint = QuizEvent::Key(KeyEvent::new(KeyCode::Char('h'), KeyModifiers::NONE));
        for _ in 0..10 {
            app.on_event(hint.clone(), Duration::from_millis(100));
        }
        assert_eq!(
            app.quiz.countdown().unwrap().remaining(),
            crate::timer::SIMULATION_DURATION - Duration::from_secs(1)
        );
    }

    #[test]
    fn session_errors_are_translated() {
        let t = Translations::load(Locale::Fr);
        let err = BuildError::from(SessionError::Empty);
        assert_eq!(describe_build_error(&t, &err), t.t("error.empty_session"));
    }

    #[test]
    fn build_errors_are_translated() {
        let t = Translations::load(Locale::En);
        assert_eq!(
            describe_build_error(&t, &BuildError::UnknownTheme("bloc9".into())),
            "Unknown theme: bloc9"
        );
    }
}
