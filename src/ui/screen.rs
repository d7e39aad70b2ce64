use ratatui::Frame;

use crate::app::{App, AppState};

/// A UI screen boundary: one per app state
pub trait Screen {
    fn render(&self, app: &App, f: &mut Frame);
}

/// Question, choices, hint and the stats sidebar
pub struct QuizScreen;

impl Screen for QuizScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

/// Final score and per-theme breakdown
pub struct ResultsScreen;

impl Screen for ResultsScreen {
    fn render(&self, app: &App, f: &mut Frame) {
        f.render_widget(app, f.area());
    }
}

pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::Quiz => Box::new(QuizScreen),
        AppState::Results => Box::new(ResultsScreen),
    }
}
