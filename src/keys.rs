use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::AppState;
use crate::quiz::QuizCommand;

/// What a key press asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quiz(QuizCommand),
    ScrollUp,
    ScrollDown,
    Restart,
    Quit,
}

pub fn action_for(state: AppState, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match state {
        AppState::Quiz => quiz_action(key.code),
        AppState::Results => results_action(key.code),
    }
}

fn quiz_action(code: KeyCode) -> Option<Action> {
    let command = match code {
        KeyCode::Char(c @ '1'..='9') => QuizCommand::Answer(c as usize - '1' as usize),
        KeyCode::Char(c @ 'a'..='f') => QuizCommand::Answer(c as usize - 'a' as usize),
        KeyCode::Right | KeyCode::Enter | KeyCode::Char('n') => QuizCommand::Next,
        KeyCode::Left | KeyCode::Char('p') => QuizCommand::Previous,
        KeyCode::Char('h') => QuizCommand::ToggleHint,
        KeyCode::Esc | KeyCode::Char('q') => return Some(Action::Quit),
        _ => return None,
    };
    Some(Action::Quiz(command))
}

fn results_action(code: KeyCode) -> Option<Action> {
    match code {
        KeyCode::Char('r') => Some(Action::Restart),
        KeyCode::Down | KeyCode::Char('j') => Some(Action::ScrollDown),
        KeyCode::Up | KeyCode::Char('k') => Some(Action::ScrollUp),
        KeyCode::Esc | KeyCode::Char('q') => Some(Action::Quit),
        _ => None,
    }
}
