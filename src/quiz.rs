use std::time::Duration;

use tracing::info;

use crate::bank::QuestionRecord;
use crate::error::SessionError;
use crate::session::{AnswerOutcome, SessionState};
use crate::timer::{Countdown, TimerEvent, SIMULATION_DURATION};

/// Discrete inputs applied to the running quiz, in queue order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizCommand {
    Answer(usize),
    Next,
    Previous,
    ToggleHint,
    Tick(Duration),
}

/// One-shot message shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    TimeUp,
    BuildFailed(String),
}

/// Owner of the single active session and its countdown
#[derive(Debug, Default)]
pub struct Quiz {
    session: Option<SessionState>,
    countdown: Option<Countdown>,
    show_hint: bool,
    notice: Option<Notice>,
}

impl Quiz {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever ran before with a fresh session over `questions`.
    pub fn start(&mut self, questions: Vec<QuestionRecord>, timed: bool) -> Result<(), SessionError> {
        self.start_with_duration(questions, timed.then_some(SIMULATION_DURATION))
    }

    pub fn start_with_duration(
        &mut self,
        questions: Vec<QuestionRecord>,
        duration: Option<Duration>,
    ) -> Result<(), SessionError> {
        let session = SessionState::new(questions)?;

        if let Some(mut previous) = self.countdown.take() {
            previous.cancel();
        }
        self.session = Some(session);
        self.countdown = duration.map(Countdown::start);
        self.show_hint = false;
        self.notice = None;
        Ok(())
    }

    pub fn handle(&mut self, command: QuizCommand) -> Option<AnswerOutcome> {
        let session = self.session.as_mut()?;

        match command {
            QuizCommand::Answer(choice) => return Some(session.answer_index(choice)),
            QuizCommand::Next => {
                let was = session.current_index();
                if session.advance() {
                    self.conclude_countdown();
                }
                if session_moved(was, self.session.as_ref()) {
                    self.show_hint = false;
                }
            }
            QuizCommand::Previous => {
                let was = session.current_index();
                session.retreat();
                if session_moved(was, self.session.as_ref()) {
                    self.show_hint = false;
                }
            }
            QuizCommand::ToggleHint => {
                if !session.is_finished() {
                    self.show_hint = !self.show_hint;
                }
            }
            QuizCommand::Tick(elapsed) => self.on_tick(elapsed),
        }
        None
    }

    fn on_tick(&mut self, elapsed: Duration) {
        let expired = self
            .countdown
            .as_mut()
            .and_then(|countdown| countdown.on_tick(elapsed));

        if let (Some(TimerEvent::Expired), Some(session)) = (expired, self.session.as_mut()) {
            if !session.is_finished() {
                info!("time is up");
                session.finish();
                self.show_hint = false;
                self.notice = Some(Notice::TimeUp);
            }
        }
    }

    fn conclude_countdown(&mut self) {
        if let Some(countdown) = self.countdown.as_mut() {
            countdown.cancel();
        }
    }

    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.countdown.as_ref()
    }

    pub fn is_finished(&self) -> bool {
        self.session.as_ref().is_some_and(SessionState::is_finished)
    }

    pub fn hint_visible(&self) -> bool {
        self.show_hint
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice);
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}

fn session_moved(before: Option<usize>, session: Option<&SessionState>) -> bool {
    session.and_then(SessionState::current_index) != before
}
