use itertools::Itertools;
use tracing::{debug, info};

use crate::bank::QuestionRecord;
use crate::error::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    InProgress(usize),
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    AlreadyAnswered,
    NotAChoice,
    Finished,
}

impl AnswerOutcome {
    pub fn was_recorded(&self) -> bool {
        matches!(self, AnswerOutcome::Correct | AnswerOutcome::Incorrect)
    }
}

/// Dashboard figures for the current position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStats {
    pub theme_label: String,
    pub remaining_in_theme: usize,
    pub remaining_total: usize,
    pub score: usize,
    pub errors: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalScore {
    pub score: usize,
    pub total: usize,
}

impl FinalScore {
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            (self.score as f64 / self.total as f64) * 100.0
        }
    }
}

/// Results for one contiguous run of a theme label
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResult {
    pub theme_label: String,
    pub correct: usize,
    pub answered: usize,
    pub total: usize,
}

/// One quiz run: a fixed question list walked one question at a time.
#[derive(Debug, Clone)]
pub struct SessionState {
    questions: Vec<QuestionRecord>,
    phase: Phase,
    score: usize,
    errors: usize,
}

impl SessionState {
    pub fn new(questions: Vec<QuestionRecord>) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        info!(questions = questions.len(), "session started");
        Ok(Self {
            questions,
            phase: Phase::InProgress(0),
            score: 0,
            errors: 0,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Finished
    }

    pub fn questions(&self) -> &[QuestionRecord] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn current_index(&self) -> Option<usize> {
        match self.phase {
            Phase::InProgress(index) => Some(index),
            Phase::Finished => None,
        }
    }

    pub fn current(&self) -> Option<&QuestionRecord> {
        self.current_index().map(|index| &self.questions[index])
    }

    pub fn is_last(&self) -> bool {
        self.current_index() == Some(self.questions.len() - 1)
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn stats(&self) -> SessionStats {
        let (theme_label, remaining_in_theme, remaining_total) = match self.phase {
            Phase::InProgress(index) => {
                let label = &self.questions[index].theme_label;
                let in_theme = self.questions[index..]
                    .iter()
                    .filter(|q| &q.theme_label == label)
                    .count();
                (label.clone(), in_theme, self.questions.len() - index)
            }
            Phase::Finished => {
                let label = self
                    .questions
                    .last()
                    .map(|q| q.theme_label.clone())
                    .unwrap_or_default();
                (label, 0, 0)
            }
        };

        SessionStats {
            theme_label,
            remaining_in_theme,
            remaining_total,
            score: self.score,
            errors: self.errors,
        }
    }

    /// Record `choice` for the current question. Only the first answer to a
    /// question counts; later calls leave everything unchanged.
    pub fn answer(&mut self, choice: &str) -> AnswerOutcome {
        let Phase::InProgress(index) = self.phase else {
            return AnswerOutcome::Finished;
        };
        let question = &mut self.questions[index];

        if question.user_answer.is_some() {
            return AnswerOutcome::AlreadyAnswered;
        }
        if !question.choices.iter().any(|c| c == choice) {
            return AnswerOutcome::NotAChoice;
        }

        question.user_answer = Some(choice.to_string());
        let outcome = if choice == question.correct_answer {
            self.score += 1;
            AnswerOutcome::Correct
        } else {
            self.errors += 1;
            AnswerOutcome::Incorrect
        };
        debug!(index, ?outcome, "answer recorded");
        outcome
    }

    pub fn answer_index(&mut self, choice_index: usize) -> AnswerOutcome {
        let choice = match self.current() {
            Some(question) => question.choices.get(choice_index).cloned(),
            None => return AnswerOutcome::Finished,
        };
        match choice {
            Some(choice) => self.answer(&choice),
            None => AnswerOutcome::NotAChoice,
        }
    }

    /// Move to the next question, or finish after the last one. Returns
    /// true when this call finished the session.
    pub fn advance(&mut self) -> bool {
        match self.phase {
            Phase::InProgress(index) if index + 1 < self.questions.len() => {
                self.phase = Phase::InProgress(index + 1);
                debug!(index = index + 1, "advanced");
                false
            }
            Phase::InProgress(_) => {
                self.finish();
                true
            }
            Phase::Finished => false,
        }
    }

    pub fn retreat(&mut self) {
        if let Phase::InProgress(index) = self.phase {
            if index > 0 {
                self.phase = Phase::InProgress(index - 1);
                debug!(index = index - 1, "went back");
            }
        }
    }

    /// Terminate regardless of position; trailing questions stay unanswered.
    pub fn finish(&mut self) {
        if self.phase != Phase::Finished {
            self.phase = Phase::Finished;
            info!(
                score = self.score,
                errors = self.errors,
                total = self.questions.len(),
                "session finished"
            );
        }
    }

    pub fn final_score(&self) -> Option<FinalScore> {
        self.is_finished().then_some(FinalScore {
            score: self.score,
            total: self.questions.len(),
        })
    }

    pub fn unanswered(&self) -> usize {
        self.questions.iter().filter(|q| !q.is_answered()).count()
    }

    /// Per-theme tallies, one row per contiguous run of the same label
    pub fn breakdown(&self) -> Vec<ThemeResult> {
        let runs = self.questions.iter().chunk_by(|q| q.theme_label.as_str());
        let rows: Vec<ThemeResult> = runs
            .into_iter()
            .map(|(label, group)| {
                let group: Vec<&QuestionRecord> = group.collect();
                ThemeResult {
                    theme_label: label.to_string(),
                    correct: group.iter().filter(|q| q.is_answered_correctly()).count(),
                    answered: group.iter().filter(|q| q.is_answered()).count(),
                    total: group.len(),
                }
            })
            .collect();
        rows
    }
}
