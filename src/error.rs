//! Error types for every boundary of the quiz: bank loading, session
//! building, question generation and preferences.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading a question bank file.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BankError {
    #[error("question bank {path} could not be read")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("question bank is not valid JSON")]
    Parse(#[from] serde_json::Error),
    #[error("question bank has an unexpected layout: {0}")]
    Shape(String),
}

/// Errors raised by the external question generator.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GeneratorError {
    #[error("question generator returned an empty response")]
    EmptyResponse,
    #[error("question generator request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("question generator output is not a question list")]
    Payload(#[from] serde_json::Error),
}

/// Errors raised while assembling a session.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    #[error("situational questions need an API key")]
    MissingApiKey,
    #[error("no question generator is configured")]
    GeneratorUnavailable,
    #[error("the question generator produced no usable question")]
    NoSituationalQuestions,
    #[error("unknown theme {0}")]
    UnknownTheme(String),
    #[error("no question available for this quiz")]
    EmptySession,
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors raised by session state construction.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("a session needs at least one question")]
    Empty,
}

/// Errors raised while saving preferences.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

/// Top-level error for the binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Bank(#[from] BankError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
