use thiserror::Error;

use crate::model::QuizPhase;

/// Errors raised while building cards or quiz cards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardError {
    #[error("question cannot be empty")]
    EmptyQuestion,

    #[error("answer cannot be empty")]
    EmptyAnswer,

    #[error("expected {expected} options, got {actual}")]
    OptionCount { expected: usize, actual: usize },

    #[error("duplicate option: {0}")]
    DuplicateOption(String),

    #[error("options do not contain the correct answer")]
    MissingAnswerOption,
}

/// Errors raised by the quiz session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no cards available for a quiz")]
    EmptyDeck,

    #[error("cannot {action} while {phase}")]
    WrongPhase {
        action: &'static str,
        phase: QuizPhase,
    },

    #[error("no answer selected")]
    NoSelection,

    #[error("not an option for the current question: {0}")]
    UnknownOption(String),

    #[error("inconsistent progress: question {index} of {total} with score {score}")]
    InconsistentProgress { index: u32, total: u32, score: u32 },
}
