//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::QuizError;
use quiz_core::model::QuizPhase;
use remote::{HttpInitError, RemoteError};

/// Bad user input, caught before any request is sent.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("Please select an answer first.")]
    NoSelection,
    #[error("Please fill in both question and answer fields.")]
    IncompleteCard,
    #[error("\"{0}\" is not an option for this question.")]
    UnknownOption(String),
}

/// An action that is not valid for the controller's current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StateError {
    #[error("A quiz is already in progress.")]
    SessionActive,
    #[error("No quiz is in progress.")]
    NoSession,
    #[error("Please wait for the current request to finish.")]
    RequestPending,
    #[error("Cannot {action} while {phase}.")]
    WrongPhase {
        action: &'static str,
        phase: QuizPhase,
    },
    #[error("{0}")]
    Rejected(String),
}

/// A failed or unusable response from the card store or quiz service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ServiceError(#[from] RemoteError);

impl ServiceError {
    #[must_use]
    pub fn remote(&self) -> &RemoteError {
        &self.0
    }

    /// Text shown to the user for this failure.
    #[must_use]
    pub fn display_message(&self) -> String {
        format!("Error: {}", self.0)
    }
}

/// Errors emitted by `QuizController`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    State(#[from] StateError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ControllerError {
    /// Text shown to the user for this failure.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            ControllerError::Service(err) => err.display_message(),
            other => other.to_string(),
        }
    }
}

impl From<RemoteError> for ControllerError {
    fn from(err: RemoteError) -> Self {
        ControllerError::Service(ServiceError(err))
    }
}

impl From<QuizError> for ControllerError {
    fn from(err: QuizError) -> Self {
        let message = err.to_string();
        match err {
            QuizError::NoSelection => ValidationError::NoSelection.into(),
            QuizError::UnknownOption(option) => ValidationError::UnknownOption(option).into(),
            QuizError::WrongPhase { action, phase } => {
                StateError::WrongPhase { action, phase }.into()
            }
            QuizError::EmptyDeck => RemoteError::EmptyDeck.into(),
            QuizError::InconsistentProgress { .. } => RemoteError::Decode(message).into(),
            _ => StateError::Rejected(message).into(),
        }
    }
}

/// Errors emitted by `CardService`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CardServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl CardServiceError {
    /// Text shown to the user for this failure.
    #[must_use]
    pub fn display_message(&self) -> String {
        match self {
            CardServiceError::Service(err) => err.display_message(),
            CardServiceError::Validation(err) => err.to_string(),
        }
    }
}

impl From<RemoteError> for CardServiceError {
    fn from(err: RemoteError) -> Self {
        CardServiceError::Service(ServiceError(err))
    }
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Http(#[from] HttpInitError),
}
