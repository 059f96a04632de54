use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{AnswerOutcome, Card, CardDraft, CardId, QuizCard};
use thiserror::Error;

/// Errors surfaced by card store and quiz service adapters.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("{0}")]
    Validation(String),

    #[error("Card not found")]
    NotFound,

    #[error("No flashcards available")]
    EmptyDeck,

    #[error("No active quiz session")]
    NoActiveSession,

    #[error("Quiz already completed")]
    QuizCompleted,

    #[error("{message}")]
    Service { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// A freshly started quiz: the first question and the question count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartedQuiz {
    pub first_card: QuizCard,
    pub total_questions: u32,
}

/// Remote contract for the flashcard collection.
#[async_trait]
pub trait CardStore: Send + Sync {
    /// List all cards in service order.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the service cannot be reached or answers badly.
    async fn list_cards(&self) -> Result<Vec<Card>, RemoteError>;

    /// Create a card.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Validation` if either field is empty.
    async fn create_card(&self, draft: CardDraft) -> Result<Card, RemoteError>;

    /// Delete a card by id.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the id is unknown.
    async fn delete_card(&self, id: CardId) -> Result<(), RemoteError>;
}

/// Remote contract for running a quiz. The service owns ordering and scoring.
#[async_trait]
pub trait QuizService: Send + Sync {
    /// # Errors
    ///
    /// Returns `RemoteError::EmptyDeck` if there are no cards.
    async fn start_session(&self) -> Result<StartedQuiz, RemoteError>;

    /// # Errors
    ///
    /// Returns `RemoteError::NoActiveSession` outside a session and
    /// `RemoteError::QuizCompleted` once every question has been answered.
    async fn submit_answer(&self, selected_answer: &str) -> Result<AnswerOutcome, RemoteError>;

    /// # Errors
    ///
    /// Returns `RemoteError` if the notification cannot be delivered.
    async fn end_session(&self) -> Result<(), RemoteError>;
}

/// Both remote contracts behind trait objects, so backends can be swapped.
#[derive(Clone)]
pub struct Remote {
    pub cards: Arc<dyn CardStore>,
    pub quiz: Arc<dyn QuizService>,
}

impl Remote {
    #[must_use]
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: CardStore + QuizService + Clone + 'static,
    {
        let cards: Arc<dyn CardStore> = Arc::new(backend.clone());
        let quiz: Arc<dyn QuizService> = Arc::new(backend);
        Self { cards, quiz }
    }
}
