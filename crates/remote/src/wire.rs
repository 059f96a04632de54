//! JSON bodies exchanged with the flashcard quiz service.

use quiz_core::model::{
    AnswerOutcome, Advance, Card, CardId, Progress, QuizCard, QuizResults,
};
use serde::{Deserialize, Serialize};

use crate::api::{RemoteError, StartedQuiz};

/// `message` value the service sends with the last answer of a quiz.
pub const QUIZ_COMPLETED_MESSAGE: &str = "Quiz completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDto {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub options: Vec<String>,
}

impl CardDto {
    #[must_use]
    pub fn into_card(self) -> Card {
        Card {
            id: self.id,
            question: self.question,
            answer: self.answer,
        }
    }

    /// # Errors
    ///
    /// Returns `RemoteError::Decode` if the options break the quiz card rules.
    pub fn into_quiz_card(self) -> Result<QuizCard, RemoteError> {
        let id = self.id;
        let options = self.options.clone();
        QuizCard::new(self.into_card(), options)
            .map_err(|err| RemoteError::Decode(format!("card {id}: {err}")))
    }

    #[must_use]
    pub fn from_quiz_card(card: &QuizCard) -> Self {
        Self {
            id: card.id(),
            question: card.question().to_owned(),
            answer: card.answer().to_owned(),
            options: card.options().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardListResponse {
    pub cards: Vec<CardDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub card: CardDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartQuizResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub total_questions: u32,
    #[serde(default)]
    pub current_card: Option<CardDto>,
}

impl StartQuizResponse {
    /// # Errors
    ///
    /// Returns `RemoteError::EmptyDeck` for a zero-question quiz and
    /// `RemoteError::Decode` if the first card is missing or malformed.
    pub fn into_started(self) -> Result<StartedQuiz, RemoteError> {
        if self.total_questions == 0 {
            return Err(RemoteError::EmptyDeck);
        }
        let first_card = self
            .current_card
            .ok_or_else(|| RemoteError::Decode("quiz started without a card".into()))?
            .into_quiz_card()?;
        Ok(StartedQuiz {
            first_card,
            total_questions: self.total_questions,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAnswerRequest {
    pub selected_answer: String,
}

/// Flat answer payload: either the next question or the final tally.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SubmitAnswerResponse {
    pub was_correct: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_card: Option<CardDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_index: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_questions: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<u32>,
}

impl SubmitAnswerResponse {
    #[must_use]
    pub fn from_outcome(outcome: &AnswerOutcome) -> Self {
        match &outcome.advance {
            Advance::Next { card, progress } => Self {
                was_correct: outcome.was_correct,
                next_card: Some(CardDto::from_quiz_card(card)),
                current_index: Some(progress.index()),
                total_questions: Some(progress.total()),
                score: Some(progress.score()),
                ..Self::default()
            },
            Advance::Finished(results) => Self {
                was_correct: outcome.was_correct,
                message: Some(QUIZ_COMPLETED_MESSAGE.to_string()),
                total_questions: Some(results.total()),
                final_score: Some(results.final_score()),
                ..Self::default()
            },
        }
    }

    #[must_use]
    pub fn is_completion(&self) -> bool {
        self.message.as_deref() == Some(QUIZ_COMPLETED_MESSAGE)
    }

    /// # Errors
    ///
    /// Returns `RemoteError::Decode` if fields required by the payload kind are
    /// missing or the reported progress is inconsistent.
    pub fn into_outcome(self) -> Result<AnswerOutcome, RemoteError> {
        let was_correct = self.was_correct;
        let advance = if self.is_completion() {
            let final_score = require(self.final_score, "final_score")?;
            let total = require(self.total_questions, "total_questions")?;
            let results = QuizResults::new(final_score, total)
                .map_err(|err| RemoteError::Decode(err.to_string()))?;
            Advance::Finished(results)
        } else {
            let card = require(self.next_card, "next_card")?.into_quiz_card()?;
            let progress = Progress::new(
                require(self.current_index, "current_index")?,
                require(self.total_questions, "total_questions")?,
                require(self.score, "score")?,
            )
            .map_err(|err| RemoteError::Decode(err.to_string()))?;
            Advance::Next { card, progress }
        };

        Ok(AnswerOutcome {
            was_correct,
            advance,
        })
    }
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, RemoteError> {
    value.ok_or_else(|| RemoteError::Decode(format!("missing field `{field}`")))
}

/// Error body of a non-2xx response. `detail` is usually a string, but
/// request validation failures carry a structured list instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: serde_json::Value,
}

impl ErrorBody {
    #[must_use]
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: serde_json::Value::String(detail.into()),
        }
    }

    #[must_use]
    pub fn detail_text(&self) -> Option<&str> {
        self.detail.as_str()
    }
}
