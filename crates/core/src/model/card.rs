use serde::{Deserialize, Serialize};

use crate::error::CardError;
use crate::model::ids::CardId;

/// Number of answer choices offered for each quiz question.
pub const OPTION_COUNT: usize = 4;

//
// ─── CARD TYPES ────────────────────────────────────────────────────────────────
//

/// User input for a new card, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDraft {
    pub question: String,
    pub answer: String,
}

impl CardDraft {
    #[must_use]
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Trim both sides and reject blanks.
    ///
    /// # Errors
    ///
    /// Returns `CardError::EmptyQuestion` or `CardError::EmptyAnswer`.
    pub fn validate(self) -> Result<ValidatedCard, CardError> {
        let question = self.question.trim();
        if question.is_empty() {
            return Err(CardError::EmptyQuestion);
        }
        let answer = self.answer.trim();
        if answer.is_empty() {
            return Err(CardError::EmptyAnswer);
        }

        Ok(ValidatedCard {
            question: question.to_owned(),
            answer: answer.to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedCard {
    question: String,
    answer: String,
}

impl ValidatedCard {
    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn assign_id(self, id: CardId) -> Card {
        Card {
            id,
            question: self.question,
            answer: self.answer,
        }
    }
}

/// A flashcard as the card store reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub question: String,
    pub answer: String,
}

//
// ─── QUIZ CARD ─────────────────────────────────────────────────────────────────
//

/// A card presented as a multiple-choice question.
///
/// Always carries exactly [`OPTION_COUNT`] distinct options, exactly one of
/// which is the card's answer. Option order is whatever the service chose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizCard {
    card: Card,
    options: Vec<String>,
}

impl QuizCard {
    /// # Errors
    ///
    /// Returns `CardError` if the option set is the wrong size, repeats an
    /// option, or does not include the answer.
    pub fn new(card: Card, options: Vec<String>) -> Result<Self, CardError> {
        if options.len() != OPTION_COUNT {
            return Err(CardError::OptionCount {
                expected: OPTION_COUNT,
                actual: options.len(),
            });
        }
        for (idx, option) in options.iter().enumerate() {
            if options[..idx].contains(option) {
                return Err(CardError::DuplicateOption(option.clone()));
            }
        }
        if !options.contains(&card.answer) {
            return Err(CardError::MissingAnswerOption);
        }

        Ok(Self { card, options })
    }

    #[must_use]
    pub fn card(&self) -> &Card {
        &self.card
    }

    #[must_use]
    pub fn id(&self) -> CardId {
        self.card.id
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.card.question
    }

    /// The correct answer, used only to mark the right option during a reveal.
    #[must_use]
    pub fn answer(&self) -> &str {
        &self.card.answer
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|candidate| candidate == option)
    }
}
