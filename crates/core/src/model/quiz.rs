use std::fmt;

use crate::error::QuizError;
use crate::model::card::QuizCard;
use crate::model::results::QuizResults;

//
// ─── PHASES ────────────────────────────────────────────────────────────────────
//

/// Position of a live session in the select → submit → reveal → advance cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    AwaitingSelection,
    AnswerSelected,
    Revealed,
    Completed,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QuizPhase::AwaitingSelection => "awaiting a selection",
            QuizPhase::AnswerSelected => "an answer is selected",
            QuizPhase::Revealed => "the answer is revealed",
            QuizPhase::Completed => "the quiz is completed",
        };
        f.write_str(label)
    }
}

//
// ─── SERVICE OUTCOMES ──────────────────────────────────────────────────────────
//

/// Position and score the service reports alongside a question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    index: u32,
    total: u32,
    score: u32,
}

impl Progress {
    /// `index` is 1-based.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InconsistentProgress` unless
    /// `score <= index <= total` and `index >= 1`.
    pub fn new(index: u32, total: u32, score: u32) -> Result<Self, QuizError> {
        if index == 0 || index > total || score > index {
            return Err(QuizError::InconsistentProgress {
                index,
                total,
                score,
            });
        }
        Ok(Self {
            index,
            total,
            score,
        })
    }

    #[must_use]
    pub fn index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }
}

/// What follows the question that was just answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    Next { card: QuizCard, progress: Progress },
    Finished(QuizResults),
}

/// The quiz service's verdict on a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub was_correct: bool,
    pub advance: Advance,
}

impl AnswerOutcome {
    /// Score after this answer, as reported by the service.
    #[must_use]
    pub fn score(&self) -> u32 {
        match &self.advance {
            Advance::Next { progress, .. } => progress.score(),
            Advance::Finished(results) => results.final_score(),
        }
    }
}

/// Result of the timed transition out of `Revealed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    NextQuestion,
    Completed(QuizResults),
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Client-side view of one quiz run.
///
/// Correctness and scoring always come from the service: the session only
/// records what it was told and refuses transitions that are invalid for the
/// current phase. Invariants held after every method:
/// `score <= current_index <= total_questions`, and a selected answer exists
/// exactly in `AnswerSelected` and `Revealed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    card: QuizCard,
    index: u32,
    total: u32,
    score: u32,
    phase: QuizPhase,
    selected: Option<String>,
    reveal: Option<AnswerOutcome>,
    results: Option<QuizResults>,
}

impl QuizSession {
    /// Open a session on the first card the service handed out.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::EmptyDeck` when the service reports zero questions.
    pub fn start(first: QuizCard, total_questions: u32) -> Result<Self, QuizError> {
        if total_questions == 0 {
            return Err(QuizError::EmptyDeck);
        }

        Ok(Self {
            card: first,
            index: 1,
            total: total_questions,
            score: 0,
            phase: QuizPhase::AwaitingSelection,
            selected: None,
            reveal: None,
            results: None,
        })
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn current_card(&self) -> &QuizCard {
        &self.card
    }

    #[must_use]
    pub fn current_index(&self) -> u32 {
        self.index
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn selected_answer(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Correctness of the answer being revealed, if any.
    #[must_use]
    pub fn last_answer_correct(&self) -> Option<bool> {
        self.reveal.as_ref().map(|outcome| outcome.was_correct)
    }

    #[must_use]
    pub fn results(&self) -> Option<&QuizResults> {
        self.results.as_ref()
    }

    /// Record a choice. Choosing again before submitting replaces the choice.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `AwaitingSelection`/`AnswerSelected`
    /// and `QuizError::UnknownOption` if `option` is not on the current card.
    pub fn select(&mut self, option: &str) -> Result<(), QuizError> {
        match self.phase {
            QuizPhase::AwaitingSelection | QuizPhase::AnswerSelected => {}
            phase => {
                return Err(QuizError::WrongPhase {
                    action: "select an answer",
                    phase,
                });
            }
        }
        if !self.card.has_option(option) {
            return Err(QuizError::UnknownOption(option.to_string()));
        }

        self.selected = Some(option.to_string());
        self.phase = QuizPhase::AnswerSelected;
        Ok(())
    }

    /// The answer to send, if the session is ready to submit.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` while awaiting a selection and
    /// `QuizError::WrongPhase` in `Revealed`/`Completed`.
    pub fn pending_answer(&self) -> Result<&str, QuizError> {
        match (self.phase, self.selected.as_deref()) {
            (QuizPhase::AnswerSelected, Some(answer)) => Ok(answer),
            (QuizPhase::AwaitingSelection | QuizPhase::AnswerSelected, _) => {
                Err(QuizError::NoSelection)
            }
            (phase, _) => Err(QuizError::WrongPhase {
                action: "submit an answer",
                phase,
            }),
        }
    }

    /// Apply the service's response to a submission and enter `Revealed`.
    ///
    /// The displayed score moves to the reported value now; the question
    /// index only moves when [`QuizSession::advance`] runs.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` unless an answer is selected, and
    /// `QuizError::InconsistentProgress` if the reported numbers cannot follow
    /// the current question.
    pub fn reveal(&mut self, outcome: AnswerOutcome) -> Result<(), QuizError> {
        if self.phase != QuizPhase::AnswerSelected {
            return Err(QuizError::WrongPhase {
                action: "reveal an answer",
                phase: self.phase,
            });
        }

        let score = outcome.score();
        let inconsistent = match &outcome.advance {
            Advance::Next { progress, .. } => progress.index() <= self.index,
            Advance::Finished(results) => results.total() < self.index,
        };
        if inconsistent || score > self.index {
            return Err(QuizError::InconsistentProgress {
                index: self.index,
                total: self.total,
                score,
            });
        }

        self.score = score;
        self.reveal = Some(outcome);
        self.phase = QuizPhase::Revealed;
        Ok(())
    }

    /// Leave `Revealed`: load the next question or finish the quiz.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::WrongPhase` outside `Revealed`.
    pub fn advance(&mut self) -> Result<Step, QuizError> {
        let Some(outcome) = self.reveal.take() else {
            return Err(QuizError::WrongPhase {
                action: "advance",
                phase: self.phase,
            });
        };

        self.selected = None;
        match outcome.advance {
            Advance::Next { card, progress } => {
                self.card = card;
                self.index = progress.index();
                self.total = progress.total();
                self.score = progress.score();
                self.phase = QuizPhase::AwaitingSelection;
                Ok(Step::NextQuestion)
            }
            Advance::Finished(results) => {
                self.total = results.total();
                self.score = results.final_score();
                self.results = Some(results);
                self.phase = QuizPhase::Completed;
                Ok(Step::Completed(results))
            }
        }
    }

    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        let selection_matches = match self.phase {
            QuizPhase::AnswerSelected | QuizPhase::Revealed => self
                .selected
                .as_deref()
                .is_some_and(|answer| !answer.is_empty()),
            QuizPhase::AwaitingSelection | QuizPhase::Completed => self.selected.is_none(),
        };
        self.score <= self.index && self.index <= self.total && selection_matches
    }
}
