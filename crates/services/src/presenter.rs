use std::sync::{Mutex, PoisonError};

use quiz_core::model::{Card, QuizCard, QuizResults, Severity};

/// Rendering surface driven by the card service and the quiz controller.
///
/// Implementations only read what they are handed; they never call back into
/// the controller from inside a render method.
pub trait Presenter: Send + Sync {
    fn render_card_list(&self, cards: &[Card]);

    fn render_card_list_error(&self, message: &str);

    fn render_quiz_question(&self, card: &QuizCard, index: u32, total: u32, score: u32);

    fn render_selection(&self, selected: &str);

    /// `score` is the value reported with the answer, shown until the next question.
    fn render_feedback(
        &self,
        was_correct: bool,
        correct_answer: &str,
        selected_answer: &str,
        score: u32,
    );

    fn render_results(&self, results: &QuizResults);

    fn render_transient_message(&self, text: &str, severity: Severity);

    /// The session is gone; show the idle quiz controls again.
    fn render_quiz_closed(&self);
}

/// Owned form of a single presenter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenterEvent {
    CardList(Vec<Card>),
    CardListError(String),
    Question {
        card: QuizCard,
        index: u32,
        total: u32,
        score: u32,
    },
    Selection(String),
    Feedback {
        was_correct: bool,
        correct_answer: String,
        selected_answer: String,
        score: u32,
    },
    Results(QuizResults),
    Message {
        text: String,
        severity: Severity,
    },
    QuizClosed,
}

/// Receives presenter calls as events. Every sink is a `Presenter`.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PresenterEvent);
}

impl<T: EventSink> Presenter for T {
    fn render_card_list(&self, cards: &[Card]) {
        self.emit(PresenterEvent::CardList(cards.to_vec()));
    }

    fn render_card_list_error(&self, message: &str) {
        self.emit(PresenterEvent::CardListError(message.to_string()));
    }

    fn render_quiz_question(&self, card: &QuizCard, index: u32, total: u32, score: u32) {
        self.emit(PresenterEvent::Question {
            card: card.clone(),
            index,
            total,
            score,
        });
    }

    fn render_selection(&self, selected: &str) {
        self.emit(PresenterEvent::Selection(selected.to_string()));
    }

    fn render_feedback(
        &self,
        was_correct: bool,
        correct_answer: &str,
        selected_answer: &str,
        score: u32,
    ) {
        self.emit(PresenterEvent::Feedback {
            was_correct,
            correct_answer: correct_answer.to_string(),
            selected_answer: selected_answer.to_string(),
            score,
        });
    }

    fn render_results(&self, results: &QuizResults) {
        self.emit(PresenterEvent::Results(*results));
    }

    fn render_transient_message(&self, text: &str, severity: Severity) {
        self.emit(PresenterEvent::Message {
            text: text.to_string(),
            severity,
        });
    }

    fn render_quiz_closed(&self) {
        self.emit(PresenterEvent::QuizClosed);
    }
}

/// Keeps every event in order; for tests and headless runs.
#[derive(Debug, Default)]
pub struct RecordingPresenter {
    events: Mutex<Vec<PresenterEvent>>,
}

impl RecordingPresenter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self) -> Vec<PresenterEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drain recorded events.
    pub fn take(&self) -> Vec<PresenterEvent> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Texts of the transient messages, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<(String, Severity)> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                PresenterEvent::Message { text, severity } => Some((text, severity)),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for RecordingPresenter {
    fn emit(&self, event: PresenterEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// Writes every event to the log; used by the terminal `seed` command.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPresenter;

impl EventSink for LogPresenter {
    fn emit(&self, event: PresenterEvent) {
        match event {
            PresenterEvent::Message { text, severity } => {
                tracing::info!(severity = severity.as_str(), "{text}");
            }
            PresenterEvent::CardList(cards) => {
                for card in &cards {
                    tracing::info!(id = card.id.value(), answer = %card.answer, "{}", card.question);
                }
            }
            PresenterEvent::CardListError(message) => tracing::warn!("{message}"),
            other => tracing::debug!(?other, "presenter event"),
        }
    }
}
