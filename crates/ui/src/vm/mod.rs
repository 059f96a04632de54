mod card_vm;
mod quiz_vm;

use chrono::{DateTime, Utc};
use quiz_core::model::NoticeBoard;
use services::PresenterEvent;

pub use card_vm::{CardListItemVm, CardListVm, EMPTY_DECK_TEXT, map_card_list_items};
pub use quiz_vm::{
    CORRECT_TEXT, FeedbackVm, INCORRECT_TEXT, OptionMark, QuestionVm, QuizOptionVm, QuizVm,
    ResultsVm, option_label, progress_label,
};

/// Everything the views render, reduced from presenter events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub cards: CardListVm,
    pub quiz: QuizVm,
    pub notices: NoticeBoard,
}

impl UiState {
    pub fn apply(&mut self, event: &PresenterEvent, now: DateTime<Utc>) {
        if self.quiz.apply(event) {
            return;
        }
        match event {
            PresenterEvent::CardList(cards) => self.cards = CardListVm::from_cards(cards),
            PresenterEvent::CardListError(message) => {
                self.cards = CardListVm::Error(message.clone());
            }
            PresenterEvent::Message { text, severity } => {
                self.notices.push(text.clone(), *severity, now);
            }
            _ => {}
        }
    }
}
