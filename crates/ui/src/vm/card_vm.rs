use quiz_core::model::{Card, CardId};

pub const EMPTY_DECK_TEXT: &str = "No flashcards yet. Create your first one above!";

/// UI-ready summary of a card for list rendering.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardListItemVm {
    pub id: CardId,
    pub question: String,
    pub answer: String,
    pub question_preview: String,
    pub answer_preview: String,
}

/// What the card list area shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CardListVm {
    #[default]
    Loading,
    Ready(Vec<CardListItemVm>),
    Error(String),
}

impl CardListVm {
    #[must_use]
    pub fn from_cards(cards: &[Card]) -> Self {
        CardListVm::Ready(map_card_list_items(cards))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            CardListVm::Ready(items) => items.len(),
            CardListVm::Loading | CardListVm::Error(_) => 0,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Map domain cards into list-friendly view models.
#[must_use]
pub fn map_card_list_items(cards: &[Card]) -> Vec<CardListItemVm> {
    cards
        .iter()
        .map(|card| CardListItemVm {
            id: card.id,
            question: card.question.clone(),
            answer: card.answer.clone(),
            question_preview: truncate_preview(&card.question, 80),
            answer_preview: truncate_preview(&card.answer, 56),
        })
        .collect()
}

fn truncate_preview(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    let mut lines = trimmed.lines();
    let first_line = lines.next().unwrap_or("");
    let has_more_lines = lines.next().is_some();

    let mut out: String = first_line.chars().take(max_chars).collect();
    if has_more_lines || first_line.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}
