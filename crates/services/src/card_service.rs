use std::sync::Arc;

use quiz_core::model::{Card, CardDraft, CardId, Severity};
use remote::CardStore;
use tracing::{debug, info, warn};

use crate::error::{CardServiceError, ValidationError};
use crate::presenter::Presenter;

pub const CARD_CREATED_MESSAGE: &str = "Card created successfully!";
pub const CARD_DELETED_MESSAGE: &str = "Card deleted successfully!";
pub const CARD_LIST_ERROR_MESSAGE: &str = "Error loading cards. Please try again.";
pub const SAMPLES_ADDED_MESSAGE: &str = "Sample flashcards added to get you started!";

/// Cards created when a deck starts out empty.
pub const SAMPLE_CARDS: [(&str, &str); 3] = [
    ("What is the capital of France?", "Paris"),
    ("What is 2 + 2?", "4"),
    ("What is the largest planet in our solar system?", "Jupiter"),
];

/// Orchestrates card listing, creation and deletion against the card store.
#[derive(Clone)]
pub struct CardService {
    cards: Arc<dyn CardStore>,
    presenter: Arc<dyn Presenter>,
}

impl CardService {
    #[must_use]
    pub fn new(cards: Arc<dyn CardStore>, presenter: Arc<dyn Presenter>) -> Self {
        Self { cards, presenter }
    }

    /// Fetch the list and render it.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Service` if the list cannot be loaded; the
    /// list area shows the load error instead.
    pub async fn refresh(&self) -> Result<Vec<Card>, CardServiceError> {
        match self.cards.list_cards().await {
            Ok(cards) => {
                debug!(count = cards.len(), "card list loaded");
                self.presenter.render_card_list(&cards);
                Ok(cards)
            }
            Err(err) => {
                warn!(error = %err, "card list failed to load");
                let err = CardServiceError::from(err);
                self.presenter.render_card_list_error(CARD_LIST_ERROR_MESSAGE);
                self.presenter
                    .render_transient_message(&err.display_message(), Severity::Danger);
                Err(err)
            }
        }
    }

    /// Create a card from form input and refresh the list.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Validation` if either field is blank (no
    /// request is sent) and `CardServiceError::Service` if the store fails.
    pub async fn create(&self, question: &str, answer: &str) -> Result<Card, CardServiceError> {
        let Ok(validated) = CardDraft::new(question, answer).validate() else {
            return Err(self.report(ValidationError::IncompleteCard.into()));
        };
        let draft = CardDraft::new(validated.question(), validated.answer());

        let card = self
            .cards
            .create_card(draft)
            .await
            .map_err(|err| self.report(err.into()))?;

        info!(id = card.id.value(), "card created");
        self.presenter
            .render_transient_message(CARD_CREATED_MESSAGE, Severity::Success);
        if let Err(err) = self.refresh().await {
            debug!(error = %err, "list not refreshed after create");
        }
        Ok(card)
    }

    /// Delete a card and refresh the list. Callers confirm with the user first.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Service` if the store fails or the id is unknown.
    pub async fn delete(&self, id: CardId) -> Result<(), CardServiceError> {
        self.cards
            .delete_card(id)
            .await
            .map_err(|err| self.report(err.into()))?;

        info!(id = id.value(), "card deleted");
        self.presenter
            .render_transient_message(CARD_DELETED_MESSAGE, Severity::Success);
        if let Err(err) = self.refresh().await {
            debug!(error = %err, "list not refreshed after delete");
        }
        Ok(())
    }

    /// Create the sample cards if the deck is empty. Returns how many were added.
    ///
    /// # Errors
    ///
    /// Returns `CardServiceError::Service` if listing or creating fails.
    pub async fn seed_samples_if_empty(&self) -> Result<usize, CardServiceError> {
        let existing = self.cards.list_cards().await?;
        if !existing.is_empty() {
            debug!(count = existing.len(), "deck not empty, samples skipped");
            return Ok(0);
        }

        for (question, answer) in SAMPLE_CARDS {
            self.cards
                .create_card(CardDraft::new(question, answer))
                .await?;
        }
        info!(count = SAMPLE_CARDS.len(), "sample cards created");
        self.presenter
            .render_transient_message(SAMPLES_ADDED_MESSAGE, Severity::Info);
        Ok(SAMPLE_CARDS.len())
    }

    fn report(&self, err: CardServiceError) -> CardServiceError {
        warn!(error = %err, "card action failed");
        self.presenter
            .render_transient_message(&err.display_message(), Severity::Danger);
        err
    }
}
