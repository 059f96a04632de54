use std::sync::Arc;
use std::time::Duration;

use remote::{HttpConfig, Remote};

use crate::card_service::CardService;
use crate::error::AppServicesError;
use crate::presenter::Presenter;
use crate::quiz_controller::QuizController;

/// Assembles app-facing services over one remote backend and one presenter.
#[derive(Clone)]
pub struct AppServices {
    card_service: Arc<CardService>,
    quiz_controller: QuizController,
}

impl AppServices {
    /// Build services that talk to the quiz service over HTTP.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the HTTP client cannot be built.
    pub fn new_http(
        config: HttpConfig,
        presenter: Arc<dyn Presenter>,
        reveal_delay: Duration,
    ) -> Result<Self, AppServicesError> {
        let remote = Remote::http(config)?;
        Ok(Self::from_remote(remote, presenter, reveal_delay))
    }

    #[must_use]
    pub fn from_remote(
        remote: Remote,
        presenter: Arc<dyn Presenter>,
        reveal_delay: Duration,
    ) -> Self {
        let card_service = Arc::new(CardService::new(
            Arc::clone(&remote.cards),
            Arc::clone(&presenter),
        ));
        let quiz_controller =
            QuizController::new(Arc::clone(&remote.quiz), presenter).with_reveal_delay(reveal_delay);

        Self {
            card_service,
            quiz_controller,
        }
    }

    #[must_use]
    pub fn card_service(&self) -> Arc<CardService> {
        Arc::clone(&self.card_service)
    }

    #[must_use]
    pub fn quiz_controller(&self) -> QuizController {
        self.quiz_controller.clone()
    }
}
