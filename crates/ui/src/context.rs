use std::sync::{Arc, Mutex, PoisonError};

use quiz_core::Clock;
use quiz_core::model::{Card, CardId};
use services::{
    CardService, CardServiceError, ControllerError, PresenterEvent, QuizController, QuizIntent,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::JoinHandle;

pub trait UiApp: Send + Sync {
    fn card_service(&self) -> Arc<CardService>;
    fn quiz_controller(&self) -> QuizController;
    fn seed_samples_on_launch(&self) -> bool;
}

type EventSlot = Arc<Mutex<Option<UnboundedReceiver<PresenterEvent>>>>;

#[derive(Clone)]
pub struct AppContext {
    card_service: Arc<CardService>,
    quiz_controller: QuizController,
    seed_samples_on_launch: bool,
    clock: Clock,
    events: EventSlot,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>, events: UnboundedReceiver<PresenterEvent>) -> Self {
        Self {
            card_service: app.card_service(),
            quiz_controller: app.quiz_controller(),
            seed_samples_on_launch: app.seed_samples_on_launch(),
            clock: Clock::system(),
            events: Arc::new(Mutex::new(Some(events))),
        }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn card_service(&self) -> Arc<CardService> {
        Arc::clone(&self.card_service)
    }

    #[must_use]
    pub fn quiz_controller(&self) -> QuizController {
        self.quiz_controller.clone()
    }

    #[must_use]
    pub fn seed_samples_on_launch(&self) -> bool {
        self.seed_samples_on_launch
    }

    #[must_use]
    pub fn clock(&self) -> Clock {
        self.clock
    }

    /// Run a quiz intent on the runtime. The request completes even if the
    /// view that raised it unmounts; otherwise the service could act on a
    /// request whose reply the controller never sees.
    pub fn dispatch_quiz(&self, intent: QuizIntent) -> JoinHandle<Result<(), ControllerError>> {
        let controller = self.quiz_controller.clone();
        tokio::spawn(async move { controller.dispatch(intent).await })
    }

    pub fn create_card(
        &self,
        question: String,
        answer: String,
    ) -> JoinHandle<Result<Card, CardServiceError>> {
        let cards = self.card_service();
        tokio::spawn(async move { cards.create(&question, &answer).await })
    }

    pub fn delete_card(&self, id: CardId) -> JoinHandle<Result<(), CardServiceError>> {
        let cards = self.card_service();
        tokio::spawn(async move { cards.delete(id).await })
    }

    /// Hand out the presenter event stream. Only the first caller gets it.
    #[must_use]
    pub fn take_events(&self) -> Option<UnboundedReceiver<PresenterEvent>> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(
    app: &Arc<dyn UiApp>,
    events: UnboundedReceiver<PresenterEvent>,
) -> AppContext {
    AppContext::new(app, events)
}
