use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quiz_core::model::{AnswerOutcome, QuizPhase, QuizSession, Severity, Step};
use remote::{QuizService, RemoteError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{ControllerError, StateError};
use crate::presenter::Presenter;

/// Time an answer stays revealed before the quiz moves on.
pub const DEFAULT_REVEAL_DELAY: Duration = Duration::from_secs(2);

pub const QUIZ_STARTED_MESSAGE: &str = "Quiz started! Good luck!";
pub const QUIZ_ENDED_MESSAGE: &str = "Quiz session ended.";

/// User intents the quiz view can raise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    Select(String),
    Submit,
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Start,
    Submit,
    End,
}

/// Pending transition out of `Revealed`. Dropping it cancels the transition.
struct AdvanceTimer {
    handle: Option<JoinHandle<()>>,
    epoch: u64,
}

impl AdvanceTimer {
    /// Release the task handle without aborting; used by the firing task itself.
    fn detach(mut self) {
        self.handle.take();
    }
}

impl Drop for AdvanceTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[derive(Default)]
struct ControllerState {
    session: Option<QuizSession>,
    in_flight: Option<Request>,
    timer: Option<AdvanceTimer>,
    epoch: u64,
}

/// Renders that follow a state change are issued with `state` held, so the
/// view receives them in the order the changes happened.
struct Shared {
    state: Mutex<ControllerState>,
    quiz: Arc<dyn QuizService>,
    presenter: Arc<dyn Presenter>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fire_advance(&self, epoch: u64) {
        let mut guard = self.lock();
        let state = &mut *guard;
        if state.timer.as_ref().map(|timer| timer.epoch) != Some(epoch) {
            debug!(epoch, "stale advance timer ignored");
            return;
        }
        if let Some(timer) = state.timer.take() {
            timer.detach();
        }
        let Some(session) = state.session.as_mut() else {
            return;
        };

        match session.advance() {
            Ok(Step::NextQuestion) => {
                debug!(
                    index = session.current_index(),
                    total = session.total_questions(),
                    "next question"
                );
                render_question(self.presenter.as_ref(), session);
            }
            Ok(Step::Completed(results)) => {
                debug!(
                    score = results.final_score(),
                    total = results.total(),
                    "quiz completed"
                );
                let verdict = results.verdict();
                self.presenter.render_results(&results);
                self.presenter
                    .render_transient_message(verdict.message(), verdict.severity());
            }
            Err(err) => warn!(error = %err, "advance rejected"),
        }
    }
}

fn render_question(presenter: &dyn Presenter, session: &QuizSession) {
    presenter.render_quiz_question(
        session.current_card(),
        session.current_index(),
        session.total_questions(),
        session.score(),
    );
}

/// Marks a request as in flight until finished or dropped.
struct InFlight {
    shared: Arc<Shared>,
    finished: bool,
}

impl InFlight {
    fn finish(mut self, state: &mut ControllerState) {
        state.in_flight = None;
        self.finished = true;
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if !self.finished {
            self.shared.lock().in_flight = None;
        }
    }
}

/// Drives one quiz session against the quiz service.
///
/// The service decides correctness, ordering and scoring; the controller keeps
/// the local phase, rejects actions that do not fit it, allows one request at
/// a time, and owns the timer that leaves the reveal.
///
/// Presenters are called with the controller's lock held and must not call
/// back into it.
#[derive(Clone)]
pub struct QuizController {
    shared: Arc<Shared>,
    reveal_delay: Duration,
}

impl QuizController {
    #[must_use]
    pub fn new(quiz: Arc<dyn QuizService>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(ControllerState::default()),
                quiz,
                presenter,
            }),
            reveal_delay: DEFAULT_REVEAL_DELAY,
        }
    }

    #[must_use]
    pub fn with_reveal_delay(mut self, reveal_delay: Duration) -> Self {
        self.reveal_delay = reveal_delay;
        self
    }

    #[must_use]
    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    /// Copy of the live session, or `None` while idle.
    #[must_use]
    pub fn snapshot(&self) -> Option<QuizSession> {
        self.shared.lock().session.clone()
    }

    /// Phase of the live session; `None` means idle.
    #[must_use]
    pub fn phase(&self) -> Option<QuizPhase> {
        self.shared.lock().session.as_ref().map(QuizSession::phase)
    }

    /// True while a start, submit or end request is awaiting the service.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.shared.lock().in_flight.is_some()
    }

    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.shared.lock().timer.is_some()
    }

    /// Route a view intent to the matching operation.
    ///
    /// # Errors
    ///
    /// Returns whatever the routed operation returns.
    pub async fn dispatch(&self, intent: QuizIntent) -> Result<(), ControllerError> {
        match intent {
            QuizIntent::Start => self.start().await,
            QuizIntent::Select(option) => self.select(&option),
            QuizIntent::Submit => self.submit().await,
            QuizIntent::End => self.end().await,
        }
    }

    /// Ask the service for a new session and show its first question.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::State` if a session is live or a request is
    /// pending, and `ControllerError::Service` if the service fails; the
    /// controller stays idle in both cases.
    pub async fn start(&self) -> Result<(), ControllerError> {
        let (flight, ()) = self.admit(Request::Start, |state| {
            if state.session.is_some() {
                return Err(StateError::SessionActive.into());
            }
            Ok(())
        })?;

        let result = self.shared.quiz.start_session().await;
        let started = {
            let mut state = self.shared.lock();
            flight.finish(&mut state);
            let session = result.map_err(ControllerError::from).and_then(|started| {
                QuizSession::start(started.first_card, started.total_questions)
                    .map_err(ControllerError::from)
            });
            match session {
                Ok(session) => {
                    debug!(total = session.total_questions(), "quiz started");
                    let presenter = self.shared.presenter.as_ref();
                    render_question(presenter, &session);
                    presenter.render_transient_message(QUIZ_STARTED_MESSAGE, Severity::Success);
                    state.session = Some(session);
                    Ok(())
                }
                Err(err) => Err(err),
            }
        };

        started.map_err(|err| self.report(err))
    }

    /// Record a choice for the current question. No request is sent.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Validation` for an option not on the card and
    /// `ControllerError::State` outside the selection phases.
    pub fn select(&self, option: &str) -> Result<(), ControllerError> {
        let result = {
            let mut state = self.shared.lock();
            if state.in_flight.is_some() {
                Err(StateError::RequestPending.into())
            } else {
                match state.session.as_mut() {
                    None => Err(StateError::NoSession.into()),
                    Some(session) => match session.select(option) {
                        Ok(()) => {
                            self.shared.presenter.render_selection(option);
                            Ok(())
                        }
                        Err(err) => Err(err.into()),
                    },
                }
            }
        };

        result.map_err(|err| self.report(err))
    }

    /// Send the selected answer and reveal the service's verdict.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::Validation` without a selection,
    /// `ControllerError::State` outside `AnswerSelected` or while a request is
    /// pending, and `ControllerError::Service` if the service fails or answers
    /// inconsistently.
    ///
    /// A request that failed in transit or was refused by the service leaves
    /// the selection in place for a retry. A reply that arrives but cannot be
    /// used closes the quiz; the service has already scored the answer.
    pub async fn submit(&self) -> Result<(), ControllerError> {
        let (flight, answer) = self.admit(Request::Submit, |state| {
            let session = state.session.as_ref().ok_or(StateError::NoSession)?;
            Ok(session.pending_answer()?.to_string())
        })?;

        let result = self.shared.quiz.submit_answer(&answer).await;
        let revealed = {
            let mut guard = self.shared.lock();
            let state = &mut *guard;
            flight.finish(state);
            match result {
                Ok(outcome) => match self.apply_reveal(state, outcome) {
                    Ok(()) => Ok(()),
                    Err(err) => Err(self.abandon(state, err)),
                },
                Err(err @ RemoteError::Decode(_)) => Err(self.abandon(state, err.into())),
                Err(err) => Err(err.into()),
            }
        };

        revealed.map_err(|err| self.report(err))
    }

    /// Close the session locally, then tell the service.
    ///
    /// The controller is idle afterwards even if the notification fails.
    ///
    /// # Errors
    ///
    /// Returns `ControllerError::State` while another request is pending and
    /// `ControllerError::Service` if the notification fails.
    pub async fn end(&self) -> Result<(), ControllerError> {
        let (flight, had_session) = self.admit(Request::End, |state| {
            state.timer = None;
            state.epoch += 1;
            let had_session = state.session.take().is_some();
            self.shared.presenter.render_quiz_closed();
            Ok(had_session)
        })?;
        debug!(had_session, "quiz closed");

        let result = self.shared.quiz.end_session().await;
        flight.finish(&mut self.shared.lock());

        result.map_err(|err| self.report(err.into()))?;
        self.shared
            .presenter
            .render_transient_message(QUIZ_ENDED_MESSAGE, Severity::Info);
        Ok(())
    }

    fn admit<T>(
        &self,
        request: Request,
        check: impl FnOnce(&mut ControllerState) -> Result<T, ControllerError>,
    ) -> Result<(InFlight, T), ControllerError> {
        let admitted = {
            let mut guard = self.shared.lock();
            let state = &mut *guard;
            if state.in_flight.is_some() {
                Err(StateError::RequestPending.into())
            } else {
                check(state).inspect(|_| state.in_flight = Some(request))
            }
        };

        match admitted {
            Ok(value) => {
                debug!(?request, "request admitted");
                let flight = InFlight {
                    shared: Arc::clone(&self.shared),
                    finished: false,
                };
                Ok((flight, value))
            }
            Err(err) => Err(self.report(err)),
        }
    }

    fn apply_reveal(
        &self,
        state: &mut ControllerState,
        outcome: AnswerOutcome,
    ) -> Result<(), ControllerError> {
        let session = state.session.as_mut().ok_or(StateError::NoSession)?;
        let selected_answer = session.pending_answer()?.to_string();
        let was_correct = outcome.was_correct;
        session.reveal(outcome)?;

        debug!(was_correct, score = session.score(), "answer revealed");
        self.shared.presenter.render_feedback(
            was_correct,
            session.current_card().answer(),
            &selected_answer,
            session.score(),
        );

        state.epoch += 1;
        state.timer = Some(self.schedule_advance(state.epoch));
        Ok(())
    }

    /// Drop the session after the service moved on without a usable reply.
    fn abandon(&self, state: &mut ControllerState, err: ControllerError) -> ControllerError {
        state.timer = None;
        state.epoch += 1;
        if state.session.take().is_some() {
            warn!(error = %err, "quiz closed after an unusable answer reply");
            self.shared.presenter.render_quiz_closed();
        }
        err
    }

    fn schedule_advance(&self, epoch: u64) -> AdvanceTimer {
        let shared = Arc::downgrade(&self.shared);
        let delay = self.reveal_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(shared) = shared.upgrade() {
                shared.fire_advance(epoch);
            }
        });
        AdvanceTimer {
            handle: Some(handle),
            epoch,
        }
    }

    fn report(&self, err: ControllerError) -> ControllerError {
        warn!(error = %err, "quiz action failed");
        self.shared
            .presenter
            .render_transient_message(&err.display_message(), Severity::Danger);
        err
    }
}
