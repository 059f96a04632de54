use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::model::{
    Advance, AnswerOutcome, Card, CardDraft, CardId, Progress, QuizCard, QuizPhase, QuizResults,
    Severity,
};
use remote::{CardStore, InMemoryBackend, QuizService, RemoteError, StartedQuiz};
use services::{
    ControllerError, DEFAULT_REVEAL_DELAY, EventSink, PresenterEvent, QuizController, QuizIntent,
    RecordingPresenter, ServiceError, StateError, ValidationError,
};
use tokio::sync::Semaphore;

fn quiz_card(id: u64, question: &str, answer: &str, options: [&str; 4]) -> QuizCard {
    QuizCard::new(
        Card {
            id: CardId::new(id),
            question: question.to_string(),
            answer: answer.to_string(),
        },
        options.iter().map(ToString::to_string).collect(),
    )
    .unwrap()
}

fn two_plus_two() -> QuizCard {
    quiz_card(1, "2+2?", "4", ["3", "4", "5", "6"])
}

fn capital() -> QuizCard {
    quiz_card(2, "Capital of France?", "Paris", ["London", "Paris", "Berlin", "Madrid"])
}

fn next(card: QuizCard, index: u32, total: u32, score: u32, was_correct: bool) -> AnswerOutcome {
    AnswerOutcome {
        was_correct,
        advance: Advance::Next {
            card,
            progress: Progress::new(index, total, score).unwrap(),
        },
    }
}

fn finished(final_score: u32, total: u32, was_correct: bool) -> AnswerOutcome {
    AnswerOutcome {
        was_correct,
        advance: Advance::Finished(QuizResults::new(final_score, total).unwrap()),
    }
}

/// Quiz service that replays canned responses and records what it was sent.
#[derive(Default)]
struct ScriptedQuiz {
    starts: Mutex<VecDeque<Result<StartedQuiz, RemoteError>>>,
    answers: Mutex<VecDeque<Result<AnswerOutcome, RemoteError>>>,
    submitted: Mutex<Vec<String>>,
    ends: AtomicUsize,
    end_error: Mutex<Option<RemoteError>>,
    gate: Option<Arc<Semaphore>>,
}

impl ScriptedQuiz {
    fn new() -> Self {
        Self::default()
    }

    fn gated(gate: Arc<Semaphore>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::default()
        }
    }

    fn on_start(self, response: Result<StartedQuiz, RemoteError>) -> Self {
        self.starts.lock().unwrap().push_back(response);
        self
    }

    fn on_answer(self, response: Result<AnswerOutcome, RemoteError>) -> Self {
        self.answers.lock().unwrap().push_back(response);
        self
    }

    fn submitted(&self) -> Vec<String> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl QuizService for ScriptedQuiz {
    async fn start_session(&self) -> Result<StartedQuiz, RemoteError> {
        self.starts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RemoteError::EmptyDeck))
    }

    async fn submit_answer(&self, selected_answer: &str) -> Result<AnswerOutcome, RemoteError> {
        self.submitted
            .lock()
            .unwrap()
            .push(selected_answer.to_string());
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(RemoteError::NoActiveSession))
    }

    async fn end_session(&self) -> Result<(), RemoteError> {
        self.ends.fetch_add(1, Ordering::SeqCst);
        match self.end_error.lock().unwrap().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

fn started(first_card: QuizCard, total_questions: u32) -> Result<StartedQuiz, RemoteError> {
    Ok(StartedQuiz {
        first_card,
        total_questions,
    })
}

fn controller(quiz: Arc<ScriptedQuiz>) -> (QuizController, Arc<RecordingPresenter>) {
    let presenter = Arc::new(RecordingPresenter::new());
    let controller = QuizController::new(quiz, presenter.clone());
    (controller, presenter)
}

fn assert_invariants(controller: &QuizController) {
    if let Some(session) = controller.snapshot() {
        assert!(session.invariants_hold(), "invariants broken: {session:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn two_question_scenario_reveals_then_advances() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 2))
            .on_answer(Ok(next(capital(), 2, 2, 1, true)))
            .on_answer(Ok(finished(1, 2, false))),
    );
    let (controller, presenter) = controller(Arc::clone(&quiz));

    controller.start().await.unwrap();
    let session = controller.snapshot().unwrap();
    assert_eq!(session.phase(), QuizPhase::AwaitingSelection);
    assert_eq!((session.current_index(), session.score()), (1, 0));
    assert_invariants(&controller);

    controller.select("4").unwrap();
    assert_eq!(controller.phase(), Some(QuizPhase::AnswerSelected));

    controller.submit().await.unwrap();
    let session = controller.snapshot().unwrap();
    assert_eq!(session.phase(), QuizPhase::Revealed);
    assert_eq!(session.last_answer_correct(), Some(true));
    assert_eq!((session.current_index(), session.score()), (1, 1));
    assert_invariants(&controller);

    tokio::time::sleep(DEFAULT_REVEAL_DELAY - Duration::from_millis(1)).await;
    assert_eq!(controller.phase(), Some(QuizPhase::Revealed));

    tokio::time::sleep(Duration::from_millis(2)).await;
    let session = controller.snapshot().unwrap();
    assert_eq!(session.phase(), QuizPhase::AwaitingSelection);
    assert_eq!(session.current_index(), 2);
    assert_eq!(session.current_card().question(), "Capital of France?");
    assert_invariants(&controller);

    controller.select("Berlin").unwrap();
    controller.submit().await.unwrap();
    tokio::time::sleep(DEFAULT_REVEAL_DELAY + Duration::from_millis(1)).await;

    let session = controller.snapshot().unwrap();
    assert_eq!(session.phase(), QuizPhase::Completed);
    let results = *session.results().unwrap();
    assert_eq!(results.percentage(), 50);
    assert_eq!(quiz.submitted(), vec!["4", "Berlin"]);

    let events = presenter.events();
    assert!(events.contains(&PresenterEvent::Feedback {
        was_correct: false,
        correct_answer: "Paris".into(),
        selected_answer: "Berlin".into(),
        score: 1,
    }));
    assert_eq!(events.last(), Some(&PresenterEvent::Message {
        text: "Keep studying! Practice makes perfect!".into(),
        severity: Severity::Info,
    }));
}

#[tokio::test]
async fn selecting_twice_keeps_the_choice() {
    let quiz = Arc::new(ScriptedQuiz::new().on_start(started(two_plus_two(), 1)));
    let (controller, _) = controller(quiz);
    controller.start().await.unwrap();

    controller.select("5").unwrap();
    controller.select("5").unwrap();
    let session = controller.snapshot().unwrap();
    assert_eq!(session.phase(), QuizPhase::AnswerSelected);
    assert_eq!(session.selected_answer(), Some("5"));

    controller.select("4").unwrap();
    assert_eq!(controller.snapshot().unwrap().selected_answer(), Some("4"));
}

#[tokio::test]
async fn submit_without_selection_sends_nothing() {
    let quiz = Arc::new(ScriptedQuiz::new().on_start(started(two_plus_two(), 1)));
    let (controller, presenter) = controller(Arc::clone(&quiz));
    controller.start().await.unwrap();

    let err = controller.submit().await.unwrap_err();
    assert_eq!(err, ControllerError::Validation(ValidationError::NoSelection));
    assert!(quiz.submitted().is_empty());
    assert_eq!(controller.phase(), Some(QuizPhase::AwaitingSelection));
    assert_eq!(
        presenter.messages().last(),
        Some(&("Please select an answer first.".to_string(), Severity::Danger))
    );
}

#[tokio::test]
async fn submit_while_idle_is_a_state_error() {
    let quiz = Arc::new(ScriptedQuiz::new());
    let (controller, _) = controller(Arc::clone(&quiz));
    assert_eq!(
        controller.submit().await.unwrap_err(),
        ControllerError::State(StateError::NoSession)
    );
    assert!(quiz.submitted().is_empty());
}

#[tokio::test(start_paused = true)]
async fn submit_during_reveal_is_rejected() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 2))
            .on_answer(Ok(next(capital(), 2, 2, 1, true))),
    );
    let (controller, _) = controller(Arc::clone(&quiz));
    controller.start().await.unwrap();
    controller.select("4").unwrap();
    controller.submit().await.unwrap();

    let err = controller.submit().await.unwrap_err();
    assert!(matches!(err, ControllerError::State(StateError::WrongPhase { .. })));
    assert!(matches!(
        controller.select("3").unwrap_err(),
        ControllerError::State(StateError::WrongPhase { .. })
    ));
    assert_eq!(quiz.submitted().len(), 1);
}

#[tokio::test]
async fn second_submit_while_pending_is_rejected() {
    let gate = Arc::new(Semaphore::new(0));
    let quiz = Arc::new(
        ScriptedQuiz::gated(Arc::clone(&gate))
            .on_start(started(two_plus_two(), 2))
            .on_answer(Ok(next(capital(), 2, 2, 1, true))),
    );
    let (controller, _) = controller(Arc::clone(&quiz));
    controller.start().await.unwrap();
    controller.select("4").unwrap();

    let pending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.submit().await }
    });
    while !controller.is_busy() {
        tokio::task::yield_now().await;
    }

    assert_eq!(
        controller.submit().await.unwrap_err(),
        ControllerError::State(StateError::RequestPending)
    );
    assert_eq!(
        controller.end().await.unwrap_err(),
        ControllerError::State(StateError::RequestPending)
    );
    assert_eq!(controller.phase(), Some(QuizPhase::AnswerSelected));

    gate.add_permits(1);
    pending.await.unwrap().unwrap();
    assert_eq!(controller.phase(), Some(QuizPhase::Revealed));
    assert_eq!(quiz.submitted(), vec!["4"]);
    assert!(!controller.is_busy());
}

#[tokio::test(start_paused = true)]
async fn end_during_reveal_cancels_the_advance() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 2))
            .on_answer(Ok(next(capital(), 2, 2, 1, true))),
    );
    let (controller, presenter) = controller(Arc::clone(&quiz));
    controller.start().await.unwrap();
    controller.select("4").unwrap();
    controller.submit().await.unwrap();
    assert!(controller.has_pending_advance());

    controller.end().await.unwrap();
    assert!(!controller.has_pending_advance());
    assert_eq!(controller.phase(), None);

    presenter.take();
    tokio::time::sleep(DEFAULT_REVEAL_DELAY * 2).await;
    assert_eq!(controller.phase(), None);
    assert!(presenter.events().is_empty());
    assert_eq!(quiz.ends.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn end_failure_still_returns_to_idle() {
    let quiz = ScriptedQuiz::new().on_start(started(two_plus_two(), 1));
    *quiz.end_error.lock().unwrap() = Some(RemoteError::Transport("connection reset".into()));
    let (controller, presenter) = controller(Arc::new(quiz));
    controller.start().await.unwrap();

    let err = controller.end().await.unwrap_err();
    assert!(matches!(err, ControllerError::Service(_)));
    assert_eq!(controller.phase(), None);
    assert!(presenter.events().contains(&PresenterEvent::QuizClosed));
    assert_eq!(
        presenter.messages().last().map(|(text, _)| text.as_str()),
        Some("Error: request failed: connection reset")
    );

    controller.start().await.unwrap_err();
    assert_eq!(controller.phase(), None);
}

#[tokio::test]
async fn failed_start_leaves_no_session() {
    let quiz = Arc::new(ScriptedQuiz::new().on_start(Err(RemoteError::EmptyDeck)));
    let (controller, presenter) = controller(quiz);

    let err = controller.start().await.unwrap_err();
    assert_eq!(err, ControllerError::Service(ServiceError::from(RemoteError::EmptyDeck)));
    assert_eq!(controller.phase(), None);
    assert_eq!(
        presenter.messages(),
        vec![("Error: No flashcards available".to_string(), Severity::Danger)]
    );
}

#[tokio::test]
async fn zero_question_start_is_an_empty_deck() {
    let quiz = Arc::new(ScriptedQuiz::new().on_start(started(two_plus_two(), 0)));
    let (controller, _) = controller(quiz);
    let err = controller.start().await.unwrap_err();
    assert_eq!(err, ControllerError::Service(ServiceError::from(RemoteError::EmptyDeck)));
    assert_eq!(controller.phase(), None);
}

#[tokio::test]
async fn failed_submit_keeps_the_selection_for_retry() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 2))
            .on_answer(Err(RemoteError::Service {
                status: 500,
                message: "HTTP 500".into(),
            }))
            .on_answer(Ok(next(capital(), 2, 2, 1, true))),
    );
    let (controller, _) = controller(Arc::clone(&quiz));
    controller.start().await.unwrap();
    controller.select("4").unwrap();

    assert!(matches!(
        controller.submit().await.unwrap_err(),
        ControllerError::Service(_)
    ));
    assert_eq!(controller.phase(), Some(QuizPhase::AnswerSelected));

    controller.submit().await.unwrap();
    assert_eq!(controller.phase(), Some(QuizPhase::Revealed));
    assert_eq!(quiz.submitted(), vec!["4", "4"]);
}

#[tokio::test]
async fn inconsistent_progress_closes_the_quiz() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 3))
            // Reports question 1 again after answering question 1.
            .on_answer(Ok(next(capital(), 1, 3, 1, true))),
    );
    let (controller, presenter) = controller(quiz);
    controller.start().await.unwrap();
    controller.select("4").unwrap();

    assert!(matches!(
        controller.submit().await.unwrap_err(),
        ControllerError::Service(_)
    ));
    assert_eq!(controller.phase(), None);
    assert!(!controller.has_pending_advance());
    assert_eq!(presenter.events().iter().filter(|e| **e == PresenterEvent::QuizClosed).count(), 1);
}

#[tokio::test]
async fn unusable_answer_reply_closes_instead_of_retrying() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 2))
            // The service scored the answer and moved on, but its next card is malformed.
            .on_answer(Err(RemoteError::Decode(
                "card 2: duplicate option: Option A".into(),
            )))
            .on_answer(Ok(next(capital(), 2, 2, 1, true))),
    );
    let (controller, presenter) = controller(Arc::clone(&quiz));
    controller.start().await.unwrap();
    controller.select("4").unwrap();

    let err = controller.submit().await.unwrap_err();
    assert_eq!(
        err,
        ControllerError::Service(ServiceError::from(RemoteError::Decode(
            "card 2: duplicate option: Option A".into()
        )))
    );
    assert_eq!(controller.phase(), None);
    assert!(!controller.has_pending_advance());

    let events = presenter.events();
    assert!(events.contains(&PresenterEvent::QuizClosed));
    assert!(
        !events.iter().any(|e| matches!(e, PresenterEvent::Feedback { .. })),
        "no feedback for an unusable reply: {events:?}"
    );
    assert_eq!(
        presenter.messages().last(),
        Some(&(
            "Error: unexpected response: card 2: duplicate option: Option A".to_string(),
            Severity::Danger
        ))
    );

    // The stale answer is not sent a second time.
    assert_eq!(
        controller.submit().await.unwrap_err(),
        ControllerError::State(StateError::NoSession)
    );
    assert_eq!(quiz.submitted(), vec!["4"]);
}

/// Holds back the render of question `hold_at` until the test releases it.
struct HoldingPresenter {
    inner: RecordingPresenter,
    hold_at: u32,
    reached: Mutex<Option<std_mpsc::Sender<()>>>,
    release: Mutex<Option<std_mpsc::Receiver<()>>>,
}

impl EventSink for HoldingPresenter {
    fn emit(&self, event: PresenterEvent) {
        if matches!(&event, PresenterEvent::Question { index, .. } if *index == self.hold_at) {
            if let Some(reached) = self.reached.lock().unwrap().take() {
                reached.send(()).unwrap();
            }
            if let Some(release) = self.release.lock().unwrap().take() {
                let _ = release.recv_timeout(Duration::from_secs(5));
            }
        }
        self.inner.emit(event);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn end_racing_the_advance_leaves_the_quiz_closed() {
    let quiz = Arc::new(
        ScriptedQuiz::new()
            .on_start(started(two_plus_two(), 2))
            .on_answer(Ok(next(capital(), 2, 2, 1, true))),
    );
    let (reached_tx, reached_rx) = std_mpsc::channel();
    let (release_tx, release_rx) = std_mpsc::channel();
    let presenter = Arc::new(HoldingPresenter {
        inner: RecordingPresenter::new(),
        hold_at: 2,
        reached: Mutex::new(Some(reached_tx)),
        release: Mutex::new(Some(release_rx)),
    });
    let controller = QuizController::new(quiz, presenter.clone())
        .with_reveal_delay(Duration::from_millis(5));

    controller.start().await.unwrap();
    controller.select("4").unwrap();
    controller.submit().await.unwrap();

    // The advance is now rendering question 2 on a worker thread.
    reached_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    let ending = tokio::spawn({
        let controller = controller.clone();
        async move { controller.end().await }
    });
    std::thread::sleep(Duration::from_millis(50));
    release_tx.send(()).unwrap();
    ending.await.unwrap().unwrap();

    let quiz_events: Vec<_> = presenter
        .inner
        .events()
        .into_iter()
        .filter(|e| matches!(e, PresenterEvent::Question { .. } | PresenterEvent::QuizClosed))
        .collect();
    assert_eq!(quiz_events.last(), Some(&PresenterEvent::QuizClosed), "{quiz_events:?}");
    assert_eq!(controller.phase(), None);
}

#[tokio::test(start_paused = true)]
async fn three_question_run_completes_once_with_service_score() {
    let backend = InMemoryBackend::deterministic();
    for (question, answer) in [("Q1", "A1"), ("Q2", "A2"), ("Q3", "A3")] {
        backend
            .create_card(CardDraft::new(question, answer))
            .await
            .unwrap();
    }
    let presenter = Arc::new(RecordingPresenter::new());
    let controller = QuizController::new(Arc::new(backend), presenter.clone())
        .with_reveal_delay(Duration::from_millis(500));

    controller.dispatch(QuizIntent::Start).await.unwrap();
    for answer in ["A1", "Option A", "A3"] {
        controller
            .dispatch(QuizIntent::Select(answer.to_string()))
            .await
            .unwrap();
        controller.dispatch(QuizIntent::Submit).await.unwrap();
        assert_invariants(&controller);
        tokio::time::sleep(Duration::from_millis(501)).await;
        assert_invariants(&controller);
    }

    let results: Vec<QuizResults> = presenter
        .events()
        .into_iter()
        .filter_map(|event| match event {
            PresenterEvent::Results(results) => Some(results),
            _ => None,
        })
        .collect();
    assert_eq!(results, vec![QuizResults::new(2, 3).unwrap()]);
    assert_eq!(controller.phase(), Some(QuizPhase::Completed));

    controller.dispatch(QuizIntent::End).await.unwrap();
    assert_eq!(controller.phase(), None);
    assert_eq!(
        presenter.messages().last(),
        Some(&("Quiz session ended.".to_string(), Severity::Info))
    );
}
