use chrono::Duration;
use quiz_core::model::{Card, CardId, QuizResults, Severity};
use quiz_core::time::test_instant;
use services::{PresenterEvent, QuizIntent};

use super::test_harness::{TestServices, ViewKind, setup_view_harness};
use crate::vm::{CardListVm, EMPTY_DECK_TEXT, UiState};

fn render(view: ViewKind, state: UiState) -> String {
    let fixture = TestServices::new();
    let mut harness = setup_view_harness(view, fixture.services, state);
    harness.rebuild();
    harness.render()
}

#[tokio::test(flavor = "current_thread")]
async fn cards_view_smoke_renders_empty_deck() {
    let state = UiState {
        cards: CardListVm::Ready(Vec::new()),
        ..UiState::default()
    };
    let html = render(ViewKind::Cards, state);
    assert!(html.contains(EMPTY_DECK_TEXT), "missing empty text in {html}");
    assert!(html.contains("Your Flashcards (0)"), "missing count in {html}");
    assert!(html.contains("Add Card"), "missing form in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn cards_view_smoke_renders_list_from_service() {
    let mut fixture = TestServices::new();
    let cards = fixture.services.card_service();
    cards.create("What is the capital of France?", "Paris").await.unwrap();
    cards.create("  2+2?  ", " 4 ").await.unwrap();

    let mut state = UiState::default();
    fixture.drain_into(&mut state);
    assert_eq!(state.cards.len(), 2);
    assert_eq!(state.notices.active()[0].severity, Severity::Success);

    let mut harness = setup_view_harness(ViewKind::Cards, fixture.services, state);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("What is the capital of France?"), "missing card in {html}");
    assert!(html.contains("2+2?"), "missing trimmed card in {html}");
    assert!(html.contains("Your Flashcards (2)"), "missing count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn cards_view_smoke_renders_list_error() {
    let mut state = UiState::default();
    state.apply(
        &PresenterEvent::CardListError("Error loading cards. Please try again.".into()),
        test_instant(),
    );
    let html = render(ViewKind::Cards, state);
    assert!(html.contains("Error loading cards. Please try again."), "missing error in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_idle_offers_start() {
    let html = render(ViewKind::Quiz, UiState::default());
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(!html.contains("End Quiz"), "unexpected end button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_question_from_controller() {
    let mut fixture = TestServices::new();
    fixture.services.card_service().create("2+2?", "4").await.unwrap();
    let controller = fixture.services.quiz_controller();
    controller.dispatch(QuizIntent::Start).await.unwrap();
    controller.dispatch(QuizIntent::Select("5".into())).await.unwrap();

    let mut state = UiState::default();
    fixture.drain_into(&mut state);

    let mut harness = setup_view_harness(ViewKind::Quiz, fixture.services, state);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Question 1 of 1 | Score: 0"), "missing progress in {html}");
    assert!(html.contains("2+2?"), "missing question in {html}");
    assert!(html.contains("A."), "missing option label in {html}");
    assert!(html.contains("btn-option selected"), "missing selection in {html}");
    assert!(html.contains("Submit Answer"), "missing submit in {html}");
    assert!(html.contains("End Quiz"), "missing end in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_reveal() {
    let mut fixture = TestServices::new();
    fixture.services.card_service().create("2+2?", "4").await.unwrap();
    let controller = fixture.services.quiz_controller();
    controller.dispatch(QuizIntent::Start).await.unwrap();
    controller.dispatch(QuizIntent::Select("4".into())).await.unwrap();
    controller.dispatch(QuizIntent::Submit).await.unwrap();

    let mut state = UiState::default();
    fixture.drain_into(&mut state);

    let mut harness = setup_view_harness(ViewKind::Quiz, fixture.services, state);
    harness.rebuild();
    let html = harness.render();
    assert!(html.contains("Correct!"), "missing feedback in {html}");
    assert!(html.contains("btn-option correct"), "missing correct mark in {html}");
    assert!(html.contains("Score: 1"), "missing score in {html}");
    assert!(!html.contains("Submit Answer"), "submit should hide during reveal in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_results() {
    let mut state = UiState::default();
    state.apply(
        &PresenterEvent::Results(QuizResults::new(2, 3).unwrap()),
        test_instant(),
    );
    let html = render(ViewKind::Quiz, state);
    assert!(html.contains("Quiz Complete!"), "missing heading in {html}");
    assert!(
        html.contains("You got 2 out of 3 questions correct (67%)"),
        "missing summary in {html}"
    );
    assert!(html.contains("Final score: 2 / 3"), "missing final score in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn notice_stack_smoke_renders_live_notices() {
    let now = test_instant();
    let mut state = UiState::default();
    state.notices.push("Card deleted successfully!", Severity::Success, now);
    state.notices.push("Error: Card not found", Severity::Danger, now);
    state.apply(
        &PresenterEvent::CardList(vec![Card {
            id: CardId::new(1),
            question: "Q".into(),
            answer: "A".into(),
        }]),
        now,
    );

    let html = render(ViewKind::Notices, state.clone());
    assert!(html.contains("alert alert-success"), "missing success alert in {html}");
    assert!(html.contains("alert alert-danger"), "missing danger alert in {html}");
    assert!(html.contains("Error: Card not found"), "missing text in {html}");

    state.notices.prune(now + Duration::seconds(3));
    let html = render(ViewKind::Notices, state);
    assert!(!html.contains("alert-success"), "expired notice still shown in {html}");
}
