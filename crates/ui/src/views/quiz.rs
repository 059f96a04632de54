use dioxus::prelude::*;
use services::QuizIntent;
use tracing::debug;

use crate::context::AppContext;
use crate::vm::{QuestionVm, QuizOptionVm, QuizVm, ResultsVm, UiState};

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui_state = use_context::<Signal<UiState>>();

    // Failures are already reported through the presenter.
    let dispatch = use_callback(move |intent: QuizIntent| {
        let request = ctx.dispatch_quiz(intent);
        spawn(async move {
            if let Ok(Err(err)) = request.await {
                debug!(error = %err, "quiz intent rejected");
            }
        });
    });

    let quiz = ui_state.read().quiz.clone();

    rsx! {
        section { class: "page quiz-section",
            h2 { "Quiz Mode" }
            match quiz {
                QuizVm::Idle => rsx! {
                    div { class: "quiz-controls",
                        p { "Test yourself on every card in your deck." }
                        button {
                            class: "btn btn-primary",
                            onclick: move |_| dispatch.call(QuizIntent::Start),
                            "Start Quiz"
                        }
                    }
                },
                QuizVm::Question(question) => rsx! {
                    QuestionPanel { question, dispatch }
                },
                QuizVm::Results(results) => rsx! {
                    ResultsPanel { results, dispatch }
                },
            }
        }
    }
}

#[component]
fn QuestionPanel(question: QuestionVm, dispatch: Callback<QuizIntent>) -> Element {
    let options = question.options();
    let feedback = question.feedback().cloned();
    let revealed = question.is_revealed();

    rsx! {
        div { class: "quiz-container",
            div { class: "score-display", "{question.progress_label()}" }
            div { class: "quiz-question", "{question.question}" }
            div { class: "quiz-options",
                for option in options {
                    OptionButton { key: "{option.label}", option, dispatch }
                }
            }
            if let Some(feedback) = feedback {
                div { class: feedback.class(), "{feedback.text()}" }
            }
            div { class: "quiz-actions",
                if !revealed {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| dispatch.call(QuizIntent::Submit),
                        "Submit Answer"
                    }
                }
                button {
                    class: "btn btn-secondary",
                    onclick: move |_| dispatch.call(QuizIntent::End),
                    "End Quiz"
                }
            }
        }
    }
}

#[component]
fn OptionButton(option: QuizOptionVm, dispatch: Callback<QuizIntent>) -> Element {
    let text = option.text.clone();

    rsx! {
        button {
            class: option.mark.class(),
            disabled: option.disabled,
            "data-option": "{option.text}",
            onclick: move |_| dispatch.call(QuizIntent::Select(text.clone())),
            span { class: "option-label", "{option.label}" }
            " {option.text}"
        }
    }
}

#[component]
fn ResultsPanel(results: ResultsVm, dispatch: Callback<QuizIntent>) -> Element {
    rsx! {
        div { class: "quiz-results",
            h3 { "Quiz Complete!" }
            div { class: "score-display", "Final score: {results.final_score} / {results.total}" }
            p { class: "results-summary", "{results.summary}" }
            button {
                class: "btn btn-primary",
                onclick: move |_| dispatch.call(QuizIntent::End),
                "End Quiz"
            }
        }
    }
}
