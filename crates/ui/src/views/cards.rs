use dioxus::prelude::*;
use quiz_core::model::CardId;

use crate::context::AppContext;
use crate::vm::{CardListItemVm, CardListVm, EMPTY_DECK_TEXT, UiState};

#[component]
pub fn CardsView() -> Element {
    let ctx = use_context::<AppContext>();
    let ui_state = use_context::<Signal<UiState>>();
    let mut question = use_signal(String::new);
    let mut answer = use_signal(String::new);
    let mut saving = use_signal(|| false);
    let confirming = use_signal(|| None::<CardId>);

    let cards = ui_state.read().cards.clone();
    let count = cards.len();

    rsx! {
        div { class: "page",
            section { class: "card-form",
                h2 { "Create a Flashcard" }
                label { r#for: "question", "Question" }
                input {
                    id: "question",
                    placeholder: "Enter your question",
                    value: "{question}",
                    oninput: move |evt| question.set(evt.value()),
                }
                label { r#for: "answer", "Answer" }
                input {
                    id: "answer",
                    placeholder: "Enter the answer",
                    value: "{answer}",
                    oninput: move |evt| answer.set(evt.value()),
                }
                button {
                    class: "btn btn-primary",
                    disabled: saving(),
                    onclick: move |_| {
                        let created = ctx.create_card(question(), answer());
                        saving.set(true);
                        spawn(async move {
                            if matches!(created.await, Ok(Ok(_))) {
                                question.set(String::new());
                                answer.set(String::new());
                            }
                            saving.set(false);
                        });
                    },
                    "Add Card"
                }
            }

            section { class: "card-list",
                h2 { "Your Flashcards ({count})" }
                match cards {
                    CardListVm::Loading => rsx! {
                        div { class: "loading", "Loading..." }
                    },
                    CardListVm::Error(message) => rsx! {
                        div { class: "loading", "{message}" }
                    },
                    CardListVm::Ready(items) => rsx! {
                        if items.is_empty() {
                            div { class: "loading", "{EMPTY_DECK_TEXT}" }
                        } else {
                            ul {
                                for item in items {
                                    CardRow { key: "{item.id}", item, confirming }
                                }
                            }
                        }
                    },
                }
            }
        }
    }
}

#[component]
fn CardRow(item: CardListItemVm, mut confirming: Signal<Option<CardId>>) -> Element {
    let ctx = use_context::<AppContext>();
    let id = item.id;
    let is_confirming = confirming() == Some(id);

    rsx! {
        li { class: "flashcard",
            div { class: "flashcard-question", title: "{item.question}", "{item.question_preview}" }
            div { class: "flashcard-answer", title: "{item.answer}", "{item.answer_preview}" }
            if is_confirming {
                div { class: "confirm",
                    span { "Are you sure you want to delete this card?" }
                    button {
                        class: "btn btn-danger",
                        onclick: move |_| {
                            confirming.set(None);
                            // Outcome is reported through the presenter.
                            drop(ctx.delete_card(id));
                        },
                        "Delete"
                    }
                    button {
                        class: "btn btn-secondary",
                        onclick: move |_| confirming.set(None),
                        "Cancel"
                    }
                }
            } else {
                button {
                    class: "btn btn-danger btn-small",
                    onclick: move |_| confirming.set(Some(id)),
                    "Delete"
                }
            }
        }
    }
}
