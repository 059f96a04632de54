use dioxus::prelude::*;

use crate::vm::UiState;

#[component]
pub fn NoticeStack() -> Element {
    let mut ui_state = use_context::<Signal<UiState>>();
    let notices = ui_state.read().notices.active().to_vec();

    rsx! {
        div { class: "alerts",
            for notice in notices {
                div {
                    key: "{notice.id}",
                    class: "alert alert-{notice.severity.as_str()}",
                    role: "status",
                    span { "{notice.text}" }
                    button {
                        class: "alert-close",
                        title: "Dismiss",
                        onclick: move |_| {
                            ui_state.write().notices.dismiss(notice.id);
                        },
                        "×"
                    }
                }
            }
        }
    }
}
