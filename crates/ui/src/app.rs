use std::time::Duration;

use dioxus::prelude::*;
use dioxus_router::Router;
use tracing::{debug, warn};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::UiState;

/// How often expired notices are swept.
const NOTICE_SWEEP: Duration = Duration::from_millis(250);

#[component]
pub fn App() -> Element {
    let ctx = use_context::<AppContext>();
    let ui_state = use_context_provider(|| Signal::new(UiState::default()));
    use_hook(|| start_background_work(&ctx, ui_state));

    rsx! {
        document::Stylesheet { href: asset!("/assets/style.css") }

        document::Title { "Flashquiz" }

        div { class: "app-root",
            ErrorBoundary {
                handle_error: |errors: ErrorContext| rsx! {
                    div { class: "fatal",
                        h1 { "Error initializing the app. Please refresh the page." }
                        pre { "{errors:?}" }
                    }
                },
                Router::<Route> {}
            }
        }
    }
}

fn start_background_work(ctx: &AppContext, mut ui_state: Signal<UiState>) {
    let clock = ctx.clock();

    // Presenter events are the only writer of quiz and card state.
    if let Some(mut events) = ctx.take_events() {
        spawn(async move {
            while let Some(event) = events.recv().await {
                ui_state.write().apply(&event, clock.now());
            }
        });
    }

    spawn(async move {
        loop {
            tokio::time::sleep(NOTICE_SWEEP).await;
            let now = clock.now();
            if ui_state.peek().notices.any_expired(now) {
                ui_state.write().notices.prune(now);
            }
        }
    });

    let cards = ctx.card_service();
    let seed = ctx.seed_samples_on_launch();
    spawn(async move {
        if seed {
            if let Err(err) = cards.seed_samples_if_empty().await {
                warn!(error = %err, "sample cards were not added");
            }
        }
        if let Err(err) = cards.refresh().await {
            debug!(error = %err, "initial card list not loaded");
        }
    });
}
