use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::time::test_instant;
use remote::{InMemoryBackend, Remote};
use services::{AppServices, CardService, Clock, PresenterEvent, QuizController};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::context::{AppContext, UiApp, build_app_context};
use crate::presenter::channel;
use crate::views::{CardsView, NoticeStack, QuizView};
use crate::vm::UiState;

#[derive(Clone)]
struct TestApp {
    services: AppServices,
}

impl UiApp for TestApp {
    fn card_service(&self) -> Arc<CardService> {
        self.services.card_service()
    }

    fn quiz_controller(&self) -> QuizController {
        self.services.quiz_controller()
    }

    fn seed_samples_on_launch(&self) -> bool {
        false
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Cards,
    Quiz,
    Notices,
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    ctx: AppContext,
    state: UiState,
    view: ViewKind,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    use_context_provider(|| props.ctx.clone());
    use_context_provider(|| Signal::new(props.state.clone()));
    use_context_provider(|| props.view);
    rsx! { Router::<TestRoute> {} }
}

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum TestRoute {
    #[route("/")]
    Root {},
}

#[component]
fn Root() -> Element {
    let view = use_context::<ViewKind>();
    match view {
        ViewKind::Cards => rsx! { CardsView {} },
        ViewKind::Quiz => rsx! { QuizView {} },
        ViewKind::Notices => rsx! { NoticeStack {} },
    }
}

/// Services wired to a deterministic in-memory backend, plus the event
/// stream their presenter feeds.
pub struct TestServices {
    pub services: AppServices,
    pub events: UnboundedReceiver<PresenterEvent>,
}

impl TestServices {
    pub fn new() -> Self {
        let (presenter, events) = channel();
        let services = AppServices::from_remote(
            Remote::from_backend(InMemoryBackend::deterministic()),
            Arc::new(presenter),
            std::time::Duration::from_millis(10),
        );
        Self { services, events }
    }

    /// Fold everything emitted so far into `state`.
    pub fn drain_into(&mut self, state: &mut UiState) {
        while let Ok(event) = self.events.try_recv() {
            state.apply(&event, test_instant());
        }
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn setup_view_harness(view: ViewKind, services: AppServices, state: UiState) -> ViewHarness {
    let app: Arc<dyn UiApp> = Arc::new(TestApp { services });
    let (_, events) = channel();
    let ctx = build_app_context(&app, events).with_clock(Clock::pinned(test_instant()));

    let dom = VirtualDom::new_with_props(ViewRouterHarness, ViewHarnessProps { ctx, state, view });
    ViewHarness { dom }
}
