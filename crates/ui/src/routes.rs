use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable};

use crate::views::{CardsView, NoticeStack, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/", CardsView)] Cards {},
        #[route("/quiz", QuizView)] Quiz {},
}

#[component]
fn Layout() -> Element {
    rsx! {
        div { class: "app",
            Sidebar {}
            main { class: "content",
                NoticeStack {}
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Sidebar() -> Element {
    rsx! {
        nav { class: "sidebar",
            h1 { "Flashquiz" }
            ul {
                li { Link { to: Route::Cards {}, "Flashcards" } }
                li { Link { to: Route::Quiz {}, "Quiz" } }
            }
        }
    }
}
