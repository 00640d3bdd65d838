use dioxus::prelude::*;
use dioxus_router::{Outlet, Routable, use_navigator};

use crate::views::{DashboardView, QuizView};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[layout(Layout)]
        #[route("/?:enrollment", DashboardView)] Dashboard { enrollment: String },
        #[route("/quiz?:enrollment", QuizView)] Quiz { enrollment: String },
    #[end_layout]
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}

#[component]
fn Layout() -> Element {
    rsx! {
        main { class: "content",
            Outlet::<Route> {}
        }
    }
}

/// Unknown paths land on the dashboard.
#[component]
fn NotFound(segments: Vec<String>) -> Element {
    let navigator = use_navigator();
    use_effect(move || {
        let _ = navigator.replace(Route::Dashboard {
            enrollment: String::new(),
        });
    });
    rsx! {
        p { class: "redirect-note", "Redirecting..." }
    }
}
