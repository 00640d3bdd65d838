use dioxus::prelude::*;
use dioxus_router::Link;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{AttemptRowVm, DashboardVm, map_dashboard};

#[component]
pub fn DashboardView(enrollment: String) -> Element {
    let ctx = use_context::<AppContext>();
    let dashboard = ctx.dashboard();
    let thresholds = ctx.pass_thresholds();
    let identity = ctx.resolve_identity(&enrollment);

    let mut resource = use_resource(move || {
        let dashboard = dashboard.clone();
        let identity = identity.clone();
        async move {
            let data = dashboard
                .load(identity.as_ref())
                .await
                .map_err(|err| ViewError::from(&err))?;
            Ok(map_dashboard(&data, thresholds))
        }
    });

    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page dashboard-page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    div { class: "notice",
                        div { class: "spinner" }
                        p { "Loading your dashboard..." }
                    }
                },
                ViewState::Ready(vm) => rsx! {
                    DashboardBody { vm }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "notice",
                        p { "{err.message()}" }
                        if err == ViewError::Unknown {
                            button {
                                class: "btn btn-secondary",
                                onclick: move |_| resource.restart(),
                                "Retry"
                            }
                        }
                    }
                },
            }
        }
    }
}

#[component]
fn DashboardBody(vm: DashboardVm) -> Element {
    let mut show_history = use_signal(|| false);
    let toggle_label = if show_history() { "Hide" } else { "Show" };

    rsx! {
        header { class: "student-bar",
            div {
                h2 { class: "student-name", "{vm.student_name}" }
                p { class: "student-id", "ID: {vm.enrollment}" }
            }
            div { class: "student-bar__stats",
                span { "Quizzes: {vm.total_quizzes}" }
                span { "Avg: {vm.average_label}" }
            }
        }

        section { class: "welcome",
            h1 { "{vm.greeting}" }
            p { "Ready to test your knowledge today?" }
        }

        section { class: "stats-grid",
            StatCard { label: "Total Quizzes", value: vm.total_quizzes.to_string(), tone: "stat-total" }
            StatCard { label: "Average Score", value: vm.average_label.clone(), tone: "stat-average" }
            StatCard { label: "Best Score", value: vm.best_label.clone(), tone: "stat-best" }
        }

        div { class: "actions",
            Link {
                class: "btn btn-primary",
                to: Route::Quiz { enrollment: vm.enrollment.clone() },
                "Start New Quiz"
            }
            button {
                class: "btn btn-secondary",
                aria_expanded: "{show_history}",
                onclick: move |_| show_history.toggle(),
                "Quiz History"
                span { class: "toggle-hint", " ({toggle_label})" }
            }
        }

        if show_history() {
            section { class: "history",
                h2 { "Quiz History" }
                p { class: "history__subtitle", "Track your progress over time" }
                if vm.attempts.is_empty() {
                    div { class: "history__empty",
                        p { "No quizzes attempted yet." }
                        p { class: "muted", "Start your first quiz to see your progress here!" }
                    }
                } else {
                    ul { class: "history__list",
                        for row in vm.attempts.iter().cloned() {
                            AttemptRow { key: "{row.id}", row }
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn StatCard(label: &'static str, value: String, tone: &'static str) -> Element {
    rsx! {
        div { class: "stat-card {tone}",
            p { class: "stat-card__label", "{label}" }
            p { class: "stat-card__value", "{value}" }
        }
    }
}

#[component]
fn AttemptRow(row: AttemptRowVm) -> Element {
    rsx! {
        li { class: "attempt",
            div { class: "attempt__meta",
                p { class: "attempt__subject", "{row.subject}" }
                p { class: "attempt__when", "{row.date_str} · {row.time_str}" }
            }
            div { class: "attempt__score",
                p { class: "attempt__fraction", "{row.score_label}" }
                p { class: "attempt__percent", "{row.percent_label}" }
            }
            span { class: "attempt__badge {row.band_class}", "{row.badge_label}" }
        }
    }
}
