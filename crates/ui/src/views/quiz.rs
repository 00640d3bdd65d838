use dioxus::prelude::*;
use dioxus::core::Task;
use dioxus_router::Link;
use quiz_core::session::{TickOutcome, TimerEpoch};
use services::{CountdownTimer, TICK_PERIOD};

use crate::context::AppContext;
use crate::routes::Route;
use crate::vm::{ActiveQuizVm, QuizIntent, QuizScreenVm, ReadyVm, ResultVm, map_quiz_screen};

#[cfg(test)]
use quiz_core::session::QuizSession;
#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

#[component]
pub fn QuizView(enrollment: String) -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let thresholds = ctx.pass_thresholds();
    let identity = ctx.resolve_identity(&enrollment);
    let dashboard_enrollment = identity
        .as_ref()
        .map(|id| id.as_str().to_owned())
        .unwrap_or_default();

    let session = use_signal({
        let quiz_loop = quiz_loop.clone();
        move || quiz_loop.new_session()
    });
    // Scope-owned: the task and the CountdownTimer inside it drop with the view.
    let timer_task = use_signal(|| None::<Task>);

    let load = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |()| {
            let quiz_loop = quiz_loop.clone();
            let mut session = session;
            spawn(async move {
                let outcome = quiz_loop.fetch_pool().await;
                if let Err(err) = quiz_loop.apply_load(&mut session.write(), outcome) {
                    log::warn!("discarded question load: {err}");
                }
            });
        })
    };
    use_hook(move || load.call(()));

    let stop_timer = use_callback(move |()| {
        let mut timer_task = timer_task;
        if let Some(task) = timer_task.write().take() {
            task.cancel();
        }
    });

    let start_timer = {
        let quiz_loop = quiz_loop.clone();
        let identity = identity.clone();
        use_callback(move |epoch: TimerEpoch| {
            let quiz_loop = quiz_loop.clone();
            let identity = identity.clone();
            let mut session = session;
            let mut timer_task = timer_task;
            let task = spawn(async move {
                let (_timer, mut ticks) = CountdownTimer::start(epoch, TICK_PERIOD);
                while let Some(tick) = ticks.recv().await {
                    let outcome = quiz_loop.tick(&mut session.write(), tick, identity.as_ref());
                    if !matches!(outcome, TickOutcome::Running { .. }) {
                        break;
                    }
                }
            });
            if let Some(previous) = timer_task.write().replace(task) {
                previous.cancel();
            }
        })
    };

    let dispatch = {
        let quiz_loop = quiz_loop.clone();
        let identity = identity.clone();
        use_callback(move |intent: QuizIntent| {
            let mut session = session;
            let outcome = match intent {
                QuizIntent::Start => {
                    let started = session.write().start();
                    started.map(|epoch| start_timer.call(epoch))
                }
                QuizIntent::Select(option) => {
                    let index = session.read().current_index();
                    let selected = session.write().select_answer(index, option);
                    selected.map(|_| ())
                }
                QuizIntent::Next => session.write().go_next().map(|_| ()),
                QuizIntent::Prev => session.write().go_prev().map(|_| ()),
                QuizIntent::Jump(index) => session.write().jump_to(index),
                QuizIntent::Submit => {
                    stop_timer.call(());
                    quiz_loop
                        .submit(&mut session.write(), identity.as_ref())
                        .map(|_| ())
                }
                QuizIntent::Retry => {
                    let retried = session.write().retry();
                    if retried.is_ok() {
                        load.call(());
                    }
                    retried
                }
                QuizIntent::Reset => {
                    stop_timer.call(());
                    quiz_loop.reset(&mut session.write())
                }
            };
            if let Err(err) = outcome {
                log::debug!("ignored {intent:?}: {err}");
            }
        })
    };

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch, session);
            }
        }
    }

    let screen = map_quiz_screen(&session.read(), thresholds);

    rsx! {
        div { class: "page quiz-page",
            match screen {
                QuizScreenVm::Loading => rsx! {
                    div { class: "notice",
                        div { class: "spinner" }
                        p { "Loading questions..." }
                    }
                },
                QuizScreenVm::Error { message } => rsx! {
                    div { class: "notice notice--error",
                        h2 { "Error Loading Quiz" }
                        p { "{message}" }
                        button {
                            class: "btn btn-danger",
                            onclick: move |_| dispatch.call(QuizIntent::Retry),
                            "Retry"
                        }
                    }
                },
                QuizScreenVm::Ready(vm) => rsx! {
                    ReadyCard { vm, on_intent: dispatch }
                },
                QuizScreenVm::Active(vm) => rsx! {
                    ActiveQuiz { vm, on_intent: dispatch }
                },
                QuizScreenVm::Completed(vm) => rsx! {
                    ResultCard { vm, enrollment: dashboard_enrollment.clone(), on_intent: dispatch }
                },
            }
        }
    }
}

#[component]
fn ReadyCard(vm: ReadyVm, on_intent: Callback<QuizIntent>) -> Element {
    rsx! {
        div { class: "card ready-card",
            h1 { "Quiz Challenge" }
            ul { class: "ready-card__facts",
                li { "{vm.questions_label}" }
                li { "{vm.time_limit_label}" }
                li { "1 Mark per Question" }
            }
            if let Some(notice) = vm.empty_notice {
                p { class: "ready-card__empty", "{notice}" }
            }
            button {
                class: "btn btn-primary btn-block",
                disabled: !vm.can_start,
                onclick: move |_| {
                    if vm.can_start {
                        on_intent.call(QuizIntent::Start);
                    }
                },
                "Start Quiz"
            }
        }
    }
}

#[component]
fn ActiveQuiz(vm: ActiveQuizVm, on_intent: Callback<QuizIntent>) -> Element {
    let timer_class = if vm.low_time {
        "quiz-timer quiz-timer--low"
    } else {
        "quiz-timer"
    };
    let progress = format!("width: {:.1}%", vm.progress_percent);

    rsx! {
        header { class: "quiz-header",
            div { class: "quiz-header__title",
                h1 { "Quiz Challenge" }
                span { class: "quiz-position", "{vm.position_label}" }
            }
            div { class: "{timer_class}", role: "timer", "{vm.timer_label}" }
        }
        div { class: "progress",
            div { class: "progress__bar", style: "{progress}" }
        }

        div { class: "card question-card",
            h2 { class: "question-card__prompt", "{vm.prompt}" }
            div { class: "options",
                for option in vm.options.iter().cloned() {
                    button {
                        key: "{option.option}",
                        class: if option.selected { "option option--selected" } else { "option" },
                        onclick: move |_| on_intent.call(QuizIntent::Select(option.option)),
                        span { class: "option__letter", "{option.option}" }
                        span { class: "option__text", "{option.text}" }
                    }
                }
            }

            div { class: "quiz-nav",
                button {
                    class: "btn btn-secondary",
                    disabled: !vm.can_go_back,
                    onclick: move |_| on_intent.call(QuizIntent::Prev),
                    "Previous"
                }
                if vm.is_last {
                    button {
                        class: "btn btn-success",
                        onclick: move |_| on_intent.call(QuizIntent::Submit),
                        "Submit Quiz"
                    }
                } else {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| on_intent.call(QuizIntent::Next),
                        "Next"
                    }
                }
            }

            div { class: "status-grid",
                h3 { "Question Status:" }
                div { class: "status-grid__cells",
                    for cell in vm.statuses.iter().cloned() {
                        button {
                            key: "{cell.index}",
                            class: "{cell.class}",
                            onclick: move |_| on_intent.call(QuizIntent::Jump(cell.index)),
                            "{cell.label}"
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn ResultCard(vm: ResultVm, enrollment: String, on_intent: Callback<QuizIntent>) -> Element {
    rsx! {
        div { class: "card result-card",
            h1 { "Quiz Completed!" }
            if vm.time_expired {
                p { class: "result-card__note", "Time's up! Your answers were submitted automatically." }
            }
            div { class: "result-card__score", "{vm.score_label}" }
            div { class: "result-card__percent", "{vm.percent_label}" }
            span { class: "band {vm.band_class}", "{vm.band_label}" }

            ol { class: "review",
                for row in vm.review.iter().cloned() {
                    li {
                        class: if row.is_correct { "review-item review-item--right" } else { "review-item review-item--wrong" },
                        p { class: "review-item__heading", "{row.heading}" }
                        div { class: "review-item__options",
                            for option in row.options.iter().cloned() {
                                div { class: "{option.class}", "{option.option}. {option.text}" }
                            }
                        }
                        if let Some(label) = row.correct_label.clone() {
                            p { class: "review-item__correct", "{label}" }
                        }
                    }
                }
            }

            div { class: "result-card__actions",
                button {
                    class: "btn btn-primary btn-block",
                    onclick: move |_| on_intent.call(QuizIntent::Reset),
                    "Take Another Quiz"
                }
                Link {
                    class: "btn btn-secondary btn-block",
                    to: Route::Dashboard { enrollment: enrollment.clone() },
                    "Back to Dashboard"
                }
            }
        }
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    session: Rc<RefCell<Option<Signal<QuizSession>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, session: Signal<QuizSession>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.session.borrow_mut() = Some(session);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn session(&self) -> Signal<QuizSession> {
        (*self.session.borrow()).expect("quiz session registered")
    }
}
