use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use dioxus_router::{Routable, Router};
use quiz_core::QuizConfig;
use quiz_core::model::EnrollmentNumber;
use services::{AppServices, DashboardService, QuestionLocation, QuizLoopService};
use storage::repository::RecordStore;

use crate::context::{UiApp, build_app_context};
use crate::vm::QuizIntent;
use super::quiz::QuizTestHandles;
use super::{DashboardView, QuizView};

#[derive(Clone)]
struct TestApp {
    default_enrollment: Option<EnrollmentNumber>,
    services: AppServices,
}

impl UiApp for TestApp {
    fn default_enrollment(&self) -> Option<EnrollmentNumber> {
        self.default_enrollment.clone()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }
}

#[derive(Clone, PartialEq, Eq)]
pub enum ViewKind {
    Dashboard(String),
    Quiz(String),
}

#[derive(Props, Clone)]
struct ViewHarnessProps {
    app: Arc<TestApp>,
    view: ViewKind,
    quiz_handles: Option<QuizTestHandles>,
}

impl PartialEq for ViewHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for ViewHarnessProps {}

#[component]
fn ViewRouterHarness(props: ViewHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.view.clone());
    if let Some(handles) = props.quiz_handles.clone() {
        use_context_provider(|| handles);
    }
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
        ViewKind::Dashboard(enrollment) => rsx! { DashboardView { enrollment } },
        ViewKind::Quiz(enrollment) => rsx! { QuizView { enrollment } },
    }
}

pub struct ViewHarness {
    pub dom: VirtualDom,
    pub store: RecordStore,
    pub quiz_handles: Option<QuizTestHandles>,
}

impl ViewHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Let spawned loads and resources finish.
    pub async fn settle(&mut self) {
        for _ in 0..5 {
            self.drive_async().await;
        }
    }

    pub fn dispatch(&mut self, intent: QuizIntent) {
        let handles = self.quiz_handles.clone().expect("quiz view harness");
        self.dom.in_runtime(|| handles.dispatch().call(intent));
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

/// Write a bank of `rows` questions whose correct answer is always `A`.
pub fn temp_bank(name: &str, rows: usize) -> PathBuf {
    let path = std::env::temp_dir().join(format!("quiz-ui-{}-{name}.csv", std::process::id()));
    let mut file = std::fs::File::create(&path).expect("create bank");
    for i in 1..=rows {
        writeln!(file, "{i},Question {i}?,alpha,beta,gamma,delta,A").expect("write bank");
    }
    path
}

pub fn setup_view_harness(
    view: ViewKind,
    location: QuestionLocation,
    default_enrollment: Option<EnrollmentNumber>,
) -> ViewHarness {
    let store = RecordStore::in_memory();
    let services = AppServices::with_store(store.clone(), location, QuizConfig::default());
    let quiz_handles = match view {
        ViewKind::Quiz(_) => Some(QuizTestHandles::default()),
        ViewKind::Dashboard(_) => None,
    };
    let app = Arc::new(TestApp {
        default_enrollment,
        services,
    });

    let dom = VirtualDom::new_with_props(
        ViewRouterHarness,
        ViewHarnessProps {
            app,
            view,
            quiz_handles: quiz_handles.clone(),
        },
    );

    ViewHarness {
        dom,
        store,
        quiz_handles,
    }
}
