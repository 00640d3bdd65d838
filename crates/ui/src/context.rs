use std::sync::Arc;

use quiz_core::PassThresholds;
use quiz_core::model::EnrollmentNumber;
use services::{DashboardService, QuizLoopService};

pub trait UiApp: Send + Sync {
    /// Identity used when a route carries no `enrollment` query value.
    fn default_enrollment(&self) -> Option<EnrollmentNumber>;

    fn quiz_loop(&self) -> Arc<QuizLoopService>;
    fn dashboard(&self) -> Arc<DashboardService>;
}

#[derive(Clone)]
pub struct AppContext {
    default_enrollment: Option<EnrollmentNumber>,
    quiz_loop: Arc<QuizLoopService>,
    dashboard: Arc<DashboardService>,
}

impl AppContext {
    #[must_use]
    pub fn new(app: &Arc<dyn UiApp>) -> Self {
        Self {
            default_enrollment: app.default_enrollment(),
            quiz_loop: app.quiz_loop(),
            dashboard: app.dashboard(),
        }
    }

    /// The query value when present and non-blank, else the launch default.
    #[must_use]
    pub fn resolve_identity(&self, query: &str) -> Option<EnrollmentNumber> {
        EnrollmentNumber::from_query(Some(query)).or_else(|| self.default_enrollment.clone())
    }

    #[must_use]
    pub fn pass_thresholds(&self) -> PassThresholds {
        self.quiz_loop.config().pass_thresholds()
    }

    #[must_use]
    pub fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }
}

// This context is provided by the application composition root (e.g. `crates/app`).

/// Build an `AppContext` from a UI-facing app implementation.
#[must_use]
pub fn build_app_context(app: &Arc<dyn UiApp>) -> AppContext {
    AppContext::new(app)
}
