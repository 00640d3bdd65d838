use std::sync::Arc;

use quiz_core::QuizConfig;
use quiz_core::question_bank::ParseOptions;
use storage::repository::RecordStore;
use storage::rest::RestConfig;

use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::question_source::{QuestionLocation, QuestionSource};
use crate::quiz_loop::QuizLoopService;
use crate::result_reporter::ResultReporter;

/// Which record store backs the app.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Memory,
    Sqlite(String),
    Rest(RestConfig),
}

/// Assembles app-facing services around one shared record store.
#[derive(Clone)]
pub struct AppServices {
    config: QuizConfig,
    store: RecordStore,
    quiz_loop: Arc<QuizLoopService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Open the selected backend and build services on it.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the store cannot be opened.
    pub async fn connect(
        backend: StoreBackend,
        location: QuestionLocation,
        config: QuizConfig,
    ) -> Result<Self, AppServicesError> {
        let store = match backend {
            StoreBackend::Memory => RecordStore::in_memory(),
            StoreBackend::Sqlite(url) => RecordStore::sqlite(&url).await?,
            StoreBackend::Rest(rest) => RecordStore::rest(rest),
        };
        Ok(Self::with_store(store, location, config))
    }

    #[must_use]
    pub fn with_store(store: RecordStore, location: QuestionLocation, config: QuizConfig) -> Self {
        let source = QuestionSource::new(
            location,
            ParseOptions {
                fabricate_missing_answer: config.fabricate_missing_answer(),
            },
        );
        let reporter = ResultReporter::new(
            Arc::clone(&store.history),
            config.subject_id().clone(),
        );
        let quiz_loop = Arc::new(QuizLoopService::new(config.clone(), source, reporter));
        let dashboard = Arc::new(DashboardService::new(
            Arc::clone(&store.students),
            Arc::clone(&store.history),
        ));

        Self {
            config,
            store,
            quiz_loop,
            dashboard,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &RecordStore {
        &self.store
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
