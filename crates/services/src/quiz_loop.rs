use quiz_core::QuizConfig;
use quiz_core::model::{EnrollmentNumber, Question};
use quiz_core::session::{QuizResult, QuizSession, QuizSessionError, TickOutcome, TimerEpoch};

use crate::error::LoadError;
use crate::question_source::QuestionSource;
use crate::result_reporter::ResultReporter;

/// Drives a `QuizSession` through loading, completion and reporting.
///
/// The session itself stays with the caller; this service only supplies the
/// pool and hands finished results to the reporter.
#[derive(Clone)]
pub struct QuizLoopService {
    config: QuizConfig,
    source: QuestionSource,
    reporter: ResultReporter,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(config: QuizConfig, source: QuestionSource, reporter: ResultReporter) -> Self {
        Self {
            config,
            source,
            reporter,
        }
    }

    #[must_use]
    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    #[must_use]
    pub fn new_session(&self) -> QuizSession {
        QuizSession::new(&self.config)
    }

    /// Fetch the question pool.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` from the question source.
    pub async fn fetch_pool(&self) -> Result<Vec<Question>, LoadError> {
        self.source.load().await
    }

    /// Feed a fetch outcome into a `Loading` session.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` if the session is not loading.
    pub fn apply_load(
        &self,
        session: &mut QuizSession,
        outcome: Result<Vec<Question>, LoadError>,
    ) -> Result<(), QuizSessionError> {
        match outcome {
            Ok(pool) => session.on_loaded(pool, &mut rand::rng()),
            Err(err) => {
                log::error!("failed to load questions from {}: {err}", self.source.location());
                session.on_load_failed(err.to_string())
            }
        }
    }

    /// Fetch and apply in one step.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` if the session is not loading.
    pub async fn load(&self, session: &mut QuizSession) -> Result<(), QuizSessionError> {
        let outcome = self.fetch_pool().await;
        self.apply_load(session, outcome)
    }

    /// Submit on request and report in the background.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` if the session is not active.
    pub fn submit(
        &self,
        session: &mut QuizSession,
        identity: Option<&EnrollmentNumber>,
    ) -> Result<QuizResult, QuizSessionError> {
        let result = session.submit()?;
        self.report(identity, &result);
        Ok(result)
    }

    /// Deliver a countdown tick; an expiry is reported like a manual submit.
    pub fn tick(
        &self,
        session: &mut QuizSession,
        epoch: TimerEpoch,
        identity: Option<&EnrollmentNumber>,
    ) -> TickOutcome {
        let outcome = session.tick(epoch);
        if let TickOutcome::Expired(result) = &outcome {
            log::info!("time expired; submitting {} answers", result.answers().len());
            self.report(identity, result);
        }
        outcome
    }

    /// Redraw from the loaded pool.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` if the session is not completed.
    pub fn reset(&self, session: &mut QuizSession) -> Result<(), QuizSessionError> {
        session.reset(&mut rand::rng())
    }

    fn report(&self, identity: Option<&EnrollmentNumber>, result: &QuizResult) {
        // Fire-and-forget; the handle is dropped and the task runs to completion.
        let _ = self
            .reporter
            .report_in_background(identity.cloned(), result.clone());
    }

    #[must_use]
    pub fn reporter(&self) -> &ResultReporter {
        &self.reporter
    }
}
