use std::sync::Arc;

use quiz_core::model::{AttemptId, EnrollmentNumber, NewAttempt, SubjectId};
use quiz_core::session::QuizResult;
use storage::repository::QuizHistoryRepository;
use tokio::task::JoinHandle;

use crate::error::ReportError;

/// Persists finished attempts to the record store.
#[derive(Clone)]
pub struct ResultReporter {
    history: Arc<dyn QuizHistoryRepository>,
    subject_id: SubjectId,
}

impl ResultReporter {
    #[must_use]
    pub fn new(history: Arc<dyn QuizHistoryRepository>, subject_id: SubjectId) -> Self {
        Self {
            history,
            subject_id,
        }
    }

    /// Build the write shape for `result`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Serialization` if the snapshot cannot be encoded.
    pub fn attempt_for(
        &self,
        enrollment: &EnrollmentNumber,
        result: &QuizResult,
    ) -> Result<NewAttempt, ReportError> {
        Ok(NewAttempt {
            enrollment_number: enrollment.clone(),
            subject_id: Some(self.subject_id.clone()),
            score: result.score(),
            total_questions: result.total(),
            correct_answers: result.score(),
            quiz_data: Some(result.snapshot().to_blob()?),
        })
    }

    /// Record one attempt.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::MissingIdentity` without touching the store when no
    /// identity is known, or the serialization/storage failure otherwise.
    pub async fn report(
        &self,
        identity: Option<&EnrollmentNumber>,
        result: &QuizResult,
    ) -> Result<AttemptId, ReportError> {
        let outcome = self.try_report(identity, result).await;
        match &outcome {
            Ok(id) => log::info!(
                "recorded attempt {id}: {}/{} ({:?})",
                result.score(),
                result.total(),
                result.trigger()
            ),
            Err(ReportError::MissingIdentity) => {
                log::warn!("quiz finished without a student identity; result not saved");
            }
            Err(err) => log::error!("failed to save quiz result: {err}"),
        }
        outcome
    }

    async fn try_report(
        &self,
        identity: Option<&EnrollmentNumber>,
        result: &QuizResult,
    ) -> Result<AttemptId, ReportError> {
        let enrollment = identity.ok_or(ReportError::MissingIdentity)?;
        let attempt = self.attempt_for(enrollment, result)?;
        let record = self.history.append_attempt(attempt).await?;
        Ok(record.id)
    }

    /// Fire-and-forget variant; failures are only logged.
    ///
    /// Must be called from within a tokio runtime.
    pub fn report_in_background(
        &self,
        identity: Option<EnrollmentNumber>,
        result: QuizResult,
    ) -> JoinHandle<Result<AttemptId, ReportError>> {
        let reporter = self.clone();
        tokio::spawn(async move { reporter.report(identity.as_ref(), &result).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::QuizConfig;
    use quiz_core::model::{AnswerOption, Question, QuestionNo, QuizSnapshot, Student};
    use quiz_core::session::QuizSession;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use storage::repository::{InMemoryRepository, StudentRepository};

    fn finished_result() -> QuizResult {
        let pool: Vec<_> = (1..=3)
            .map(|i| {
                Question::new(
                    QuestionNo::new(i.to_string()).unwrap(),
                    format!("Q{i}"),
                    ["a".into(), "b".into(), "c".into(), "d".into()],
                    AnswerOption::B,
                )
                .unwrap()
            })
            .collect();
        let mut session = QuizSession::new(&QuizConfig::default());
        session
            .on_loaded(pool, &mut StdRng::seed_from_u64(4))
            .unwrap();
        session.start().unwrap();
        session.select_answer(0, AnswerOption::B).unwrap();
        session.select_answer(2, AnswerOption::A).unwrap();
        session.submit().unwrap()
    }

    async fn repo_with_student() -> InMemoryRepository {
        let repo = InMemoryRepository::new();
        repo.upsert_student(&Student::new(EnrollmentNumber::new("E1").unwrap(), "Asha"))
            .await
            .unwrap();
        repo
    }

    #[tokio::test]
    async fn missing_identity_skips_the_store() {
        let repo = repo_with_student().await;
        let reporter = ResultReporter::new(Arc::new(repo.clone()), SubjectId::default());
        let result = finished_result();

        let err = reporter.report(None, &result).await.unwrap_err();
        assert!(matches!(err, ReportError::MissingIdentity));
        assert_eq!(result.score(), 1);
        let enrollment = EnrollmentNumber::new("E1").unwrap();
        assert!(repo.list_attempts(&enrollment).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn stores_counts_subject_and_snapshot() {
        let repo = repo_with_student().await;
        let reporter = ResultReporter::new(Arc::new(repo.clone()), SubjectId::default());
        let enrollment = EnrollmentNumber::new("E1").unwrap();
        let result = finished_result();

        let id = reporter.report(Some(&enrollment), &result).await.unwrap();

        let stored = repo.list_attempts(&enrollment).await.unwrap();
        assert_eq!(stored.len(), 1);
        let attempt = &stored[0];
        assert_eq!(attempt.id, id);
        assert_eq!(attempt.score, 1);
        assert_eq!(attempt.correct_answers, 1);
        assert_eq!(attempt.total_questions, 3);
        assert!(attempt.subject_id.as_ref().unwrap().is_default());

        let snapshot: QuizSnapshot = attempt.snapshot().unwrap().unwrap();
        assert_eq!(snapshot.questions, result.questions());
        assert_eq!(&snapshot.user_answers, result.answers());
    }

    #[tokio::test]
    async fn storage_failure_is_reported_not_panicked() {
        let repo = InMemoryRepository::new();
        let reporter = ResultReporter::new(Arc::new(repo), SubjectId::default());
        let enrollment = EnrollmentNumber::new("UNKNOWN").unwrap();

        let handle = reporter.report_in_background(Some(enrollment), finished_result());
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, ReportError::Storage(_)));
    }
}
