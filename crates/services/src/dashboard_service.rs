use std::sync::Arc;

use quiz_core::model::{AttemptRecord, EnrollmentNumber, Student};
use quiz_core::stats::{DashboardSummary, summarize};
use storage::repository::{QuizHistoryRepository, StorageError, StudentRepository};

use crate::error::DashboardError;

/// Everything the dashboard screen shows for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    pub student: Student,
    /// Newest first.
    pub attempts: Vec<AttemptRecord>,
    pub summary: DashboardSummary,
}

#[derive(Clone)]
pub struct DashboardService {
    students: Arc<dyn StudentRepository>,
    history: Arc<dyn QuizHistoryRepository>,
}

impl DashboardService {
    #[must_use]
    pub fn new(
        students: Arc<dyn StudentRepository>,
        history: Arc<dyn QuizHistoryRepository>,
    ) -> Self {
        Self { students, history }
    }

    /// Look up the student, then their history, then summarize it.
    ///
    /// # Errors
    ///
    /// Returns `DashboardError::MissingIdentity` without touching the store,
    /// `DashboardError::StudentNotFound` for an unknown identity, or
    /// `DashboardError::Storage` for other store failures. Every failure is logged.
    pub async fn load(
        &self,
        identity: Option<&EnrollmentNumber>,
    ) -> Result<DashboardData, DashboardError> {
        let outcome = self.try_load(identity).await;
        if let Err(err) = &outcome {
            log::warn!("dashboard unavailable: {err}");
        }
        outcome
    }

    async fn try_load(
        &self,
        identity: Option<&EnrollmentNumber>,
    ) -> Result<DashboardData, DashboardError> {
        let enrollment = identity.ok_or(DashboardError::MissingIdentity)?;
        let student = match self.students.get_student(enrollment).await {
            Ok(student) => student,
            Err(StorageError::NotFound) => {
                return Err(DashboardError::StudentNotFound(enrollment.clone()));
            }
            Err(err) => return Err(err.into()),
        };
        let attempts = self.history.list_attempts(enrollment).await?;
        let summary = summarize(&attempts);
        Ok(DashboardData {
            student,
            attempts,
            summary,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use quiz_core::model::NewAttempt;
    use storage::repository::InMemoryRepository;

    fn service(repo: &InMemoryRepository) -> DashboardService {
        DashboardService::new(Arc::new(repo.clone()), Arc::new(repo.clone()))
    }

    #[tokio::test]
    async fn missing_identity_is_an_error() {
        let err = service(&InMemoryRepository::new())
            .load(None)
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::MissingIdentity));
    }

    #[tokio::test]
    async fn unknown_student_is_not_found() {
        let enrollment = EnrollmentNumber::new("E404").unwrap();
        let err = service(&InMemoryRepository::new())
            .load(Some(&enrollment))
            .await
            .unwrap_err();
        assert!(matches!(err, DashboardError::StudentNotFound(e) if e == enrollment));
    }

    #[tokio::test]
    async fn new_student_has_empty_summary() {
        let repo = InMemoryRepository::new();
        let enrollment = EnrollmentNumber::new("E1").unwrap();
        repo.upsert_student(&Student::new(enrollment.clone(), "Asha Rao"))
            .await
            .unwrap();

        let data = service(&repo).load(Some(&enrollment)).await.unwrap();
        assert_eq!(data.student.first_name(), "Asha");
        assert!(data.attempts.is_empty());
        assert_eq!(data.summary, DashboardSummary::default());
    }

    #[tokio::test]
    async fn summarizes_history() {
        let repo = InMemoryRepository::new();
        let enrollment = EnrollmentNumber::new("E1").unwrap();
        repo.upsert_student(&Student::new(enrollment.clone(), "Asha"))
            .await
            .unwrap();
        for score in [10, 16] {
            repo.append_attempt(NewAttempt {
                enrollment_number: enrollment.clone(),
                subject_id: None,
                score,
                total_questions: 20,
                correct_answers: score,
                quiz_data: None,
            })
            .await
            .unwrap();
        }

        let data = service(&repo).load(Some(&enrollment)).await.unwrap();
        assert_eq!(data.summary.count, 2);
        assert!((data.summary.average_percent - 65.0).abs() < 1e-9);
        assert!((data.summary.best_percent - 80.0).abs() < 1e-9);
        assert_eq!(data.attempts[0].score, 16);
    }

    struct BrokenHistory;

    #[async_trait]
    impl QuizHistoryRepository for BrokenHistory {
        async fn append_attempt(
            &self,
            _attempt: NewAttempt,
        ) -> Result<AttemptRecord, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }

        async fn list_attempts(
            &self,
            _enrollment: &EnrollmentNumber,
        ) -> Result<Vec<AttemptRecord>, StorageError> {
            Err(StorageError::Connection("offline".into()))
        }
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_storage_error() {
        let repo = InMemoryRepository::new();
        let enrollment = EnrollmentNumber::new("E1").unwrap();
        repo.upsert_student(&Student::new(enrollment.clone(), "Asha"))
            .await
            .unwrap();
        let service = DashboardService::new(Arc::new(repo), Arc::new(BrokenHistory));

        let err = service.load(Some(&enrollment)).await.unwrap_err();
        assert!(matches!(err, DashboardError::Storage(StorageError::Connection(_))));
    }
}
