use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::{AttemptId, AttemptRecord, EnrollmentNumber, NewAttempt, Student};
use quiz_core::stats::newest_first;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Student profiles keyed by enrollment number.
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// Point lookup by identity.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such student exists, or other storage errors.
    async fn get_student(&self, enrollment: &EnrollmentNumber) -> Result<Student, StorageError>;

    /// Insert or replace a student profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the student cannot be stored.
    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError>;
}

/// Append-only log of quiz attempts.
#[async_trait]
pub trait QuizHistoryRepository: Send + Sync {
    /// Append an attempt; the store assigns `id` and `attempted_at`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if the student is unknown, or other storage errors.
    async fn append_attempt(&self, attempt: NewAttempt) -> Result<AttemptRecord, StorageError>;

    /// All attempts for one student, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if attempts cannot be read.
    async fn list_attempts(
        &self,
        enrollment: &EnrollmentNumber,
    ) -> Result<Vec<AttemptRecord>, StorageError>;
}

#[derive(Default)]
struct MemoryState {
    students: HashMap<EnrollmentNumber, Student>,
    attempts: Vec<AttemptRecord>,
    next_attempt_id: i64,
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
    clock: Clock,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp attempts with `clock` instead of the system time.
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }
}

#[async_trait]
impl StudentRepository for InMemoryRepository {
    async fn get_student(&self, enrollment: &EnrollmentNumber) -> Result<Student, StorageError> {
        let guard = self.lock()?;
        guard
            .students
            .get(enrollment)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        guard
            .students
            .insert(student.enrollment_number.clone(), student.clone());
        Ok(())
    }
}

#[async_trait]
impl QuizHistoryRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: NewAttempt) -> Result<AttemptRecord, StorageError> {
        let mut guard = self.lock()?;
        if !guard.students.contains_key(&attempt.enrollment_number) {
            return Err(StorageError::Conflict);
        }
        guard.next_attempt_id += 1;
        let record =
            AttemptRecord::from_new(AttemptId::new(guard.next_attempt_id), attempt, self.clock.now());
        guard.attempts.push(record.clone());
        Ok(record)
    }

    async fn list_attempts(
        &self,
        enrollment: &EnrollmentNumber,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let guard = self.lock()?;
        let mut found: Vec<_> = guard
            .attempts
            .iter()
            .filter(|a| &a.enrollment_number == enrollment)
            .cloned()
            .collect();
        newest_first(&mut found);
        Ok(found)
    }
}

/// Process-wide record store handle: repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct RecordStore {
    pub students: Arc<dyn StudentRepository>,
    pub history: Arc<dyn QuizHistoryRepository>,
}

impl RecordStore {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_repository(InMemoryRepository::new())
    }

    /// Use one repository value for both halves of the store.
    #[must_use]
    pub fn from_repository<R>(repo: R) -> Self
    where
        R: StudentRepository + QuizHistoryRepository + Clone + 'static,
    {
        let students: Arc<dyn StudentRepository> = Arc::new(repo.clone());
        let history: Arc<dyn QuizHistoryRepository> = Arc::new(repo);
        Self { students, history }
    }
}
