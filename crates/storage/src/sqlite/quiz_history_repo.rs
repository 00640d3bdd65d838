use quiz_core::model::{AttemptId, AttemptRecord, EnrollmentNumber, NewAttempt};

use super::{
    SqliteRepository,
    mapping::{map_attempt_row, query_err},
};
use crate::repository::{QuizHistoryRepository, StorageError};

#[async_trait::async_trait]
impl QuizHistoryRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: NewAttempt) -> Result<AttemptRecord, StorageError> {
        let attempted_at = self.clock.now();
        let res = sqlx::query(
            r"
                INSERT INTO quiz_history (
                    enrollment_number, subject_id, score, total_questions,
                    correct_answers, quiz_data, attempted_at
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ",
        )
        .bind(attempt.enrollment_number.as_str())
        .bind(attempt.subject_id.as_ref().map(|s| s.as_str().to_owned()))
        .bind(i64::from(attempt.score))
        .bind(i64::from(attempt.total_questions))
        .bind(i64::from(attempt.correct_answers))
        .bind(attempt.quiz_data.as_deref())
        .bind(attempted_at)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;

        Ok(AttemptRecord::from_new(
            AttemptId::new(res.last_insert_rowid()),
            attempt,
            attempted_at,
        ))
    }

    async fn list_attempts(
        &self,
        enrollment: &EnrollmentNumber,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, enrollment_number, subject_id, score, total_questions,
                    correct_answers, quiz_data, attempted_at
                FROM quiz_history
                WHERE enrollment_number = ?1
                ORDER BY attempted_at DESC, id DESC
            ",
        )
        .bind(enrollment.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(query_err)?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}
