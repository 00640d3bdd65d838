use quiz_core::model::{AttemptId, AttemptRecord, EnrollmentNumber, Student, SubjectId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

/// Foreign key violations mean the attempt names an unknown student.
pub(crate) fn query_err(e: sqlx::Error) -> StorageError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::Conflict,
        sqlx::Error::Database(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

fn count_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn map_student_row(row: &SqliteRow) -> Result<Student, StorageError> {
    let enrollment: String = row.try_get("enrollment_number").map_err(ser)?;
    Ok(Student::new(
        EnrollmentNumber::new(enrollment).map_err(ser)?,
        row.try_get::<String, _>("name").map_err(ser)?,
    ))
}

pub(crate) fn map_attempt_row(row: &SqliteRow) -> Result<AttemptRecord, StorageError> {
    let enrollment: String = row.try_get("enrollment_number").map_err(ser)?;
    let subject_id = row
        .try_get::<Option<String>, _>("subject_id")
        .map_err(ser)?
        .map(SubjectId::new)
        .transpose()
        .map_err(ser)?;

    Ok(AttemptRecord {
        id: AttemptId::new(row.try_get("id").map_err(ser)?),
        enrollment_number: EnrollmentNumber::new(enrollment).map_err(ser)?,
        subject_id,
        score: count_from_i64("score", row.try_get("score").map_err(ser)?)?,
        total_questions: count_from_i64(
            "total_questions",
            row.try_get("total_questions").map_err(ser)?,
        )?,
        correct_answers: count_from_i64(
            "correct_answers",
            row.try_get("correct_answers").map_err(ser)?,
        )?,
        quiz_data: row.try_get("quiz_data").map_err(ser)?,
        attempted_at: row.try_get("attempted_at").map_err(ser)?,
    })
}
