use quiz_core::model::{EnrollmentNumber, Student};

use super::{
    SqliteRepository,
    mapping::{map_student_row, query_err},
};
use crate::repository::{StorageError, StudentRepository};

#[async_trait::async_trait]
impl StudentRepository for SqliteRepository {
    async fn get_student(&self, enrollment: &EnrollmentNumber) -> Result<Student, StorageError> {
        let row = sqlx::query(
            r"
            SELECT enrollment_number, name
            FROM students
            WHERE enrollment_number = ?1
            ",
        )
        .bind(enrollment.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(query_err)?;

        match row {
            Some(row) => map_student_row(&row),
            None => Err(StorageError::NotFound),
        }
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO students (enrollment_number, name)
            VALUES (?1, ?2)
            ON CONFLICT(enrollment_number) DO UPDATE SET name = excluded.name
            ",
        )
        .bind(student.enrollment_number.as_str())
        .bind(&student.name)
        .execute(&self.pool)
        .await
        .map_err(query_err)?;
        Ok(())
    }
}
