use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::answers::Answers;
use crate::model::ids::{AttemptId, EnrollmentNumber, SubjectId};
use crate::model::question::Question;
use crate::scoring::percent;

//
// ─── STUDENT ──────────────────────────────────────────────────────────────────
//

/// Student profile as kept by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub enrollment_number: EnrollmentNumber,
    pub name: String,
}

impl Student {
    #[must_use]
    pub fn new(enrollment_number: EnrollmentNumber, name: impl Into<String>) -> Self {
        Self {
            enrollment_number,
            name: name.into(),
        }
    }

    /// First word of the name, used for the dashboard greeting.
    #[must_use]
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or_default()
    }
}

//
// ─── SNAPSHOT ─────────────────────────────────────────────────────────────────
//

/// Full question set and answers of a finished quiz, stored as an opaque blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSnapshot {
    pub questions: Vec<Question>,
    #[serde(rename = "userAnswers")]
    pub user_answers: Answers,
}

impl QuizSnapshot {
    /// Encode as the `quiz_data` JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if encoding fails.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Decode a `quiz_data` JSON text.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the blob is not a snapshot.
    pub fn from_blob(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }
}

//
// ─── ATTEMPTS ─────────────────────────────────────────────────────────────────
//

/// Write shape of an attempt; the store assigns `id` and `attempted_at`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttempt {
    pub enrollment_number: EnrollmentNumber,
    pub subject_id: Option<SubjectId>,
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub quiz_data: Option<String>,
}

/// Persisted attempt as read back from `quiz_history`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    pub id: AttemptId,
    pub enrollment_number: EnrollmentNumber,
    pub subject_id: Option<SubjectId>,
    pub score: u32,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub quiz_data: Option<String>,
    pub attempted_at: DateTime<Utc>,
}

impl AttemptRecord {
    /// Materialize a stored attempt from its write shape.
    #[must_use]
    pub fn from_new(id: AttemptId, attempt: NewAttempt, attempted_at: DateTime<Utc>) -> Self {
        Self {
            id,
            enrollment_number: attempt.enrollment_number,
            subject_id: attempt.subject_id,
            score: attempt.score,
            total_questions: attempt.total_questions,
            correct_answers: attempt.correct_answers,
            quiz_data: attempt.quiz_data,
            attempted_at,
        }
    }

    /// Score as a percentage of the question count (0 when the count is 0).
    #[must_use]
    pub fn percent(&self) -> f64 {
        percent(self.score, self.total_questions)
    }

    /// Decode the stored snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error if the stored blob is malformed.
    pub fn snapshot(&self) -> Result<Option<QuizSnapshot>, serde_json::Error> {
        self.quiz_data
            .as_deref()
            .map(QuizSnapshot::from_blob)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::QuestionNo;
    use crate::model::question::AnswerOption;
    use crate::time::fixed_now;

    #[test]
    fn first_name_takes_leading_word() {
        let student = Student::new(EnrollmentNumber::new("E1").unwrap(), "Asha  Rao");
        assert_eq!(student.first_name(), "Asha");
        let blank = Student::new(EnrollmentNumber::new("E2").unwrap(), "");
        assert_eq!(blank.first_name(), "");
    }

    #[test]
    fn snapshot_blob_uses_user_answers_key() {
        let question = Question::new(
            QuestionNo::new("9").unwrap(),
            "Capital of France?",
            ["Paris".into(), "Rome".into(), "Oslo".into(), "Bern".into()],
            AnswerOption::A,
        )
        .unwrap();
        let snapshot = QuizSnapshot {
            questions: vec![question],
            user_answers: [(0, AnswerOption::A)].into_iter().collect(),
        };

        let blob = snapshot.to_blob().unwrap();
        assert!(blob.contains("\"userAnswers\":{\"0\":\"A\"}"), "{blob}");

        let record = AttemptRecord::from_new(
            AttemptId::new(1),
            NewAttempt {
                enrollment_number: EnrollmentNumber::new("E1").unwrap(),
                subject_id: None,
                score: 1,
                total_questions: 1,
                correct_answers: 1,
                quiz_data: Some(blob),
            },
            fixed_now(),
        );
        assert_eq!(record.snapshot().unwrap(), Some(snapshot));
        assert!((record.percent() - 100.0).abs() < f64::EPSILON);
    }
}
