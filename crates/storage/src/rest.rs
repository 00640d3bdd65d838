//! Hosted record store speaking PostgREST (the Supabase REST layer).
//!
//! Tables are addressed under `/rest/v1/<table>`; filters use `column=eq.value`
//! and writes ask for the stored row back with `Prefer: return=representation`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{
    AttemptId, AttemptRecord, EnrollmentNumber, NewAttempt, Student, SubjectId,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::repository::{QuizHistoryRepository, RecordStore, StorageError, StudentRepository};

const STUDENTS: &str = "students";
const QUIZ_HISTORY: &str = "quiz_history";
const KEY_PREFIX_LEN: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RestConfigError {
    #[error("record store URL is missing")]
    MissingUrl,

    #[error("record store key is missing")]
    MissingKey,

    #[error("invalid record store URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// Location and credentials of a hosted record store.
#[derive(Clone)]
pub struct RestConfig {
    base_url: String,
    api_key: String,
}

impl RestConfig {
    /// # Errors
    ///
    /// Returns `RestConfigError` if either value is blank or the URL is not http(s).
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, RestConfigError> {
        let base_url = base_url.trim().trim_end_matches('/');
        let api_key = api_key.trim();
        if base_url.is_empty() {
            return Err(RestConfigError::MissingUrl);
        }
        if api_key.is_empty() {
            return Err(RestConfigError::MissingKey);
        }
        let parsed = reqwest::Url::parse(base_url).map_err(|e| RestConfigError::InvalidUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(RestConfigError::InvalidUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }
        Ok(Self {
            base_url: base_url.to_owned(),
            api_key: api_key.to_owned(),
        })
    }

    /// Build from optional values, failing fast when either is absent.
    ///
    /// # Errors
    ///
    /// Returns `RestConfigError` as for [`RestConfig::new`].
    pub fn from_parts(url: Option<&str>, key: Option<&str>) -> Result<Self, RestConfigError> {
        let url = url.ok_or(RestConfigError::MissingUrl)?;
        let key = key.ok_or(RestConfigError::MissingKey)?;
        Self::new(url, key)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// First characters of the key, safe to log.
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        let end = self
            .api_key
            .char_indices()
            .nth(KEY_PREFIX_LEN)
            .map_or(self.api_key.len(), |(i, _)| i);
        &self.api_key[..end]
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }
}

impl std::fmt::Debug for RestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &format_args!("{}…", self.key_prefix()))
            .finish()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StudentRow {
    enrollment_number: String,
    name: String,
}

#[derive(Debug, Serialize)]
struct NewAttemptRow<'a> {
    enrollment_number: &'a str,
    subject_id: Option<&'a str>,
    score: u32,
    total_questions: u32,
    correct_answers: u32,
    quiz_data: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct AttemptRow {
    id: i64,
    enrollment_number: String,
    subject_id: Option<String>,
    score: u32,
    total_questions: u32,
    correct_answers: u32,
    quiz_data: Option<serde_json::Value>,
    attempted_at: DateTime<Utc>,
}

impl AttemptRow {
    fn into_record(self) -> Result<AttemptRecord, StorageError> {
        let ser = |e: quiz_core::model::EmptyIdError| StorageError::Serialization(e.to_string());
        // The column may be typed text or json; both come back as the blob text.
        let quiz_data = match self.quiz_data {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        };
        Ok(AttemptRecord {
            id: AttemptId::new(self.id),
            enrollment_number: EnrollmentNumber::new(self.enrollment_number).map_err(ser)?,
            subject_id: self.subject_id.map(SubjectId::new).transpose().map_err(ser)?,
            score: self.score,
            total_questions: self.total_questions,
            correct_answers: self.correct_answers,
            quiz_data,
            attempted_at: self.attempted_at,
        })
    }
}

/// Record store backed by a PostgREST endpoint.
#[derive(Clone, Debug)]
pub struct RestRepository {
    client: Client,
    config: RestConfig,
}

impl RestRepository {
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        log::info!(
            "record store: {} (key {}…)",
            config.base_url(),
            config.key_prefix()
        );
        Self {
            client: Client::new(),
            config,
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
    }

    fn student_request(&self, enrollment: &EnrollmentNumber) -> RequestBuilder {
        self.authorized(self.client.get(self.config.table_url(STUDENTS)).query(&[
            ("select", "*".to_owned()),
            ("enrollment_number", format!("eq.{}", enrollment.as_str())),
            ("limit", "1".to_owned()),
        ]))
    }

    fn upsert_student_request(&self, student: &Student) -> RequestBuilder {
        self.authorized(
            self.client
                .post(self.config.table_url(STUDENTS))
                .query(&[("on_conflict", "enrollment_number")])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(&[StudentRow {
                    enrollment_number: student.enrollment_number.as_str().to_owned(),
                    name: student.name.clone(),
                }]),
        )
    }

    fn append_attempt_request(&self, attempt: &NewAttempt) -> RequestBuilder {
        self.authorized(
            self.client
                .post(self.config.table_url(QUIZ_HISTORY))
                .header("Prefer", "return=representation")
                .json(&[NewAttemptRow {
                    enrollment_number: attempt.enrollment_number.as_str(),
                    subject_id: attempt.subject_id.as_ref().map(SubjectId::as_str),
                    score: attempt.score,
                    total_questions: attempt.total_questions,
                    correct_answers: attempt.correct_answers,
                    quiz_data: attempt.quiz_data.as_deref(),
                }]),
        )
    }

    fn list_attempts_request(&self, enrollment: &EnrollmentNumber) -> RequestBuilder {
        self.authorized(self.client.get(self.config.table_url(QUIZ_HISTORY)).query(&[
            ("select", "*".to_owned()),
            ("enrollment_number", format!("eq.{}", enrollment.as_str())),
            ("order", "attempted_at.desc,id.desc".to_owned()),
        ]))
    }

    async fn send(builder: RequestBuilder) -> Result<Response, StorageError> {
        let response = builder
            .send()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        log::warn!("record store returned {status}: {body}");
        Err(match status {
            StatusCode::CONFLICT => StorageError::Conflict,
            StatusCode::NOT_FOUND => StorageError::NotFound,
            _ => StorageError::Connection(format!("HTTP {status}")),
        })
    }

    async fn rows<T: for<'de> Deserialize<'de>>(response: Response) -> Result<Vec<T>, StorageError> {
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl StudentRepository for RestRepository {
    async fn get_student(&self, enrollment: &EnrollmentNumber) -> Result<Student, StorageError> {
        let response = Self::send(self.student_request(enrollment)).await?;
        let row = Self::rows::<StudentRow>(response)
            .await?
            .into_iter()
            .next()
            .ok_or(StorageError::NotFound)?;
        let enrollment_number = EnrollmentNumber::new(row.enrollment_number)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        Ok(Student::new(enrollment_number, row.name))
    }

    async fn upsert_student(&self, student: &Student) -> Result<(), StorageError> {
        Self::send(self.upsert_student_request(student)).await?;
        Ok(())
    }
}

#[async_trait]
impl QuizHistoryRepository for RestRepository {
    async fn append_attempt(&self, attempt: NewAttempt) -> Result<AttemptRecord, StorageError> {
        let response = Self::send(self.append_attempt_request(&attempt)).await?;
        Self::rows::<AttemptRow>(response)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| StorageError::Serialization("insert returned no row".into()))?
            .into_record()
    }

    async fn list_attempts(
        &self,
        enrollment: &EnrollmentNumber,
    ) -> Result<Vec<AttemptRecord>, StorageError> {
        let response = Self::send(self.list_attempts_request(enrollment)).await?;
        Self::rows::<AttemptRow>(response)
            .await?
            .into_iter()
            .map(AttemptRow::into_record)
            .collect()
    }
}

impl RecordStore {
    /// Build a `RecordStore` backed by a PostgREST endpoint.
    #[must_use]
    pub fn rest(config: RestConfig) -> Self {
        Self::from_repository(RestRepository::new(config))
    }
}
