//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::EnrollmentNumber;
use quiz_core::question_bank::ParseError;
use storage::repository::StorageError;
use storage::rest::RestConfigError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuestionSource`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("question bank unreachable: {0}")]
    Unreachable(String),
    #[error(transparent)]
    ParseFailure(#[from] ParseError),
}

/// Errors emitted by `ResultReporter`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReportError {
    #[error("no student identity; attempt not recorded")]
    MissingIdentity,
    #[error("could not encode quiz snapshot: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `DashboardService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DashboardError {
    #[error("no student identity")]
    MissingIdentity,
    #[error("student {0} not found")]
    StudentNotFound(EnrollmentNumber),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    RestConfig(#[from] RestConfigError),
}
