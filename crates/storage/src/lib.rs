//! Record store for students and quiz attempts.

pub mod repository;
pub mod rest;
pub mod sqlite;

pub use repository::{
    InMemoryRepository, QuizHistoryRepository, RecordStore, StorageError, StudentRepository,
};
