use thiserror::Error;

use crate::model::SubjectId;

pub const DEFAULT_SESSION_DURATION_SECS: u32 = 30 * 60;
pub const DEFAULT_SAMPLE_SIZE: usize = 20;

#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("session duration must be positive")]
    ZeroDuration,

    #[error("sample size must be positive")]
    ZeroSampleSize,

    #[error("pass thresholds must satisfy 0 <= good <= excellent <= 100 (got {good}, {excellent})")]
    InvalidThresholds { good: f64, excellent: f64 },
}

/// Percentages separating the result bands. Display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassThresholds {
    good: f64,
    excellent: f64,
}

impl PassThresholds {
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidThresholds` unless `0 <= good <= excellent <= 100`.
    pub fn new(good: f64, excellent: f64) -> Result<Self, ConfigError> {
        let in_range = |v: f64| (0.0..=100.0).contains(&v);
        if !in_range(good) || !in_range(excellent) || good > excellent {
            return Err(ConfigError::InvalidThresholds { good, excellent });
        }
        Ok(Self { good, excellent })
    }

    #[must_use]
    pub fn good(&self) -> f64 {
        self.good
    }

    #[must_use]
    pub fn excellent(&self) -> f64 {
        self.excellent
    }
}

impl Default for PassThresholds {
    fn default() -> Self {
        Self {
            good: 50.0,
            excellent: 75.0,
        }
    }
}

/// Session options recognised by the quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizConfig {
    session_duration_secs: u32,
    sample_size: usize,
    pass_thresholds: PassThresholds,
    fabricate_missing_answer: bool,
    subject_id: SubjectId,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            session_duration_secs: DEFAULT_SESSION_DURATION_SECS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            pass_thresholds: PassThresholds::default(),
            fabricate_missing_answer: true,
            subject_id: SubjectId::default(),
        }
    }
}

impl QuizConfig {
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroDuration` for a zero duration.
    pub fn with_session_duration_secs(mut self, secs: u32) -> Result<Self, ConfigError> {
        if secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        self.session_duration_secs = secs;
        Ok(self)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::ZeroSampleSize` for a zero sample size.
    pub fn with_sample_size(mut self, size: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        self.sample_size = size;
        Ok(self)
    }

    #[must_use]
    pub fn with_pass_thresholds(mut self, thresholds: PassThresholds) -> Self {
        self.pass_thresholds = thresholds;
        self
    }

    /// Whether an empty correct-answer column gets a random letter (the
    /// question bank's historical behaviour) or fails the load.
    #[must_use]
    pub fn with_fabricate_missing_answer(mut self, fabricate: bool) -> Self {
        self.fabricate_missing_answer = fabricate;
        self
    }

    #[must_use]
    pub fn with_subject_id(mut self, subject_id: SubjectId) -> Self {
        self.subject_id = subject_id;
        self
    }

    #[must_use]
    pub fn session_duration_secs(&self) -> u32 {
        self.session_duration_secs
    }

    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    #[must_use]
    pub fn pass_thresholds(&self) -> PassThresholds {
        self.pass_thresholds
    }

    #[must_use]
    pub fn fabricate_missing_answer(&self) -> bool {
        self.fabricate_missing_answer
    }

    #[must_use]
    pub fn subject_id(&self) -> &SubjectId {
        &self.subject_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_quiz_rules() {
        let config = QuizConfig::default();
        assert_eq!(config.session_duration_secs(), 1800);
        assert_eq!(config.sample_size(), 20);
        assert!(config.fabricate_missing_answer());
        assert!(config.subject_id().is_default());
        assert!((config.pass_thresholds().good() - 50.0).abs() < f64::EPSILON);
        assert!((config.pass_thresholds().excellent() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_zero_values() {
        assert_eq!(
            QuizConfig::default().with_session_duration_secs(0),
            Err(ConfigError::ZeroDuration)
        );
        assert_eq!(
            QuizConfig::default().with_sample_size(0),
            Err(ConfigError::ZeroSampleSize)
        );
    }

    #[test]
    fn thresholds_must_be_ordered() {
        assert!(PassThresholds::new(80.0, 60.0).is_err());
        assert!(PassThresholds::new(-1.0, 60.0).is_err());
        assert!(PassThresholds::new(60.0, 80.0).is_ok());
    }
}
