use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Rejected identifier text.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} must not be empty")]
pub struct EmptyIdError {
    kind: &'static str,
}

fn non_empty(kind: &'static str, raw: &str) -> Result<String, EmptyIdError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EmptyIdError { kind });
    }
    Ok(trimmed.to_owned())
}

/// Sequence number of a question as written in the question bank.
///
/// Kept as text: the source does not promise numbers, uniqueness or contiguity.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionNo(String);

impl QuestionNo {
    /// # Errors
    ///
    /// Returns `EmptyIdError` if the value is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyIdError> {
        non_empty("question number", raw.as_ref()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Student identity carried from the external login (CMS) into every screen.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnrollmentNumber(String);

impl EnrollmentNumber {
    /// # Errors
    ///
    /// Returns `EmptyIdError` if the value is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyIdError> {
        non_empty("enrollment number", raw.as_ref()).map(Self)
    }

    /// Read an identity from an optional query value; blank counts as absent.
    #[must_use]
    pub fn from_query(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::new(value).ok())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Subject an attempt belongs to.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Sentinel used when the caller does not name a subject.
    pub const DEFAULT: &'static str = "DEFAULT_SUBJECT";

    /// # Errors
    ///
    /// Returns `EmptyIdError` if the value is blank.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, EmptyIdError> {
        non_empty("subject id", raw.as_ref()).map(Self)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }
}

impl Default for SubjectId {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

/// Store-assigned identifier of a persisted attempt.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(i64);

impl AttemptId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

impl fmt::Debug for QuestionNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionNo({})", self.0)
    }
}

impl fmt::Debug for EnrollmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EnrollmentNumber({})", self.0)
    }
}

impl fmt::Debug for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SubjectId({})", self.0)
    }
}

impl fmt::Debug for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AttemptId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for QuestionNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for EnrollmentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── FromStr Implementations ───────────────────────────────────────────────────

impl FromStr for EnrollmentNumber {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl FromStr for SubjectId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enrollment_is_trimmed() {
        let id = EnrollmentNumber::new("  EN-042 ").unwrap();
        assert_eq!(id.as_str(), "EN-042");
        assert_eq!(id.to_string(), "EN-042");
    }

    #[test]
    fn blank_enrollment_is_rejected() {
        assert!(EnrollmentNumber::new("   ").is_err());
        assert!("".parse::<EnrollmentNumber>().is_err());
    }

    #[test]
    fn query_value_blank_means_absent() {
        assert_eq!(EnrollmentNumber::from_query(None), None);
        assert_eq!(EnrollmentNumber::from_query(Some("")), None);
        assert_eq!(
            EnrollmentNumber::from_query(Some("EN1")),
            Some(EnrollmentNumber::new("EN1").unwrap())
        );
    }

    #[test]
    fn subject_defaults_to_sentinel() {
        let subject = SubjectId::default();
        assert_eq!(subject.as_str(), "DEFAULT_SUBJECT");
        assert!(subject.is_default());
    }

    #[test]
    fn question_no_keeps_source_text() {
        let no = QuestionNo::new("07").unwrap();
        assert_eq!(no.as_str(), "07");
        assert!(QuestionNo::new("").is_err());
    }
}
