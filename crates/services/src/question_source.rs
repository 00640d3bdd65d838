use std::fmt;
use std::path::PathBuf;

use quiz_core::model::Question;
use quiz_core::question_bank::{ParseOptions, ParsedQuestionBank, parse_question_bank};
use reqwest::Client;

use crate::error::LoadError;

/// Default question bank location, relative to the working directory.
pub const DEFAULT_QUESTIONS_PATH: &str = "questions.csv";

/// Where the question bank is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionLocation {
    File(PathBuf),
    Url(String),
}

impl QuestionLocation {
    /// `http://` and `https://` values are URLs; anything else is a file path.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Self::Url(trimmed.to_owned())
        } else {
            Self::File(PathBuf::from(trimmed))
        }
    }
}

impl Default for QuestionLocation {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_QUESTIONS_PATH))
    }
}

impl fmt::Display for QuestionLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

/// Fetches and parses the question bank.
#[derive(Clone)]
pub struct QuestionSource {
    client: Client,
    location: QuestionLocation,
    options: ParseOptions,
}

impl QuestionSource {
    #[must_use]
    pub fn new(location: QuestionLocation, options: ParseOptions) -> Self {
        Self {
            client: Client::new(),
            location,
            options,
        }
    }

    #[must_use]
    pub fn location(&self) -> &QuestionLocation {
        &self.location
    }

    /// Load the full question pool.
    ///
    /// # Errors
    ///
    /// Returns `LoadError::Unreachable` if the bank cannot be fetched, or
    /// `LoadError::ParseFailure` if it cannot be parsed.
    pub async fn load(&self) -> Result<Vec<Question>, LoadError> {
        Ok(self.load_report().await?.questions)
    }

    /// Load and keep the parse counters.
    ///
    /// # Errors
    ///
    /// As for [`QuestionSource::load`].
    pub async fn load_report(&self) -> Result<ParsedQuestionBank, LoadError> {
        let bytes = self.fetch().await?;
        let parsed = parse_question_bank(&bytes, self.options, &mut rand::rng())?;

        if parsed.dropped_rows > 0 {
            log::warn!(
                "{}: dropped {} unusable rows",
                self.location,
                parsed.dropped_rows
            );
        }
        log::info!(
            "{}: loaded {} questions ({} with substituted answers)",
            self.location,
            parsed.questions.len(),
            parsed.fabricated_answers
        );
        Ok(parsed)
    }

    async fn fetch(&self) -> Result<Vec<u8>, LoadError> {
        match &self.location {
            QuestionLocation::File(path) => tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::Unreachable(format!("{}: {e}", path.display()))),
            QuestionLocation::Url(url) => {
                let response = self
                    .client
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| LoadError::Unreachable(e.to_string()))?;
                let status = response.status();
                if !status.is_success() {
                    return Err(LoadError::Unreachable(format!("{url}: HTTP {status}")));
                }
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::Unreachable(e.to_string()))?;
                Ok(body.to_vec())
            }
        }
    }
}
