use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::QuestionNo;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("invalid answer option: {0:?}")]
    InvalidOption(String),

    #[error("question prompt must not be empty")]
    EmptyPrompt,
}

//
// ─── ANSWER OPTION ────────────────────────────────────────────────────────────
//

/// One of the four choices of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnswerOption {
    A,
    B,
    C,
    D,
}

impl AnswerOption {
    pub const ALL: [AnswerOption; 4] = [Self::A, Self::B, Self::C, Self::D];

    /// Parse a letter leniently: surrounding whitespace and case are ignored.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::InvalidOption` for anything other than A-D.
    pub fn parse_lenient(raw: &str) -> Result<Self, QuestionError> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            _ => Err(QuestionError::InvalidOption(raw.to_owned())),
        }
    }

    /// Uniformly random option.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }

    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
            Self::C => 2,
            Self::D => 3,
        }
    }
}

impl fmt::Display for AnswerOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

impl FromStr for AnswerOption {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_lenient(s)
    }
}

//
// ─── QUESTION ─────────────────────────────────────────────────────────────────
//

/// A multiple-choice question admitted from the question bank.
///
/// Field names on the wire follow the snapshot format already stored in
/// `quiz_history.quiz_data`, so older rows stay readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    #[serde(rename = "questionNo")]
    number: QuestionNo,
    #[serde(rename = "question")]
    prompt: String,
    #[serde(rename = "optionA")]
    option_a: String,
    #[serde(rename = "optionB")]
    option_b: String,
    #[serde(rename = "optionC")]
    option_c: String,
    #[serde(rename = "optionD")]
    option_d: String,
    #[serde(rename = "correctAnswer")]
    correct: AnswerOption,
}

impl Question {
    /// # Errors
    ///
    /// Returns `QuestionError::EmptyPrompt` if the prompt is blank.
    pub fn new(
        number: QuestionNo,
        prompt: impl Into<String>,
        options: [String; 4],
        correct: AnswerOption,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        let [option_a, option_b, option_c, option_d] = options;
        Ok(Self {
            number,
            prompt,
            option_a,
            option_b,
            option_c,
            option_d,
            correct,
        })
    }

    #[must_use]
    pub fn number(&self) -> &QuestionNo {
        &self.number
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn option_text(&self, option: AnswerOption) -> &str {
        match option {
            AnswerOption::A => &self.option_a,
            AnswerOption::B => &self.option_b,
            AnswerOption::C => &self.option_c,
            AnswerOption::D => &self.option_d,
        }
    }

    /// Options in display order, paired with their letter.
    pub fn options(&self) -> impl Iterator<Item = (AnswerOption, &str)> + '_ {
        AnswerOption::ALL
            .into_iter()
            .map(move |option| (option, self.option_text(option)))
    }

    #[must_use]
    pub fn correct(&self) -> AnswerOption {
        self.correct
    }

    #[must_use]
    pub fn is_correct(&self, selected: Option<AnswerOption>) -> bool {
        selected == Some(self.correct)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
