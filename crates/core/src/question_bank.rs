//! Question bank parsing.
//!
//! Rows are positional: `[id, prompt, optionA, optionB, optionC, optionD, correct]`,
//! no header, blank lines ignored. Rows without an id or prompt are dropped and
//! counted; the batch as a whole only fails on a malformed stream or, in strict
//! mode, on an empty correct-answer column.

use csv::{ReaderBuilder, StringRecord, Trim};
use rand::Rng;
use thiserror::Error;

use crate::model::{AnswerOption, Question, QuestionNo};

const COL_ID: usize = 0;
const COL_PROMPT: usize = 1;
const COL_OPTION_A: usize = 2;
const COL_CORRECT: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    #[error("malformed question bank: {0}")]
    Malformed(String),

    #[error("line {line}: correct answer is empty")]
    MissingAnswer { line: u64 },
}

/// Knobs for [`parse_question_bank`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Substitute a random letter for an empty correct-answer column instead of failing.
    pub fabricate_missing_answer: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            fabricate_missing_answer: true,
        }
    }
}

/// Outcome of parsing a question bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuestionBank {
    pub questions: Vec<Question>,
    /// Rows skipped for a missing id/prompt or an unrecognised answer letter.
    pub dropped_rows: usize,
    /// Rows whose correct answer was made up because the column was empty.
    pub fabricated_answers: usize,
}

enum RowOutcome {
    Admitted(Question),
    Fabricated(Question),
    Dropped,
}

fn field(record: &StringRecord, index: usize) -> &str {
    record.get(index).unwrap_or_default()
}

fn parse_row<R: Rng + ?Sized>(
    record: &StringRecord,
    options: ParseOptions,
    rng: &mut R,
) -> Result<RowOutcome, ParseError> {
    let line = record.position().map_or(0, csv::Position::line);

    let Ok(number) = QuestionNo::new(field(record, COL_ID)) else {
        return Ok(RowOutcome::Dropped);
    };
    let prompt = field(record, COL_PROMPT);
    if prompt.is_empty() {
        return Ok(RowOutcome::Dropped);
    }

    let raw_correct = field(record, COL_CORRECT);
    let (correct, fabricated) = if raw_correct.trim().is_empty() {
        if !options.fabricate_missing_answer {
            return Err(ParseError::MissingAnswer { line });
        }
        let option = AnswerOption::random(rng);
        log::warn!("line {line}: correct answer missing, substituting {option}");
        (option, true)
    } else {
        match AnswerOption::parse_lenient(raw_correct) {
            Ok(option) => (option, false),
            Err(_) => {
                log::warn!("line {line}: unrecognised correct answer {raw_correct:?}, row dropped");
                return Ok(RowOutcome::Dropped);
            }
        }
    };

    let options_text =
        std::array::from_fn(|offset| field(record, COL_OPTION_A + offset).to_owned());
    let Ok(question) = Question::new(number, prompt, options_text, correct) else {
        return Ok(RowOutcome::Dropped);
    };

    Ok(if fabricated {
        RowOutcome::Fabricated(question)
    } else {
        RowOutcome::Admitted(question)
    })
}

/// Parse CSV bytes into questions.
///
/// # Errors
///
/// Returns `ParseError::Malformed` if the CSV stream cannot be read, or
/// `ParseError::MissingAnswer` for an empty answer column when
/// `fabricate_missing_answer` is off.
pub fn parse_question_bank<R: Rng + ?Sized>(
    input: &[u8],
    options: ParseOptions,
    rng: &mut R,
) -> Result<ParsedQuestionBank, ParseError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(input);

    let mut parsed = ParsedQuestionBank {
        questions: Vec::new(),
        dropped_rows: 0,
        fabricated_answers: 0,
    };

    for record in reader.records() {
        let record = record.map_err(|e| ParseError::Malformed(e.to_string()))?;
        match parse_row(&record, options, rng)? {
            RowOutcome::Admitted(question) => parsed.questions.push(question),
            RowOutcome::Fabricated(question) => {
                parsed.fabricated_answers += 1;
                parsed.questions.push(question);
            }
            RowOutcome::Dropped => parsed.dropped_rows += 1,
        }
    }

    Ok(parsed)
}
