//! Correctness and score banding.

use crate::config::PassThresholds;
use crate::model::{Answers, Question};

/// Count the questions answered with their correct option.
///
/// Unanswered questions count as incorrect; answers for indices past the end
/// of `questions` are ignored.
#[must_use]
pub fn score(questions: &[Question], answers: &Answers) -> u32 {
    let correct = questions
        .iter()
        .enumerate()
        .filter(|(index, question)| question.is_correct(answers.get(*index)))
        .count();
    u32::try_from(correct).unwrap_or(u32::MAX)
}

/// `score / total * 100`, or 0 when there are no questions.
#[must_use]
pub fn percent(score: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(score) / f64::from(total) * 100.0
}

/// Round to one decimal place, the precision every score is displayed with.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Display band for a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    KeepPracticing,
    GoodJob,
    Excellent,
}

impl ScoreBand {
    #[must_use]
    pub fn from_percent(percent: f64, thresholds: PassThresholds) -> Self {
        if percent >= thresholds.excellent() {
            Self::Excellent
        } else if percent >= thresholds.good() {
            Self::GoodJob
        } else {
            Self::KeepPracticing
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent!",
            Self::GoodJob => "Good Job!",
            Self::KeepPracticing => "Keep Practicing!",
        }
    }

    /// Stable CSS hook for the band.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Excellent => "band-excellent",
            Self::GoodJob => "band-good",
            Self::KeepPracticing => "band-practice",
        }
    }
}
