//! Aggregates shown on the student dashboard.

use crate::model::AttemptRecord;
use crate::scoring::round_one_decimal;

/// Headline numbers for a student's history.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DashboardSummary {
    pub count: usize,
    /// Mean of per-attempt percentages, one decimal.
    pub average_percent: f64,
    /// Highest per-attempt percentage, one decimal.
    pub best_percent: f64,
}

/// Summarize attempts. Empty input gives `{0, 0.0, 0.0}`; an attempt with no
/// questions counts as 0 %.
#[must_use]
pub fn summarize(attempts: &[AttemptRecord]) -> DashboardSummary {
    if attempts.is_empty() {
        return DashboardSummary::default();
    }

    let percents: Vec<f64> = attempts.iter().map(AttemptRecord::percent).collect();
    let total: f64 = percents.iter().sum();
    let best = percents.iter().copied().fold(0.0_f64, f64::max);

    #[allow(clippy::cast_precision_loss)]
    let average = total / percents.len() as f64;

    DashboardSummary {
        count: attempts.len(),
        average_percent: round_one_decimal(average),
        best_percent: round_one_decimal(best),
    }
}

/// Order attempts newest first, ties broken by id descending.
pub fn newest_first(attempts: &mut [AttemptRecord]) {
    attempts.sort_by(|a, b| {
        b.attempted_at
            .cmp(&a.attempted_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}
