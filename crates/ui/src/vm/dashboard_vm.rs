use quiz_core::PassThresholds;
use quiz_core::model::{AttemptRecord, SubjectId};
use quiz_core::scoring::ScoreBand;
use services::DashboardData;

use crate::vm::time_fmt::{format_date, format_percent, format_time};

/// Label shown when an attempt has no subject or the placeholder one.
pub const GENERAL_SUBJECT_LABEL: &str = "General Quiz";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttemptRowVm {
    pub id: i64,
    pub subject: String,
    pub date_str: String,
    pub time_str: String,
    pub score_label: String,
    pub percent_label: String,
    pub badge_label: String,
    pub band_class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DashboardVm {
    pub student_name: String,
    pub enrollment: String,
    pub greeting: String,
    pub total_quizzes: usize,
    pub average_label: String,
    pub best_label: String,
    pub attempts: Vec<AttemptRowVm>,
}

#[must_use]
pub fn subject_label(subject: Option<&SubjectId>) -> String {
    match subject {
        Some(id) if !id.is_default() => id.as_str().to_owned(),
        _ => GENERAL_SUBJECT_LABEL.to_owned(),
    }
}

fn attempt_row(attempt: &AttemptRecord, thresholds: PassThresholds) -> AttemptRowVm {
    let percent = attempt.percent();
    AttemptRowVm {
        id: attempt.id.value(),
        subject: subject_label(attempt.subject_id.as_ref()),
        date_str: format_date(attempt.attempted_at),
        time_str: format_time(attempt.attempted_at),
        score_label: format!("{} / {}", attempt.score, attempt.total_questions),
        percent_label: format_percent(percent),
        badge_label: format!("{percent:.0}%"),
        band_class: ScoreBand::from_percent(percent, thresholds).css_class(),
    }
}

#[must_use]
pub fn map_dashboard(data: &DashboardData, thresholds: PassThresholds) -> DashboardVm {
    DashboardVm {
        student_name: data.student.name.clone(),
        enrollment: data.student.enrollment_number.as_str().to_owned(),
        greeting: format!("Welcome back, {}!", data.student.first_name()),
        total_quizzes: data.summary.count,
        average_label: format_percent(data.summary.average_percent),
        best_label: format_percent(data.summary.best_percent),
        attempts: data
            .attempts
            .iter()
            .map(|attempt| attempt_row(attempt, thresholds))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{AttemptId, EnrollmentNumber, NewAttempt, Student};
    use quiz_core::stats::summarize;
    use quiz_core::time::fixed_now;

    fn attempt(id: i64, subject: Option<&str>, score: u32) -> AttemptRecord {
        AttemptRecord::from_new(
            AttemptId::new(id),
            NewAttempt {
                enrollment_number: EnrollmentNumber::new("E1").unwrap(),
                subject_id: subject.map(|s| SubjectId::new(s).unwrap()),
                score,
                total_questions: 20,
                correct_answers: score,
                quiz_data: None,
            },
            fixed_now(),
        )
    }

    #[test]
    fn subject_falls_back_to_general() {
        assert_eq!(subject_label(None), GENERAL_SUBJECT_LABEL);
        assert_eq!(
            subject_label(Some(&SubjectId::default())),
            GENERAL_SUBJECT_LABEL
        );
        assert_eq!(
            subject_label(Some(&SubjectId::new("Physics").unwrap())),
            "Physics"
        );
    }

    #[test]
    fn maps_summary_and_rows() {
        let attempts = vec![attempt(2, Some("Physics"), 17), attempt(1, None, 9)];
        let data = DashboardData {
            student: Student::new(EnrollmentNumber::new("E1").unwrap(), "Asha Rao"),
            summary: summarize(&attempts),
            attempts,
        };

        let vm = map_dashboard(&data, PassThresholds::default());
        assert_eq!(vm.greeting, "Welcome back, Asha!");
        assert_eq!(vm.total_quizzes, 2);
        assert_eq!(vm.average_label, "65.0%");
        assert_eq!(vm.best_label, "85.0%");

        let first = &vm.attempts[0];
        assert_eq!(first.subject, "Physics");
        assert_eq!(first.score_label, "17 / 20");
        assert_eq!(first.percent_label, "85.0%");
        assert_eq!(first.badge_label, "85%");
        assert_eq!(first.band_class, "band-excellent");
        assert_eq!(vm.attempts[1].subject, GENERAL_SUBJECT_LABEL);
        assert_eq!(vm.attempts[1].band_class, "band-practice");
    }
}
