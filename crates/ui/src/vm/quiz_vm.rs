use quiz_core::PassThresholds;
use quiz_core::model::AnswerOption;
use quiz_core::session::{
    QuestionStatus, QuizPhase, QuizResult, QuizSession, ReviewItem, SubmitTrigger,
};

use crate::vm::time_fmt::{format_countdown, format_percent};

/// User actions on the quiz screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizIntent {
    Start,
    Select(AnswerOption),
    Next,
    Prev,
    Jump(usize),
    Submit,
    Retry,
    Reset,
}

/// What the quiz screen renders for the current session phase.
#[derive(Clone, Debug, PartialEq)]
pub enum QuizScreenVm {
    Loading,
    Error { message: String },
    Ready(ReadyVm),
    Active(ActiveQuizVm),
    Completed(ResultVm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadyVm {
    pub questions_label: String,
    pub time_limit_label: String,
    pub can_start: bool,
    /// Shown instead of the start button when the bank yielded no questions.
    pub empty_notice: Option<&'static str>,
}

pub const EMPTY_BANK_NOTICE: &str =
    "No usable questions were found in the question bank. Check the CSV file and try again.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OptionVm {
    pub option: AnswerOption,
    pub text: String,
    pub selected: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusCellVm {
    pub index: usize,
    pub label: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveQuizVm {
    pub index: usize,
    pub position_label: String,
    pub prompt: String,
    pub options: Vec<OptionVm>,
    pub timer_label: String,
    pub low_time: bool,
    pub progress_percent: f64,
    pub can_go_back: bool,
    pub is_last: bool,
    pub statuses: Vec<StatusCellVm>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewOptionVm {
    pub option: AnswerOption,
    pub text: String,
    pub class: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewRowVm {
    pub heading: String,
    pub is_correct: bool,
    pub options: Vec<ReviewOptionVm>,
    pub correct_label: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResultVm {
    pub score_label: String,
    pub percent_label: String,
    pub band_label: &'static str,
    pub band_class: &'static str,
    pub time_expired: bool,
    pub review: Vec<ReviewRowVm>,
}

fn status_class(status: QuestionStatus) -> &'static str {
    match status {
        QuestionStatus::Current => "status-cell status-current",
        QuestionStatus::Answered => "status-cell status-answered",
        QuestionStatus::Unanswered => "status-cell status-unanswered",
    }
}

fn ready(session: &QuizSession) -> ReadyVm {
    let minutes = session.duration_secs().div_ceil(60);
    let total = session.total_questions();
    ReadyVm {
        questions_label: format!("{total} Random Questions"),
        time_limit_label: format!("{minutes} Minutes Time Limit"),
        can_start: total > 0,
        empty_notice: (total == 0).then_some(EMPTY_BANK_NOTICE),
    }
}

fn active(session: &QuizSession) -> Option<ActiveQuizVm> {
    let question = session.current_question()?;
    let index = session.current_index();
    let selected = session.answer_for(index);
    Some(ActiveQuizVm {
        index,
        position_label: format!("Question {} of {}", index + 1, session.total_questions()),
        prompt: question.prompt().to_owned(),
        options: question
            .options()
            .map(|(option, text)| OptionVm {
                option,
                text: text.to_owned(),
                selected: selected == Some(option),
            })
            .collect(),
        timer_label: format_countdown(session.remaining_secs()),
        low_time: session.is_low_time(),
        progress_percent: session.progress_percent(),
        can_go_back: index > 0,
        is_last: session.is_last_question(),
        statuses: (0..session.total_questions())
            .map(|i| StatusCellVm {
                index: i,
                label: (i + 1).to_string(),
                class: status_class(session.question_status(i)),
            })
            .collect(),
    })
}

fn review_row(item: ReviewItem) -> ReviewRowVm {
    let options = item
        .options
        .into_iter()
        .map(|(option, text)| {
            let class = match (item.selected == Some(option), item.is_correct) {
                (true, true) => "review-option review-option--right",
                (true, false) => "review-option review-option--wrong",
                (false, _) => "review-option",
            };
            ReviewOptionVm {
                option,
                text,
                class,
            }
        })
        .collect();
    ReviewRowVm {
        heading: format!("Q{}: {}", item.position + 1, item.prompt),
        is_correct: item.is_correct,
        options,
        correct_label: (!item.is_correct).then(|| format!("Correct Answer: {}", item.correct)),
    }
}

#[must_use]
pub fn map_result(result: &QuizResult, thresholds: PassThresholds) -> ResultVm {
    let band = result.band(thresholds);
    ResultVm {
        score_label: format!("{}/{}", result.score(), result.total()),
        percent_label: format!("{} Correct", format_percent(result.percent())),
        band_label: band.label(),
        band_class: band.css_class(),
        time_expired: result.trigger() == SubmitTrigger::TimeExpired,
        review: result.review().into_iter().map(review_row).collect(),
    }
}

#[must_use]
pub fn map_quiz_screen(session: &QuizSession, thresholds: PassThresholds) -> QuizScreenVm {
    match session.phase() {
        QuizPhase::Loading => QuizScreenVm::Loading,
        QuizPhase::Error => QuizScreenVm::Error {
            message: session
                .load_error()
                .unwrap_or("Could not load the question bank.")
                .to_owned(),
        },
        QuizPhase::ReadyToStart => QuizScreenVm::Ready(ready(session)),
        QuizPhase::Active => active(session).map_or(QuizScreenVm::Loading, QuizScreenVm::Active),
        QuizPhase::Completed => session.result().map_or(QuizScreenVm::Loading, |result| {
            QuizScreenVm::Completed(map_result(result, thresholds))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::QuizConfig;
    use quiz_core::model::{Question, QuestionNo};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn pool(n: usize) -> Vec<Question> {
        (1..=n)
            .map(|i| {
                Question::new(
                    QuestionNo::new(i.to_string()).unwrap(),
                    format!("Prompt {i}"),
                    ["w".into(), "x".into(), "y".into(), "z".into()],
                    AnswerOption::C,
                )
                .unwrap()
            })
            .collect()
    }

    fn loaded(n: usize) -> QuizSession {
        let mut session = QuizSession::new(&QuizConfig::default());
        session
            .on_loaded(pool(n), &mut StdRng::seed_from_u64(9))
            .unwrap();
        session
    }

    #[test]
    fn loading_and_error_screens() {
        let mut session = QuizSession::new(&QuizConfig::default());
        assert_eq!(
            map_quiz_screen(&session, PassThresholds::default()),
            QuizScreenVm::Loading
        );
        session.on_load_failed("questions.csv: not found").unwrap();
        assert_eq!(
            map_quiz_screen(&session, PassThresholds::default()),
            QuizScreenVm::Error {
                message: "questions.csv: not found".into()
            }
        );
    }

    #[test]
    fn ready_screen_describes_the_quiz() {
        let session = loaded(25);
        let QuizScreenVm::Ready(vm) = map_quiz_screen(&session, PassThresholds::default()) else {
            panic!("expected ready screen");
        };
        assert_eq!(vm.questions_label, "20 Random Questions");
        assert_eq!(vm.time_limit_label, "30 Minutes Time Limit");
        assert!(vm.can_start);
        assert_eq!(vm.empty_notice, None);
    }

    #[test]
    fn ready_screen_blocks_start_for_an_empty_bank() {
        let session = loaded(0);
        let QuizScreenVm::Ready(vm) = map_quiz_screen(&session, PassThresholds::default()) else {
            panic!("expected ready screen");
        };
        assert_eq!(vm.questions_label, "0 Random Questions");
        assert!(!vm.can_start);
        assert_eq!(vm.empty_notice, Some(EMPTY_BANK_NOTICE));
    }

    #[test]
    fn active_screen_tracks_position_and_answers() {
        let mut session = loaded(3);
        session.start().unwrap();
        session.select_answer(0, AnswerOption::B).unwrap();
        session.go_next().unwrap();

        let QuizScreenVm::Active(vm) = map_quiz_screen(&session, PassThresholds::default()) else {
            panic!("expected active screen");
        };
        assert_eq!(vm.position_label, "Question 2 of 3");
        assert_eq!(vm.timer_label, "30:00");
        assert!(!vm.low_time);
        assert!(vm.can_go_back);
        assert!(!vm.is_last);
        assert!(vm.options.iter().all(|o| !o.selected));
        assert_eq!(vm.statuses[0].class, "status-cell status-answered");
        assert_eq!(vm.statuses[1].class, "status-cell status-current");
        assert_eq!(vm.statuses[2].class, "status-cell status-unanswered");
    }

    #[test]
    fn result_screen_lists_corrections() {
        let mut session = loaded(2);
        session.start().unwrap();
        session.select_answer(0, AnswerOption::C).unwrap();
        session.select_answer(1, AnswerOption::A).unwrap();
        session.submit().unwrap();

        let QuizScreenVm::Completed(vm) = map_quiz_screen(&session, PassThresholds::default())
        else {
            panic!("expected results");
        };
        assert_eq!(vm.score_label, "1/2");
        assert_eq!(vm.percent_label, "50.0% Correct");
        assert_eq!(vm.band_label, "Good Job!");
        assert!(!vm.time_expired);

        let right = &vm.review[0];
        assert!(right.is_correct);
        assert!(right.correct_label.is_none());
        let wrong = &vm.review[1];
        assert_eq!(wrong.correct_label.as_deref(), Some("Correct Answer: C"));
        assert_eq!(wrong.options[0].class, "review-option review-option--wrong");
        assert!(wrong.heading.starts_with("Q2: Prompt "));
    }
}
