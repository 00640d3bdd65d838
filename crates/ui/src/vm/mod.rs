mod dashboard_vm;
mod quiz_vm;
mod time_fmt;

pub use dashboard_vm::{
    AttemptRowVm, DashboardVm, GENERAL_SUBJECT_LABEL, map_dashboard, subject_label,
};
pub use quiz_vm::{
    ActiveQuizVm, EMPTY_BANK_NOTICE, OptionVm, QuizIntent, QuizScreenVm, ReadyVm, ResultVm,
    ReviewOptionVm, ReviewRowVm, StatusCellVm, map_quiz_screen, map_result,
};
pub use time_fmt::{format_countdown, format_percent};
