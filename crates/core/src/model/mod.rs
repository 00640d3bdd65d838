mod answers;
mod attempt;
mod ids;
mod question;

pub use answers::Answers;
pub use attempt::{AttemptRecord, NewAttempt, QuizSnapshot, Student};
pub use ids::{AttemptId, EmptyIdError, EnrollmentNumber, QuestionNo, SubjectId};
pub use question::{AnswerOption, Question, QuestionError};
