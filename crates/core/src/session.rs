use std::fmt;

use rand::Rng;
use thiserror::Error;

use crate::config::{PassThresholds, QuizConfig};
use crate::model::{AnswerOption, Answers, Question, QuizSnapshot};
use crate::sampler::sample;
use crate::scoring::{ScoreBand, percent, score};

/// Remaining time at or below which the countdown is shown as urgent.
pub const LOW_TIME_SECS: u32 = 5 * 60;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSessionError {
    #[error("cannot {action} while {phase}")]
    InvalidPhase {
        action: &'static str,
        phase: QuizPhase,
    },

    #[error("question {index} is out of range for {len} questions")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no questions available for session")]
    Empty,
}

//
// ─── PHASES & OUTCOMES ────────────────────────────────────────────────────────
//

/// Lifecycle of a quiz screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuizPhase {
    Loading,
    ReadyToStart,
    Active,
    Completed,
    Error,
}

impl fmt::Display for QuizPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Loading => "loading",
            Self::ReadyToStart => "ready",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Error => "in error",
        })
    }
}

/// What ended an active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimeExpired,
}

/// Per-question marker for the status grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionStatus {
    Current,
    Answered,
    Unanswered,
}

/// Generation of the countdown. Ticks scheduled under an older epoch are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerEpoch(u64);

/// Result of delivering one countdown tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Running { remaining_secs: u32 },
    /// The countdown reached zero and the session was submitted.
    Expired(QuizResult),
    /// The tick belongs to a countdown that is no longer current.
    Stale,
}

//
// ─── RESULT ───────────────────────────────────────────────────────────────────
//

/// One row of the post-quiz review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub position: usize,
    pub prompt: String,
    pub options: Vec<(AnswerOption, String)>,
    pub selected: Option<AnswerOption>,
    pub correct: AnswerOption,
    pub is_correct: bool,
}

/// Frozen outcome of a completed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    questions: Vec<Question>,
    answers: Answers,
    score: u32,
    total: u32,
    trigger: SubmitTrigger,
}

impl QuizResult {
    fn new(questions: Vec<Question>, answers: Answers, trigger: SubmitTrigger) -> Self {
        let score = score(&questions, &answers);
        let total = u32::try_from(questions.len()).unwrap_or(u32::MAX);
        Self {
            questions,
            answers,
            score,
            total,
            trigger,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn percent(&self) -> f64 {
        percent(self.score, self.total)
    }

    #[must_use]
    pub fn band(&self, thresholds: PassThresholds) -> ScoreBand {
        ScoreBand::from_percent(self.percent(), thresholds)
    }

    #[must_use]
    pub fn trigger(&self) -> SubmitTrigger {
        self.trigger
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    #[must_use]
    pub fn snapshot(&self) -> QuizSnapshot {
        QuizSnapshot {
            questions: self.questions.clone(),
            user_answers: self.answers.clone(),
        }
    }

    #[must_use]
    pub fn review(&self) -> Vec<ReviewItem> {
        self.questions
            .iter()
            .enumerate()
            .map(|(position, question)| {
                let selected = self.answers.get(position);
                ReviewItem {
                    position,
                    prompt: question.prompt().to_owned(),
                    options: question
                        .options()
                        .map(|(option, text)| (option, text.to_owned()))
                        .collect(),
                    selected,
                    correct: question.correct(),
                    is_correct: question.is_correct(selected),
                }
            })
            .collect()
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// State machine behind one quiz screen.
///
/// Owns the loaded pool, the sampled questions, navigation, answers and the
/// countdown. Every mutation goes through a transition method; a rejected
/// transition leaves the session untouched.
pub struct QuizSession {
    duration_secs: u32,
    sample_size: usize,
    phase: QuizPhase,
    pool: Vec<Question>,
    questions: Vec<Question>,
    current: usize,
    answers: Answers,
    remaining_secs: u32,
    epoch: u64,
    result: Option<QuizResult>,
    load_error: Option<String>,
}

impl QuizSession {
    /// A fresh session waiting for its question pool.
    #[must_use]
    pub fn new(config: &QuizConfig) -> Self {
        Self {
            duration_secs: config.session_duration_secs(),
            sample_size: config.sample_size(),
            phase: QuizPhase::Loading,
            pool: Vec::new(),
            questions: Vec::new(),
            current: 0,
            answers: Answers::new(),
            remaining_secs: config.session_duration_secs(),
            epoch: 0,
            result: None,
            load_error: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    #[must_use]
    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    #[must_use]
    pub fn answer_for(&self, index: usize) -> Option<AnswerOption> {
        self.answers.get(index)
    }

    #[must_use]
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    #[must_use]
    pub fn timer_epoch(&self) -> TimerEpoch {
        TimerEpoch(self.epoch)
    }

    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current + 1 >= self.questions.len()
    }

    #[must_use]
    pub fn is_low_time(&self) -> bool {
        self.phase == QuizPhase::Active && self.remaining_secs <= LOW_TIME_SECS
    }

    /// Position through the session as a percentage (current question included).
    #[must_use]
    pub fn progress_percent(&self) -> f64 {
        if self.questions.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let pct = (self.current + 1) as f64 / self.questions.len() as f64 * 100.0;
        pct
    }

    #[must_use]
    pub fn question_status(&self, index: usize) -> QuestionStatus {
        if index == self.current {
            QuestionStatus::Current
        } else if self.answers.is_answered(index) {
            QuestionStatus::Answered
        } else {
            QuestionStatus::Unanswered
        }
    }

    fn require(&self, expected: QuizPhase, action: &'static str) -> Result<(), QuizSessionError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(QuizSessionError::InvalidPhase {
                action,
                phase: self.phase,
            })
        }
    }

    fn check_index(&self, index: usize) -> Result<(), QuizSessionError> {
        if index < self.questions.len() {
            Ok(())
        } else {
            Err(QuizSessionError::IndexOutOfRange {
                index,
                len: self.questions.len(),
            })
        }
    }

    fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.questions = sample(&self.pool, self.sample_size, rng);
        self.current = 0;
        self.answers.clear();
        self.remaining_secs = self.duration_secs;
        self.result = None;
    }

    /// `Loading → ReadyToStart`: keep the pool and draw the session's questions.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` outside `Loading`.
    pub fn on_loaded<R: Rng + ?Sized>(
        &mut self,
        pool: Vec<Question>,
        rng: &mut R,
    ) -> Result<(), QuizSessionError> {
        self.require(QuizPhase::Loading, "accept questions")?;
        self.pool = pool;
        self.draw(rng);
        self.load_error = None;
        self.phase = QuizPhase::ReadyToStart;
        Ok(())
    }

    /// `Loading → Error`.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` outside `Loading`.
    pub fn on_load_failed(&mut self, message: impl Into<String>) -> Result<(), QuizSessionError> {
        self.require(QuizPhase::Loading, "record a load failure")?;
        self.load_error = Some(message.into());
        self.phase = QuizPhase::Error;
        Ok(())
    }

    /// `Error → Loading`.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` outside `Error`.
    pub fn retry(&mut self) -> Result<(), QuizSessionError> {
        self.require(QuizPhase::Error, "retry")?;
        self.load_error = None;
        self.phase = QuizPhase::Loading;
        Ok(())
    }

    /// `ReadyToStart → Active`. Returns the epoch the countdown must tick under.
    ///
    /// # Errors
    ///
    /// Returns `QuizSessionError::InvalidPhase` outside `ReadyToStart`, or
    /// `QuizSessionError::Empty` when no questions were drawn.
    pub fn start(&mut self) -> Result<TimerEpoch, QuizSessionError> {
        self.require(QuizPhase::ReadyToStart, "start")?;
        if self.questions.is_empty() {
            return Err(QuizSessionError::Empty);
        }
        self.current = 0;
        self.answers.clear();
        self.remaining_secs = self.duration_secs;
        self.epoch += 1;
        self.phase = QuizPhase::Active;
        Ok(self.timer_epoch())
    }

    /// Record `option` for question `index` without moving. Returns true if it changed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `Active`, or `IndexOutOfRange`.
    pub fn select_answer(
        &mut self,
        index: usize,
        option: AnswerOption,
    ) -> Result<bool, QuizSessionError> {
        self.require(QuizPhase::Active, "answer")?;
        self.check_index(index)?;
        Ok(self.answers.set(index, option))
    }

    /// Move forward one question; stays put on the last one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `Active`.
    pub fn go_next(&mut self) -> Result<usize, QuizSessionError> {
        self.require(QuizPhase::Active, "navigate")?;
        if !self.is_last_question() {
            self.current += 1;
        }
        Ok(self.current)
    }

    /// Move back one question; stays put on the first one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `Active`.
    pub fn go_prev(&mut self) -> Result<usize, QuizSessionError> {
        self.require(QuizPhase::Active, "navigate")?;
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `Active`, or `IndexOutOfRange`.
    pub fn jump_to(&mut self, index: usize) -> Result<(), QuizSessionError> {
        self.require(QuizPhase::Active, "navigate")?;
        self.check_index(index)?;
        self.current = index;
        Ok(())
    }

    /// Deliver one elapsed second from the countdown scheduled under `epoch`.
    ///
    /// The tick that reaches zero submits the session with the answers present
    /// at that moment.
    pub fn tick(&mut self, epoch: TimerEpoch) -> TickOutcome {
        if self.phase != QuizPhase::Active || epoch != self.timer_epoch() {
            return TickOutcome::Stale;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return TickOutcome::Expired(self.complete(SubmitTrigger::TimeExpired));
        }
        TickOutcome::Running {
            remaining_secs: self.remaining_secs,
        }
    }

    /// `Active → Completed` on the user's request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `Active`.
    pub fn submit(&mut self) -> Result<QuizResult, QuizSessionError> {
        self.require(QuizPhase::Active, "submit")?;
        Ok(self.complete(SubmitTrigger::Manual))
    }

    fn complete(&mut self, trigger: SubmitTrigger) -> QuizResult {
        // Leaving Active retires the running countdown.
        self.epoch += 1;
        let result = QuizResult::new(self.questions.clone(), self.answers.clone(), trigger);
        self.result = Some(result.clone());
        self.phase = QuizPhase::Completed;
        result
    }

    /// `Completed → ReadyToStart`: redraw from the loaded pool without refetching.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPhase` outside `Completed`.
    pub fn reset<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), QuizSessionError> {
        self.require(QuizPhase::Completed, "reset")?;
        self.draw(rng);
        self.phase = QuizPhase::ReadyToStart;
        Ok(())
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("phase", &self.phase)
            .field("pool_len", &self.pool.len())
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("answered", &self.answers.len())
            .field("remaining_secs", &self.remaining_secs)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
