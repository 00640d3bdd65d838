//! Domain logic for the timed quiz: question bank parsing, sampling, the
//! session state machine, scoring and dashboard aggregation.

pub mod config;
pub mod model;
pub mod question_bank;
pub mod sampler;
pub mod scoring;
pub mod session;
pub mod stats;
pub mod time;

pub use config::{ConfigError, PassThresholds, QuizConfig};
pub use time::Clock;
