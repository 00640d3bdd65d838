#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard_service;
pub mod error;
pub mod question_source;
pub mod quiz_loop;
pub mod result_reporter;
pub mod timer;

pub use app_services::{AppServices, StoreBackend};
pub use dashboard_service::{DashboardData, DashboardService};
pub use error::{AppServicesError, DashboardError, LoadError, ReportError};
pub use question_source::{QuestionLocation, QuestionSource};
pub use quiz_loop::QuizLoopService;
pub use result_reporter::ResultReporter;
pub use timer::{CountdownTimer, TICK_PERIOD};
