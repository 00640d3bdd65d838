use std::fmt;

use chrono::{DateTime, Duration, Utc};
use quiz_core::Clock;
use quiz_core::model::{EnrollmentNumber, NewAttempt, Student, SubjectId};
use storage::repository::{QuizHistoryRepository, StudentRepository};
use storage::sqlite::SqliteRepository;

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    enrollment: EnrollmentNumber,
    name: String,
    attempts: u32,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidEnrollment { raw: String },
    InvalidAttempts { raw: String },
    InvalidDbUrl { raw: String },
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidEnrollment { raw } => {
                write!(f, "invalid --enrollment value: {raw:?}")
            }
            ArgsError::InvalidAttempts { raw } => write!(f, "invalid --attempts value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_enrollment(raw: String) -> Result<EnrollmentNumber, ArgsError> {
    EnrollmentNumber::new(&raw).map_err(|_| ArgsError::InvalidEnrollment { raw })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url =
            std::env::var("QUIZ_DB_URL").unwrap_or_else(|_| "sqlite:quiz.sqlite3".into());
        let mut enrollment =
            parse_enrollment(std::env::var("QUIZ_ENROLLMENT").unwrap_or_else(|_| "DEMO001".into()))?;
        let mut name = std::env::var("QUIZ_STUDENT_NAME").unwrap_or_else(|_| "Demo Student".into());
        let mut attempts = std::env::var("QUIZ_SEED_ATTEMPTS")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(3);
        let mut now: Option<DateTime<Utc>> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = value;
                }
                "--enrollment" => {
                    enrollment = parse_enrollment(require_value(&mut args, "--enrollment")?)?;
                }
                "--name" => {
                    name = require_value(&mut args, "--name")?;
                }
                "--attempts" => {
                    let value = require_value(&mut args, "--attempts")?;
                    attempts = value
                        .parse::<u32>()
                        .map_err(|_| ArgsError::InvalidAttempts { raw: value.clone() })?;
                }
                "--now" => {
                    let value = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&value)
                        .map_err(|_| ArgsError::InvalidNow { raw: value.clone() })?
                        .with_timezone(&Utc);
                    now = Some(parsed);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            enrollment,
            name,
            attempts,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>         SQLite URL (default: sqlite:quiz.sqlite3)");
    eprintln!("  --enrollment <id>         Student enrollment number (default: DEMO001)");
    eprintln!("  --name <name>             Student name (default: Demo Student)");
    eprintln!("  --attempts <n>            Number of past attempts to append (default: 3)");
    eprintln!("  --now <rfc3339>           Fixed current time for deterministic seeding");
    eprintln!("  -h, --help                Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  QUIZ_DB_URL, QUIZ_ENROLLMENT, QUIZ_STUDENT_NAME, QUIZ_SEED_ATTEMPTS");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let repo = SqliteRepository::connect(&args.db_url).await?;
    repo.migrate().await?;
    let now = args.now.unwrap_or_else(Utc::now);

    repo.upsert_student(&Student::new(args.enrollment.clone(), args.name.clone()))
        .await?;

    // Oldest first, one attempt every two days, scores climbing.
    for i in 0..args.attempts {
        let days_ago = i64::from(args.attempts - i) * 2;
        let stamped = repo
            .clone()
            .with_clock(Clock::fixed(now - Duration::days(days_ago)));
        let score = (8 + i * 3).min(20);
        stamped
            .append_attempt(NewAttempt {
                enrollment_number: args.enrollment.clone(),
                subject_id: Some(SubjectId::default()),
                score,
                total_questions: 20,
                correct_answers: score,
                quiz_data: None,
            })
            .await?;
    }

    println!(
        "Seeded student {} ({}) with {} attempts into {}",
        args.enrollment, args.name, args.attempts, args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
