use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::QuizConfig;
use quiz_core::model::EnrollmentNumber;
use quiz_core::question_bank::ParseOptions;
use services::{
    AppServices, DashboardService, QuestionLocation, QuestionSource, QuizLoopService, StoreBackend,
};
use storage::rest::RestConfig;
use ui::{App, UiApp, build_app_context};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidEnrollment { raw: String },
    InvalidNumber { name: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidEnrollment { raw } => {
                write!(f, "invalid --enrollment value: {raw:?}")
            }
            ArgsError::InvalidNumber { name, raw } => write!(f, "invalid {name} value: {raw}"),
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

struct DesktopApp {
    default_enrollment: Option<EnrollmentNumber>,
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn default_enrollment(&self) -> Option<EnrollmentNumber> {
        self.default_enrollment.clone()
    }

    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        self.services.quiz_loop()
    }

    fn dashboard(&self) -> Arc<DashboardService> {
        self.services.dashboard()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui    [--db <sqlite_url> | --memory] [--questions <path|url>] [--enrollment <id>]"
    );
    eprintln!("  cargo run -p app -- check [--questions <path|url>] [--strict]");
    eprintln!("  cargo run -p storage --bin seed -- --help");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db sqlite:quiz.sqlite3");
    eprintln!("  --questions questions.csv");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZ_DB_URL, QUIZ_QUESTIONS, QUIZ_ENROLLMENT");
    eprintln!("  QUIZ_STORE_URL, QUIZ_STORE_KEY (REST record store; both required)");
    eprintln!("  QUIZ_DURATION_SECS, QUIZ_SAMPLE_SIZE, QUIZ_STRICT_ANSWERS");
    eprintln!("  RUST_LOG (default: info)");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Check,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "check" => Some(Self::Check),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    memory: bool,
    questions: QuestionLocation,
    enrollment: Option<EnrollmentNumber>,
    strict: bool,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn env_flag(name: &str) -> bool {
    env_var(name).is_some_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    })
}

fn env_number<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ArgsError> {
    env_var(name)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|_| ArgsError::InvalidNumber { name, raw })
        })
        .transpose()
}

fn parse_enrollment(raw: String) -> Result<EnrollmentNumber, ArgsError> {
    EnrollmentNumber::new(&raw).map_err(|_| ArgsError::InvalidEnrollment { raw })
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut db_url = env_var("QUIZ_DB_URL")
            .map_or_else(|| normalize_sqlite_url("sqlite:quiz.sqlite3".into()), normalize_sqlite_url);
        let mut memory = false;
        let mut questions = env_var("QUIZ_QUESTIONS")
            .map_or_else(QuestionLocation::default, |raw| QuestionLocation::parse(&raw));
        let mut enrollment = env_var("QUIZ_ENROLLMENT").map(parse_enrollment).transpose()?;
        let mut strict = env_flag("QUIZ_STRICT_ANSWERS");

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--memory" => memory = true,
                "--questions" => {
                    questions = QuestionLocation::parse(&require_value(args, "--questions")?);
                }
                "--enrollment" => {
                    enrollment = Some(parse_enrollment(require_value(args, "--enrollment")?)?);
                }
                "--strict" => strict = true,
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self {
            db_url,
            memory,
            questions,
            enrollment,
            strict,
        })
    }
}

fn quiz_config(strict: bool) -> Result<QuizConfig, Box<dyn std::error::Error>> {
    let mut config = QuizConfig::default().with_fabricate_missing_answer(!strict);
    if let Some(secs) = env_number::<u32>("QUIZ_DURATION_SECS")? {
        config = config.with_session_duration_secs(secs)?;
    }
    if let Some(size) = env_number::<usize>("QUIZ_SAMPLE_SIZE")? {
        config = config.with_sample_size(size)?;
    }
    Ok(config)
}

/// REST wins when either store variable is set; a half-configured REST store is an error.
fn store_backend(args: &Args) -> Result<StoreBackend, Box<dyn std::error::Error>> {
    let url = env_var("QUIZ_STORE_URL");
    let key = env_var("QUIZ_STORE_KEY");
    if url.is_some() || key.is_some() {
        let rest = RestConfig::from_parts(url.as_deref(), key.as_deref())?;
        log::info!(
            "record store: REST {} (key {}...)",
            rest.base_url(),
            rest.key_prefix()
        );
        return Ok(StoreBackend::Rest(rest));
    }
    if args.memory {
        log::info!("record store: in-memory");
        return Ok(StoreBackend::Memory);
    }
    prepare_sqlite_file(&args.db_url)?;
    log::info!("record store: {}", args.db_url);
    Ok(StoreBackend::Sqlite(args.db_url.clone()))
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

async fn check(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let source = QuestionSource::new(
        args.questions,
        ParseOptions {
            fabricate_missing_answer: !args.strict,
        },
    );
    let report = source.load_report().await?;
    println!("source:     {}", source.location());
    println!("admitted:   {}", report.questions.len());
    println!("dropped:    {}", report.dropped_rows);
    println!("fabricated: {}", report.fabricated_answers);
    Ok(())
}

async fn launch_ui(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = quiz_config(args.strict)?;
    let backend = store_backend(&args)?;
    let services = AppServices::connect(backend, args.questions, config).await?;
    if args.enrollment.is_none() {
        log::warn!("no default enrollment; routes without ?enrollment= will show no student");
    }

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        default_enrollment: args.enrollment,
        services,
    });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz Challenge")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(&mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    match cmd {
        Command::Ui => launch_ui(parsed).await,
        Command::Check => check(parsed).await,
    }
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run().await {
        log::error!("{err}");
        std::process::exit(2);
    }
}
