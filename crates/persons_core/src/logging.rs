//! Rolling file logs for the directory core.
//!
//! Log lines use `event=<name> module=<area> status=<outcome>` followed by
//! `key=value` pairs. Ids and counts are logged; person names and emails are
//! not.
//!
//! # Invariants
//! - The logger is started at most once per process.
//! - Repeating `init_logging` with the same level and directory is a no-op;
//!   any other combination is rejected.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecification, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

const LOG_FILE_BASENAME: &str = "persons";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 5;
const MAX_PANIC_PAYLOAD_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: LevelFilter,
    dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn ensure_matches(&self, level: LevelFilter, dir: &Path) -> Result<(), LoggingError> {
        if self.level == level && self.dir == dir {
            return Ok(());
        }
        Err(LoggingError::Conflict {
            active: describe(self.level, &self.dir),
            requested: describe(level, dir),
        })
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("unsupported log level `{0}`; expected trace|debug|info|warn|error|off")]
    UnsupportedLevel(String),
    #[error("log directory must be an absolute path, got `{0}`")]
    InvalidLogDir(String),
    #[error("failed to create log directory `{}`: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to start logger: {0}")]
    Backend(#[from] flexi_logger::FlexiLoggerError),
    #[error("logging already initialized with {active}; refusing to switch to {requested}")]
    Conflict { active: String, requested: String },
}

/// Starts file logging under `log_dir` at `level`.
///
/// # Errors
/// - `UnsupportedLevel` for an unknown level name.
/// - `InvalidLogDir` when `log_dir` is not absolute.
/// - `Conflict` when logging already runs with different settings.
pub fn init_logging(level: &str, log_dir: impl AsRef<Path>) -> Result<(), LoggingError> {
    let level = parse_level(level)?;
    let dir = log_dir.as_ref();
    if !dir.is_absolute() {
        return Err(LoggingError::InvalidLogDir(dir.display().to_string()));
    }

    if let Some(active) = ACTIVE.get() {
        return active.ensure_matches(level, dir);
    }
    ACTIVE
        .get_or_try_init(|| start(level, dir))?
        .ensure_matches(level, dir)
}

/// Level and directory of the running logger, if any.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE.get().map(|active| (active.level, active.dir.clone()))
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

/// Parses a level name case-insensitively; `warning` is accepted for `warn`.
pub fn parse_level(level: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = level.trim();
    if trimmed.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    LevelFilter::from_str(trimmed).map_err(|_| LoggingError::UnsupportedLevel(level.to_string()))
}

fn start(level: LevelFilter, dir: &Path) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let handle = Logger::with(LogSpecification::builder().default(level).build())
        .log_to_file(
            FileSpec::default()
                .directory(dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()?;
    install_panic_hook();

    info!(
        "event=logging_init module=logging status=ok level={level} dir={} version={}",
        dir.display(),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        dir: dir.to_path_buf(),
        _handle: handle,
    })
}

/// Logs panics before delegating to the previously installed hook.
fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info.location().map_or_else(
            || "unknown".to_string(),
            |location| format!("{}:{}", location.file(), location.line()),
        );
        error!(
            "event=panic module=logging status=error location={location} payload={}",
            panic_summary(panic_info.payload())
        );
        previous(panic_info);
    }));
}

/// Single-line, length-capped rendering of a panic payload.
fn panic_summary(payload: &(dyn Any + Send)) -> String {
    let text = payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload");
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .take(MAX_PANIC_PAYLOAD_CHARS)
        .collect()
}

fn describe(level: LevelFilter, dir: &Path) -> String {
    format!("level={level} dir={}", dir.display())
}
