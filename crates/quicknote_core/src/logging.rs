//! Process-wide file logging for QuickNote.
//!
//! # Responsibility
//! - Start a rotating file logger once per process.
//! - Flush buffered lines on demand for short-lived callers such as the CLI.
//!
//! # Invariants
//! - Repeating init with the same level and directory is a no-op.
//! - A second init with a different level or directory is rejected.
//! - Initialization never panics.
//! - Panic payloads may hold credentials typed by a user, so only their size
//!   and source location are logged.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "quicknote";
const ROTATE_AT_BYTES: u64 = 2 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    config: LogConfig,
    handle: LoggerHandle,
}

/// Validated logging settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// One of `trace|debug|info|warn|error`.
    pub level: &'static str,
    /// Absolute directory holding `quicknote*.log` files.
    pub dir: PathBuf,
}

impl LogConfig {
    /// Normalizes raw user input.
    ///
    /// Level is case-insensitive and accepts `warning` for `warn`; the
    /// directory must be a non-empty absolute path.
    pub fn parse(level: &str, log_dir: &str) -> Result<Self, LoggingError> {
        let normalized = level.trim().to_ascii_lowercase();
        let level = match normalized.as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" | "warning" => "warn",
            "error" => "error",
            _ => return Err(LoggingError::UnsupportedLevel(normalized)),
        };

        let trimmed = log_dir.trim();
        if trimmed.is_empty() {
            return Err(LoggingError::InvalidDirectory("path is empty".to_string()));
        }
        let dir = PathBuf::from(trimmed);
        if !dir.is_absolute() {
            return Err(LoggingError::InvalidDirectory(format!(
                "`{trimmed}` is not absolute"
            )));
        }

        Ok(Self { level, dir })
    }
}

/// Logging bootstrap failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    UnsupportedLevel(String),
    InvalidDirectory(String),
    Conflict {
        field: &'static str,
        active: String,
        requested: String,
    },
    Backend(String),
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::InvalidDirectory(reason) => write!(f, "invalid log directory: {reason}"),
            Self::Conflict {
                field,
                active,
                requested,
            } => write!(
                f,
                "logging already initialized with {field} `{active}`; refusing to switch to `{requested}`"
            ),
            Self::Backend(reason) => write!(f, "logger backend failed: {reason}"),
        }
    }
}

impl Error for LoggingError {}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `UnsupportedLevel` / `InvalidDirectory` for bad input.
/// - `Conflict` when logging is already active with another configuration.
/// - `Backend` when the directory or logger cannot be created.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), LoggingError> {
    let config = LogConfig::parse(level, log_dir)?;
    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(config.clone()))?;
    active.check_matches(&config)
}

/// Returns `(level, log_dir)` of the active logger, if any.
pub fn logging_status() -> Option<(&'static str, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.config.level, active.config.dir.clone()))
}

/// Writes buffered log lines to disk. No-op when logging is off.
pub fn flush_logging() {
    if let Some(active) = ACTIVE_LOGGER.get() {
        active.handle.flush();
    }
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

impl ActiveLogger {
    fn check_matches(&self, requested: &LogConfig) -> Result<(), LoggingError> {
        if self.config.dir != requested.dir {
            return Err(LoggingError::Conflict {
                field: "directory",
                active: self.config.dir.display().to_string(),
                requested: requested.dir.display().to_string(),
            });
        }
        if self.config.level != requested.level {
            return Err(LoggingError::Conflict {
                field: "level",
                active: self.config.level.to_string(),
                requested: requested.level.to_string(),
            });
        }
        Ok(())
    }
}

fn start_logger(config: LogConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&config.dir).map_err(|err| {
        LoggingError::Backend(format!("cannot create `{}`: {err}", config.dir.display()))
    })?;

    let handle = Logger::try_with_str(config.level)
        .map_err(|err| LoggingError::Backend(err.to_string()))?
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    install_panic_hook();
    info!(
        "event=app_start module=core status=ok platform={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        config.level
    );

    Ok(ActiveLogger { config, handle })
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic_captured module=core status=error location={} payload_chars={}",
            location,
            payload_chars(panic_info.payload())
        );
        flush_logging();
        previous(panic_info);
    }));
}

fn payload_chars(payload: &(dyn std::any::Any + Send)) -> usize {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.chars().count()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.chars().count()
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, payload_chars, LogConfig, LoggingError};
    use std::path::Path;

    #[test]
    fn parse_normalizes_level_case_and_aliases() {
        assert_eq!(LogConfig::parse(" INFO ", "/logs").expect("info").level, "info");
        assert_eq!(LogConfig::parse("Warning", "/logs").expect("warn").level, "warn");
        assert!(matches!(
            LogConfig::parse("verbose", "/logs"),
            Err(LoggingError::UnsupportedLevel(_))
        ));
    }

    #[test]
    fn parse_rejects_empty_and_relative_dirs() {
        assert!(LogConfig::parse("info", "  ").is_err());
        let err = LogConfig::parse("info", "logs/dev").expect_err("relative path");
        assert!(err.to_string().contains("not absolute"));
        let config = LogConfig::parse("info", " /var/log/quicknote ").expect("absolute");
        assert_eq!(config.dir, Path::new("/var/log/quicknote"));
    }

    #[test]
    fn payload_chars_counts_string_payloads_only() {
        assert_eq!(payload_chars(&"pässword"), 8);
        assert_eq!(payload_chars(&String::from("abc")), 3);
        assert_eq!(payload_chars(&42_u8), 0);
    }

    #[test]
    fn init_is_idempotent_and_rejects_conflicts() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let other = tempfile::tempdir().expect("create temp dir");
        let dir_str = dir.path().to_str().expect("utf-8 temp path");
        let other_str = other.path().to_str().expect("utf-8 temp path");

        init_logging("info", dir_str).expect("first init");
        init_logging("INFO", dir_str).expect("same config is a no-op");

        let level_err = init_logging("debug", dir_str).expect_err("level conflict");
        assert!(matches!(
            level_err,
            LoggingError::Conflict { field: "level", .. }
        ));
        let dir_err = init_logging("info", other_str).expect_err("dir conflict");
        assert!(matches!(
            dir_err,
            LoggingError::Conflict {
                field: "directory",
                ..
            }
        ));

        let (level, active_dir) = logging_status().expect("logging active");
        assert_eq!(level, "info");
        assert_eq!(active_dir, dir.path());
    }
}
