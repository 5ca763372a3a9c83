//! Rolling file logs for the catalogue core.
//!
//! # Responsibility
//! - Start the `flexi_logger` file backend once per process.
//! - Capture panics as a single sanitized log line.
//!
//! # Invariants
//! - Repeating init with the same level and directory is a no-op; any other
//!   level or directory is rejected once a logger runs.
//! - Init never panics; failures come back as `Err(String)`.
//!
//! # Event format
//! - One line per event: `event=<name> module=<module> status=<status> ...`.
//! - Values are metadata (names, flags, ids), never request payloads.

use crate::config::{ConfigKey, ConfigStore};
use flexi_logger::{
    Cleanup, Criterion, FileSpec, LogSpecBuilder, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{error, info, LevelFilter};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::path::{Path, PathBuf};
use std::sync::Once;

const LOG_FILE_BASENAME: &str = "galavisor";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;
const PANIC_LINE_MAX_CHARS: usize = 160;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: Once = Once::new();

struct ActiveLogger {
    level: LevelFilter,
    log_dir: PathBuf,
    _handle: LoggerHandle,
}

impl ActiveLogger {
    fn start(level: LevelFilter, log_dir: &Path) -> Result<Self, String> {
        std::fs::create_dir_all(log_dir).map_err(|err| {
            format!("cannot create log directory `{}`: {err}", log_dir.display())
        })?;

        let handle = Logger::with(LogSpecBuilder::new().default(level).build())
            .log_to_file(
                FileSpec::default()
                    .directory(log_dir)
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
            .map_err(|err| format!("cannot start file logger: {err}"))?;

        Ok(Self {
            level,
            log_dir: log_dir.to_path_buf(),
            _handle: handle,
        })
    }

    fn accepts(&self, level: LevelFilter, log_dir: &Path) -> Result<(), String> {
        if self.level == level && self.log_dir == log_dir {
            return Ok(());
        }
        Err(format!(
            "logging already runs at {} in `{}`; refusing to switch to {} in `{}`",
            self.level,
            self.log_dir.display(),
            level,
            log_dir.display()
        ))
    }
}

/// Starts file logging at `level` under the absolute directory `log_dir`.
///
/// # Errors
/// - `level` is not one of trace, debug, info, warn, error.
/// - `log_dir` is blank, relative, or cannot be created.
/// - A logger already runs with a different level or directory.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let level = parse_level(level)?;
    let log_dir = parse_log_dir(log_dir)?;

    let active = ACTIVE_LOGGER.get_or_try_init(|| -> Result<ActiveLogger, String> {
        let logger = ActiveLogger::start(level, &log_dir)?;
        PANIC_HOOK.call_once(install_panic_hook);
        info!(
            "event=logging_init module=core status=ok level={} log_dir={} version={} debug_build={}",
            level,
            log_dir.display(),
            env!("CARGO_PKG_VERSION"),
            cfg!(debug_assertions)
        );
        Ok(logger)
    })?;

    active.accepts(level, &log_dir)
}

/// Starts logging from the `LogLevel` and `LogDir` config keys.
///
/// Returns `Ok(false)` without touching the logger when `LogDir` is unset.
pub fn init_logging_from_config(config: &ConfigStore) -> Result<bool, String> {
    if !config.exists(ConfigKey::LogDir) {
        return Ok(false);
    }
    init_logging(
        config.get_or(ConfigKey::LogLevel, default_log_level()),
        config.get_or(ConfigKey::LogDir, ""),
    )?;
    Ok(true)
}

/// Level and directory of the running logger, if any.
pub fn logging_status() -> Option<(LevelFilter, PathBuf)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` in debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    let level = level.trim();
    let parsed = if level.eq_ignore_ascii_case("warning") {
        Ok(LevelFilter::Warn)
    } else {
        level.parse::<LevelFilter>()
    };
    match parsed {
        Ok(LevelFilter::Off) | Err(_) => Err(format!(
            "unsupported log level `{level}`; expected trace|debug|info|warn|error"
        )),
        Ok(filter) => Ok(filter),
    }
}

fn parse_log_dir(log_dir: &str) -> Result<PathBuf, String> {
    let path = Path::new(log_dir.trim());
    if path.as_os_str().is_empty() {
        return Err("log directory cannot be empty".to_string());
    }
    if path.is_relative() {
        return Err(format!(
            "log directory must be absolute, got `{}`",
            path.display()
        ));
    }
    Ok(path.to_path_buf())
}

fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        // Payload may carry activity or subject names.
        let message = panic_message(info.payload()).unwrap_or("non-string panic payload");
        let location = info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        error!(
            "event=panic module=core status=error location={location} payload={}",
            single_line(message, PANIC_LINE_MAX_CHARS)
        );
        previous(info);
    }));
}

fn panic_message(payload: &(dyn Any + Send)) -> Option<&str> {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return Some(*message);
    }
    payload.downcast_ref::<String>().map(String::as_str)
}

/// Flattens control characters and caps the length at `max_chars`.
fn single_line(value: &str, max_chars: usize) -> String {
    let mut line = value
        .chars()
        .take(max_chars)
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect::<String>();
    if value.chars().nth(max_chars).is_some() {
        line.push_str("...");
    }
    line
}
