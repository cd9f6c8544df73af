//! Logging for PulseWatch.
//!
//! One registry feeds two sinks:
//!
//! - `<log dir>/pulsewatch.log.<date>`: JSON lines, PulseWatch events at
//!   info (debug when verbose), other crates at warn. `RUST_LOG` replaces
//!   this filter when set.
//! - stderr: compact lines, warnings only unless verbose, so JSON printed
//!   on stdout stays clean.
//!
//! Alert and rule lifecycle events go to [`ALERT_TARGET`] through
//! [`log_alert_event!`] and [`log_rule_event!`].
//!
//! ```no_run
//! use pulsewatch_core::logging;
//!
//! let guard = logging::init_logging(None, false).expect("logging init");
//! tracing::info!(log_dir = %guard.log_dir().display(), "PulseWatch started");
//! pulsewatch_core::log_alert_event!("alert-1", "snoozed", hours = 2u32);
//! ```

use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    EnvFilter, Layer, filter::LevelFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::error::{PulseError, Result};

/// Target for alert and rule lifecycle events.
pub const ALERT_TARGET: &str = "pulsewatch::alerts";

const LOG_FILE_PREFIX: &str = "pulsewatch.log";

/// Keeps the background file writer running. Dropping it flushes pending lines.
pub struct LogGuard {
    dir: PathBuf,
    _worker: WorkerGuard,
}

impl LogGuard {
    pub fn log_dir(&self) -> &Path {
        &self.dir
    }
}

/// Install the file and console sinks.
///
/// `log_dir` defaults to [`default_log_dir`]. Fails if a global subscriber
/// is already set.
pub fn init_logging(log_dir: Option<PathBuf>, verbose: bool) -> Result<LogGuard> {
    let dir = log_dir.map_or_else(default_log_dir, Ok)?;
    std::fs::create_dir_all(&dir).map_err(|source| PulseError::DirectoryCreation {
        path: dir.clone(),
        source,
    })?;

    let appender = tracing_appender::rolling::daily(&dir, LOG_FILE_PREFIX);
    let (writer, worker) = tracing_appender::non_blocking(appender);

    let file_layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(false)
        .json()
        .with_current_span(true)
        .with_filter(file_filter(verbose));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .compact()
        .with_filter(console_level(verbose));

    tracing_subscriber::registry()
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| PulseError::internal(format!("logging already initialized: {e}")))?;

    tracing::debug!(log_dir = %dir.display(), verbose, "logging initialized");
    Ok(LogGuard {
        dir,
        _worker: worker,
    })
}

fn file_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)))
}

fn default_directives(verbose: bool) -> String {
    let level = if verbose { "debug" } else { "info" };
    format!("warn,pulsewatch={level}")
}

fn console_level(verbose: bool) -> LevelFilter {
    if verbose { LevelFilter::DEBUG } else { LevelFilter::WARN }
}

/// Console logging for tests. Safe to call from every test.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(default_directives(true)))
        .with_test_writer()
        .try_init();
}

/// `~/.pulsewatch/logs`
pub fn default_log_dir() -> Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| PulseError::internal("could not determine home directory"))?;
    Ok(home.join(".pulsewatch").join("logs"))
}

/// Log an alert lifecycle event under [`ALERT_TARGET`].
///
/// ```ignore
/// log_alert_event!("alert-3", "snoozed", hours = 2);
/// ```
#[macro_export]
macro_rules! log_alert_event {
    ($alert_id:expr, $event:expr) => {
        tracing::info!(
            target: $crate::logging::ALERT_TARGET,
            alert_id = %$alert_id,
            event = $event,
            "alert event"
        )
    };
    ($alert_id:expr, $event:expr, $($field:tt)*) => {
        tracing::info!(
            target: $crate::logging::ALERT_TARGET,
            alert_id = %$alert_id,
            event = $event,
            $($field)*,
            "alert event"
        )
    };
}

/// Log a rule configuration change under [`ALERT_TARGET`].
#[macro_export]
macro_rules! log_rule_event {
    ($rule_id:expr, $event:expr) => {
        tracing::info!(
            target: $crate::logging::ALERT_TARGET,
            rule_id = %$rule_id,
            event = $event,
            "rule event"
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_log_dir() {
        // SAFETY: only test in this crate touching HOME
        unsafe { std::env::set_var("HOME", "/tmp/test-home") };
        let dir = default_log_dir().unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/test-home/.pulsewatch/logs"));
    }

    #[test]
    fn test_console_quiet_unless_verbose() {
        assert_eq!(console_level(false), LevelFilter::WARN);
        assert_eq!(console_level(true), LevelFilter::DEBUG);
    }

    #[test]
    fn test_default_directives() {
        assert_eq!(default_directives(false), "warn,pulsewatch=info");
        assert_eq!(default_directives(true), "warn,pulsewatch=debug");
    }

    #[test]
    fn test_log_macros_expand() {
        init_test_logging();
        init_test_logging();
        log_alert_event!("alert-1", "raised");
        log_alert_event!("alert-1", "snoozed", hours = 2u32);
        log_rule_event!("rule-1", "disabled");
    }
}
