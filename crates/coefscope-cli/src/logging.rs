//! Log output of the `coefscope` binary.
//!
//! The engine reports through its [`Logger`] trait; [`TracingLogger`]
//! forwards those messages to `tracing`, whose subscriber is installed once
//! by [`LoggingArg::init`].

use std::{
    fmt,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::Context as _;
use chrono::{DateTime, Local};
use clap::ArgAction;
use coefscope_engine::Logger;
use tracing_subscriber::{EnvFilter, fmt as log_fmt, prelude::*};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct LoggingArg {
    /// Minimum log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
    /// Log at debug level regardless of --log-level
    #[arg(long, global = true, env = "DEBUG_MODE")]
    debug: bool,
    /// Do not write log messages to stderr
    #[arg(
        long = "no-console-log",
        global = true,
        env = "CONSOLE_LOGGING",
        action = ArgAction::SetFalse
    )]
    console_log: bool,
    /// Also write log messages to a timestamped file
    #[arg(long, global = true, env = "FILE_LOGGING")]
    file_log: bool,
    /// Directory for log files
    #[arg(long, global = true, default_value = "logs")]
    log_dir: PathBuf,
    /// Disable logging entirely
    #[arg(
        long = "no-log",
        global = true,
        env = "LOGGING_ENABLED",
        action = ArgAction::SetFalse
    )]
    logging_enabled: bool,
}

impl LoggingArg {
    fn level(&self) -> &str {
        if self.debug { "debug" } else { &self.log_level }
    }

    /// Installs the global subscriber.
    ///
    /// `console` is `false` when stderr output would corrupt the terminal UI.
    /// Returns the path of the log file, if one was opened.
    pub(crate) fn init(&self, console: bool) -> anyhow::Result<Option<PathBuf>> {
        if !self.logging_enabled {
            return Ok(None);
        }

        let level = self.level();
        let filter =
            EnvFilter::try_new(level).with_context(|| format!("invalid log level '{level}'"))?;

        let console_layer = (console && self.console_log).then(|| {
            log_fmt::layer()
                .with_writer(io::stderr)
                .with_target(false)
        });

        let (file_layer, log_path) = if self.file_log {
            let path = self.log_dir.join(log_file_name(Local::now()));
            let file = create_log_file(&path)?;
            let layer = log_fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false);
            (Some(layer), Some(path))
        } else {
            (None, None)
        };

        tracing_subscriber::registry()
            .with(filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .context("failed to install the log subscriber")?;

        if let Some(path) = &log_path {
            tracing::debug!("writing log file {}", path.display());
        }
        Ok(log_path)
    }
}

fn create_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create log directory {}", dir.display()))?;
    }
    File::create(path).with_context(|| format!("failed to create log file {}", path.display()))
}

fn log_file_name(now: DateTime<Local>) -> String {
    format!("coefscope_{}.log", now.format("%Y%m%d_%H%M%S"))
}

/// Forwards engine messages to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, msg: fmt::Arguments<'_>) {
        tracing::info!("{msg}");
    }

    fn debug(&self, msg: fmt::Arguments<'_>) {
        tracing::debug!("{msg}");
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use clap::Parser;

    use super::*;

    #[derive(Debug, Parser)]
    struct Cli {
        #[clap(flatten)]
        logging: LoggingArg,
    }

    #[test]
    fn test_log_file_name_uses_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(log_file_name(now), "coefscope_20240309_070501.log");
    }

    #[test]
    fn test_default_logging_flags() {
        let cli = Cli::try_parse_from(["coefscope"]).unwrap();
        assert!(cli.logging.logging_enabled);
        assert!(cli.logging.console_log);
        assert!(!cli.logging.file_log);
        assert_eq!(cli.logging.level(), "info");
    }

    #[test]
    fn test_debug_overrides_level() {
        let cli =
            Cli::try_parse_from(["coefscope", "--log-level", "warn", "--debug"]).unwrap();
        assert_eq!(cli.logging.level(), "debug");
    }

    #[test]
    fn test_negative_flags_disable_outputs() {
        let cli = Cli::try_parse_from(["coefscope", "--no-console-log", "--no-log"]).unwrap();
        assert!(!cli.logging.console_log);
        assert!(!cli.logging.logging_enabled);
    }

    #[test]
    fn test_disabled_logging_installs_nothing() {
        let cli = Cli::try_parse_from(["coefscope", "--no-log", "--file-log"]).unwrap();
        assert_eq!(cli.logging.init(true).unwrap(), None);
    }
}
