//! Tracing initialization and configuration.
//!
//! The subscriber is built once per process. Levels are fixed at that point;
//! nothing reconfigures logging afterwards.

use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use clap::ValueEnum;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

/// Environment variable overriding the console filter.
/// Format: `MICROANALYZER_LOG=microanalyzer=debug`
pub const LOG_ENV: &str = "MICROANALYZER_LOG";

/// Verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    /// Info on the console, debug in the log file.
    #[default]
    Default,
}

impl LogLevel {
    pub fn console_filter(self) -> LevelFilter {
        match self {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info | LogLevel::Default => LevelFilter::INFO,
            LogLevel::Warning => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }

    pub fn file_filter(self) -> LevelFilter {
        match self {
            LogLevel::Default => LevelFilter::DEBUG,
            other => other.console_filter(),
        }
    }
}

/// Initialize logging: stderr always, plus `log_file` when given.
///
/// Returns an error if a global subscriber is already installed or the log
/// file cannot be opened.
pub fn init(level: LogLevel, log_file: Option<&Path>) -> anyhow::Result<()> {
    let console_filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.console_filter().into()));
    let console = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(console_filter);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_writer(Mutex::new(file))
                    .with_ansi(false)
                    .with_filter(level.file_filter()),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(console)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to initialize logging: {}", e))
}
