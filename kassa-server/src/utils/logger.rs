//! Logging Infrastructure
//!
//! Console logging filtered by `RUST_LOG`, falling back to `LOG_LEVEL`. When
//! `LOG_DIR` names an existing directory, output goes to a daily rolling
//! file instead.
//!
//! The logger starts before [`Config`](crate::Config) is loaded so that
//! configuration warnings are recorded; its settings are read here.

use std::path::Path;

use tracing_subscriber::EnvFilter;

/// File name prefix of rolled log files
const LOG_FILE_PREFIX: &str = "kassa-server";

const DEFAULT_LOG_LEVEL: &str = "info";

/// Logger settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Filter used when `RUST_LOG` is unset
    pub level: String,
    pub dir: Option<String>,
}

impl LogSettings {
    /// Read `LOG_LEVEL` and `LOG_DIR`
    pub fn from_env() -> Self {
        Self::from_values(std::env::var("LOG_LEVEL").ok(), std::env::var("LOG_DIR").ok())
    }

    fn from_values(level: Option<String>, dir: Option<String>) -> Self {
        Self {
            level: level
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.into()),
            dir: dir.filter(|d| !d.trim().is_empty()),
        }
    }
}

impl Default for LogSettings {
    fn default() -> Self {
        Self::from_values(None, None)
    }
}

/// Initialize the global logger
pub fn init_logger(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false)
        .with_target(false);

    if let Some(dir) = &settings.dir {
        let log_path = Path::new(dir);
        if log_path.is_dir() {
            let file_appender = tracing_appender::rolling::daily(log_path, LOG_FILE_PREFIX);
            subscriber.with_ansi(false).with_writer(file_appender).init();
            return;
        }
    }

    subscriber.init();
}
