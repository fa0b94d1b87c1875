//! Structured Logger
//!
//! Wraps `tracing` with a console layer and, when a log directory is given,
//! a daily-rolling NDJSON file layer. `RUST_LOG` overrides the level.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix for rolled log files (`parley.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "parley.log";

/// Initialize the global structured logger.
///
/// Safe to call more than once; later calls leave the first subscriber in place.
pub fn init_logger(log_dir: Option<&Path>, level: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let file_layer = log_dir.map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer().json().with_writer(appender).with_ansi(false)
    });

    // Console goes to stderr so CLI responses on stdout stay clean.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
