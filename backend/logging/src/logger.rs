//! Structured Logger
//!
//! Wraps `tracing` with a console layer, an optional daily-rolling JSON
//! file layer, and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name prefix for rolled log files (`ocrflow.log.YYYY-MM-DD`).
pub const LOG_FILE_PREFIX: &str = "ocrflow.log";

/// Initialize the global structured logger.
///
/// `RUST_LOG` takes precedence over `level`. Console output goes to stderr
/// so that stdout stays free for sink output.
pub fn init_logger(level: &str, log_dir: Option<&Path>) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    let file_layer = log_dir.map(|dir| {
        let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_ansi(false)
    });

    // Option<Layer> is itself a layer; None disables file output.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
