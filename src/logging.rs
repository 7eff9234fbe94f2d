//! Logging setup
//!
//! Fixture stdout is the payload a harness asserts on, so every log line
//! goes to stderr.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `--log-level` nor `RUST_LOG` is set
pub const DEFAULT_FILTER: &str = "warn";

/// Build the filter: explicit level first, then `RUST_LOG`, then the default.
pub fn build_filter(log_level: Option<&str>) -> Result<EnvFilter> {
    let filter = match log_level {
        Some(level) => EnvFilter::try_new(level)?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };
    Ok(filter)
}

/// Initialize the logging system
///
/// # Examples
/// ```no_run
/// use forkfix::logging::init_logger;
///
/// init_logger(None).unwrap();
/// ```
pub fn init_logger(log_level: Option<&str>) -> Result<()> {
    let env_filter = build_filter(log_level)?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal())
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    tracing::trace!("Logger initialized");
    Ok(())
}
