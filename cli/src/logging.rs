//! Subscriber setup: console plus optional `app.log` / `error.log` /
//! `access.log` sinks under `logging.directory`.

use std::path::Path;

use lti_grade_core::api::LoggingConfig;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::{filter_fn, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::error::CliError;

/// Target of the per-request access log.
pub const ACCESS_TARGET: &str = "lti_grade::access";

/// Flushes the file writers on drop; keep alive for the whole process.
#[must_use]
pub struct LogGuards {
    _guards: Vec<WorkerGuard>,
}

pub fn init_logging(cfg: &LoggingConfig) -> Result<LogGuards, CliError> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cfg.level))
        .map_err(|e| CliError::Logging(format!("invalid log level {:?}: {e}", cfg.level)))?;

    let mut guards = Vec::new();

    let console = cfg.console.then(|| fmt::layer().with_target(true));

    let files = if cfg.file {
        let dir = Path::new(&cfg.directory);
        prepare_log_dir(dir)?;

        let (app_writer, app_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "app.log"));
        let (error_writer, error_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "error.log"));
        let (access_writer, access_guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::never(dir, "access.log"));
        guards.extend([app_guard, error_guard, access_guard]);

        Some((
            fmt::layer().with_ansi(false).with_writer(app_writer),
            fmt::layer()
                .with_ansi(false)
                .with_writer(error_writer)
                .with_filter(LevelFilter::ERROR),
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(access_writer)
                .with_filter(filter_fn(|meta| meta.target() == ACCESS_TARGET)),
        ))
    } else {
        None
    };
    let (app_layer, error_layer, access_layer) = match files {
        Some((a, e, x)) => (Some(a), Some(e), Some(x)),
        None => (None, None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(app_layer)
        .with(error_layer)
        .with(access_layer)
        .try_init()
        .map_err(|e| CliError::Logging(e.to_string()))?;

    if cfg.file {
        tracing::info!(directory = %cfg.directory, "file logging enabled");
    }
    Ok(LogGuards { _guards: guards })
}

fn prepare_log_dir(dir: &Path) -> Result<(), CliError> {
    std::fs::create_dir_all(dir)
        .map_err(|e| CliError::Logging(format!("cannot create {}: {e}", dir.display())))
}
