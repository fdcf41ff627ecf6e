use std::path::Path;

use anyhow::Result;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::SheetpressConfig;

const LOG_FILE_PREFIX: &str = "sheetpress";

/// Installs the global subscriber: compact stderr output, plus a daily log
/// file in `~/.sheetpress/logs/` when `config.file_logging` is set.
///
/// stdout stays reserved for the confirmation line. The returned guard (if
/// any) must be kept alive until the run ends so buffered lines are flushed.
pub fn init_logging(config: &SheetpressConfig) -> Result<Option<WorkerGuard>> {
    let logs_dir = if config.file_logging {
        Some(SheetpressConfig::logs_dir()?)
    } else {
        None
    };
    install_subscriber(&config.log_level, logs_dir.as_deref())
}

/// `RUST_LOG` wins over `fallback_filter`. A file layer is added only when
/// `logs_dir` is given.
fn install_subscriber(
    fallback_filter: &str,
    logs_dir: Option<&Path>,
) -> Result<Option<WorkerGuard>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback_filter));

    let (file_layer, guard) = match logs_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let file_appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(false)
                .with_writer(non_blocking);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    Ok(guard)
}
