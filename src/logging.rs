use std::fs::File;
use std::sync::Arc;

use tracing::Level;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::FmtSubscriber;

use crate::config::MergerConfig;
use crate::error::MergerError;

/// Parse a severity name from configuration. Accepts the legacy
/// `warning`/`critical` spellings alongside tracing's own names.
pub(crate) fn parse_level(name: &str) -> Result<Level, MergerError> {
    match name.to_ascii_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" | "critical" => Ok(Level::ERROR),
        other => Err(MergerError::config(format!("unknown log level {other:?}"))),
    }
}

/// Install the global subscriber for a merge run: a stderr layer at the
/// configured console level (overridable via `RUST_LOG`) plus, when
/// enabled, a plain-text layer appending to this run's logfile.
///
/// Called once, before any merge work; the logfile directory is created
/// on demand and failure to open the logfile is fatal.
pub fn init_logging(config: &MergerConfig, verbose: bool) -> Result<(), MergerError> {
    let console_level = if verbose {
        Level::DEBUG
    } else {
        parse_level(&config.console_level)?
    };
    let console_filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    if config.enable_logfile {
        let logfile_level = parse_level(&config.logfile_level)?;
        std::fs::create_dir_all(&config.logfile_dir).map_err(|e| {
            MergerError::io(
                format!("creating log directory {}", config.logfile_dir.display()),
                e,
            )
        })?;
        let path = config.logfile_path();
        let file = File::options()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|e| MergerError::io(format!("opening logfile {}", path.display()), e))?;
        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_writer(Arc::new(file))
            .with_filter(tracing_subscriber::filter::LevelFilter::from_level(
                logfile_level,
            ));
        tracing_subscriber::registry()
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(console_layer)
            .try_init()
            .ok();
    }
    Ok(())
}

/// Console-only logging for commands that do not take a config file.
pub fn init_console_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}
