//! Tracing setup shared by the viewer and the CLI.
//
// Call `logging::init` once at startup and keep the returned guard alive
// until exit so buffered file output is flushed.

use std::fs;
use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

use crate::config::LoggingConfig;

const LOG_FILE_NAME: &str = "umlview.log";

#[must_use = "dropping the guard stops the file writer"]
#[derive(Debug)]
pub struct LogGuard(Option<WorkerGuard>);

impl LogGuard {
    pub fn writes_file(&self) -> bool {
        self.0.is_some()
    }
}

pub fn default_log_dir() -> Option<PathBuf> {
    crate::config::project_dirs().map(|dirs| dirs.data_dir().to_path_buf())
}

/// Installs the global subscriber: stderr always, plus `<data_dir>/umlview.log`
/// when `config.file` is set and the directory is usable.
///
/// `RUST_LOG` takes precedence over `config.level`. A second call is a no-op.
pub fn init(config: &LoggingConfig) -> LogGuard {
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(directives) if !directives.trim().is_empty() => EnvFilter::new(directives),
        _ => EnvFilter::new(&config.level),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    let mut file_error = None;
    let (file_layer, guard) = if config.file {
        match open_log_dir() {
            Ok(dir) => {
                let appender = tracing_appender::rolling::never(dir, LOG_FILE_NAME);
                let (writer, guard) = tracing_appender::non_blocking(appender);
                let layer = tracing_subscriber::fmt::layer()
                    .with_writer(writer)
                    .with_ansi(false)
                    .with_target(true)
                    .with_thread_names(true);
                (Some(layer), Some(guard))
            }
            Err(error) => {
                file_error = Some(error);
                (None, None)
            }
        }
    } else {
        (None, None)
    };

    let installed = tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .is_ok();

    if let Some(error) = file_error {
        tracing::warn!(%error, "file logging disabled");
    }
    if !installed {
        tracing::debug!("tracing subscriber already installed");
    }
    LogGuard(guard)
}

fn open_log_dir() -> std::io::Result<PathBuf> {
    let dir = default_log_dir().ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "no user data directory")
    })?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
