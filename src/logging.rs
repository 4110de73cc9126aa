//! Tracing subscriber setup.
//!
//! Filter precedence: `CHAT_RESUME_LOG_FILTER`, then `RUST_LOG`, then `debug` when
//! `CHAT_RESUME_DEBUG=1`, otherwise `info`. Output goes to stderr unless
//! `CHAT_RESUME_LOG` names a file, which is opened in append mode.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

use crate::config::EnvConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {path}: {source}")]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter '{directive}': {source}")]
    InvalidFilter {
        directive: String,
        #[source]
        source: ParseError,
    },
}

/// Builds the filter for `config` without installing anything.
pub fn env_filter(config: &EnvConfig) -> Result<EnvFilter, LoggingError> {
    if let Some(directive) = &config.log_filter {
        return EnvFilter::try_new(directive).map_err(|source| LoggingError::InvalidFilter {
            directive: directive.clone(),
            source,
        });
    }

    let fallback = if config.debug { "debug" } else { "info" };
    Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
}

/// Installs the global subscriber. A subscriber that is already installed wins.
pub fn init_logging(config: &EnvConfig) -> Result<(), LoggingError> {
    let filter = env_filter(config)?;

    match &config.log_path {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| LoggingError::OpenLogFile {
                    path: PathBuf::from(path),
                    source,
                })?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .try_init()
                .ok();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(true)
                .compact()
                .try_init()
                .ok();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{env_filter, init_logging, LoggingError};
    use crate::config::EnvConfig;

    #[test]
    fn explicit_filter_is_validated() {
        let config = EnvConfig {
            log_filter: Some("chat_resume=loud".to_string()),
            ..EnvConfig::default()
        };

        let error = env_filter(&config).expect_err("malformed directive must fail");
        assert!(matches!(error, LoggingError::InvalidFilter { .. }));
    }

    #[test]
    fn explicit_filter_is_used_verbatim() {
        let config = EnvConfig {
            log_filter: Some("chat_resume=trace".to_string()),
            ..EnvConfig::default()
        };

        let filter = env_filter(&config).expect("valid directive should parse");
        let rendered = filter.to_string();
        assert!(rendered.contains("chat_resume"));
        assert!(rendered.contains("trace"));
    }

    #[test]
    fn unopenable_log_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir should be created");
        let config = EnvConfig {
            log_path: Some(dir.path().join("missing").join("run.log").display().to_string()),
            log_filter: Some("info".to_string()),
            ..EnvConfig::default()
        };

        let error = init_logging(&config).expect_err("missing parent dir must fail");
        assert!(matches!(error, LoggingError::OpenLogFile { .. }));
    }
}
