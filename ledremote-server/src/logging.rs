//! Logger setup.
//!
//! Logs go to the terminal, and additionally to a file when
//! `LEDREMOTE_LOG_FILE` is set.

use std::fs::File;
use std::str::FromStr;

use simplelog::ColorChoice;
use simplelog::CombinedLogger;
use simplelog::Config;
use simplelog::LevelFilter;
use simplelog::SharedLogger;
use simplelog::TermLogger;
use simplelog::TerminalMode;
use simplelog::WriteLogger;
use thiserror::Error;

const ENV_LOG_LEVEL: &str = "LEDREMOTE_LOG_LEVEL";
const ENV_LOG_FILE: &str = "LEDREMOTE_LOG_FILE";

/// Logger setup error type.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("invalid log level '{0}'")]
    InvalidLevel(String),
    #[error("failed to create log file {path}: {source}")]
    File {
        path: String,
        source: std::io::Error,
    },
    #[error("logger already installed: {0}")]
    Install(#[from] log::SetLoggerError),
}

/// Parses a level name, defaulting to `Info` when unset.
fn level(value: Option<String>) -> Result<LevelFilter, LoggingError> {
    match value {
        None => Ok(LevelFilter::Info),
        Some(value) => {
            LevelFilter::from_str(value.trim()).map_err(|_| LoggingError::InvalidLevel(value))
        }
    }
}

/// Installs the global logger.
pub fn init<F>(lookup: F) -> Result<(), LoggingError>
where
    F: Fn(&str) -> Option<String>,
{
    let level = level(lookup(ENV_LOG_LEVEL))?;

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];

    if let Some(path) = lookup(ENV_LOG_FILE) {
        let file = File::create(&path).map_err(|source| LoggingError::File {
            path: path.clone(),
            source,
        })?;
        loggers.push(WriteLogger::new(level, Config::default(), file));
    }

    CombinedLogger::init(loggers)?;
    Ok(())
}
