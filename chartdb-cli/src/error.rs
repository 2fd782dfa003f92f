//! CLI error types.

use std::fmt;

use chartdb::client::ChartError;
use chartdb::config::ConfigError;

/// Errors surfaced to the terminal.
#[derive(Debug)]
pub enum CliError {
    /// A chart operation failed.
    Chart(ChartError),

    /// The configuration file could not be loaded.
    Config(ConfigError),

    /// Local file I/O failed (chart XML, image files).
    Io(std::io::Error),

    /// Output rendering failed.
    Output(String),

    /// Secure transport is unavailable on this platform.
    SslMissing,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Chart(e) => write!(f, "{}", e),
            CliError::Config(e) => write!(f, "configuration error: {}", e),
            CliError::Io(e) => write!(f, "{}", e),
            CliError::Output(msg) => write!(f, "failed to render output: {}", msg),
            CliError::SslMissing => write!(
                f,
                "secure transport is unavailable on this platform; chart operations are disabled"
            ),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Chart(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::Io(e) => Some(e),
            CliError::Output(_) => None,
            CliError::SslMissing => None,
        }
    }
}

impl From<ChartError> for CliError {
    fn from(e: ChartError) -> Self {
        CliError::Chart(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e)
    }
}
