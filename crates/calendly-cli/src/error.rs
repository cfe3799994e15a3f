//! CLI error types.

use std::fmt;

use calendly_api::CalendlyError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur while running a `calendly` command.
#[derive(Debug)]
pub enum CliError {
    /// Configuration file or secret reference problem.
    Config(String),
    /// The Calendly API (or OAuth2 endpoint) returned an error.
    Api(CalendlyError),
    /// IO error.
    Io(std::io::Error),
    /// Invalid combination of command-line arguments.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(msg) => write!(f, "configuration error: {}", msg),
            Self::Api(err) => write!(f, "{}", err),
            Self::Io(err) => write!(f, "IO error: {}", err),
            Self::Usage(msg) => write!(f, "usage: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(err) => Some(err),
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<CalendlyError> for CliError {
    fn from(err: CalendlyError) -> Self {
        Self::Api(err)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Io(err.into())
    }
}
