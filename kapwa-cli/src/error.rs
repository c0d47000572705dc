//! Error handling for the CLI application

use std::fmt;

/// Typed failures the CLI reports to the user
#[derive(Debug)]
pub enum CliError {
    /// Glob pattern could not be parsed
    InvalidPattern(String),
    /// No input pattern matched a file
    NoInputFiles,
    /// Configuration file is unreadable or invalid
    ConfigError(String),
    /// Output could not be written
    OutputError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::NoInputFiles => write!(f, "No files found matching the provided inputs"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::OutputError(msg) => write!(f, "Output error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
