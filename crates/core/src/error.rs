//! Coded errors shared by every foodsearch crate
//!
//! Codes are grouped in families of a thousand; the CLI maps each family to
//! an exit code through [`exit_codes::for_code`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // General errors (1xxx)
    /// An operation ran out of time
    Timeout = 1003,

    // IO errors (2xxx)
    /// Unclassified IO failure
    IoError = 2000,
    /// A file does not exist
    FileNotFound = 2001,
    /// A file exists but cannot be read
    PermissionDenied = 2002,

    // Configuration errors (3xxx)
    /// Unclassified configuration problem
    ConfigError = 3000,
    /// An explicitly requested config file is missing
    ConfigNotFound = 3001,
    /// The config file is not valid TOML for the schema
    ConfigParseError = 3002,
    /// A config value failed validation
    ConfigValidationError = 3003,
    /// A value derived from config or environment is unusable
    InvalidConfigValue = 3004,

    // Upstream source errors (4xxx)
    /// The upstream could not be reached
    SourceUnavailable = 4001,
    /// The upstream answered with an error status
    UpstreamRejected = 4002,
    /// The local request budget is exhausted
    RateLimited = 4003,
    /// The circuit breaker is refusing calls
    CircuitOpen = 4004,

    // Data errors (5xxx)
    /// A record or response body could not be decoded
    MalformedRecord = 5001,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Get a human-readable category
    pub fn category(&self) -> &'static str {
        match self.code() / 1000 {
            1 => "General",
            2 => "IO",
            3 => "Configuration",
            4 => "Source",
            5 => "Data",
            _ => "Unknown",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

/// Main error type with rich context
#[derive(Error, Debug)]
pub struct Error {
    /// Error code for programmatic handling
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional context
    pub context: Option<String>,
    /// Recovery suggestion
    pub suggestion: Option<String>,
    /// Source error
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ctx) = &self.context {
            write!(f, "\n  Context: {ctx}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n  Suggestion: {suggestion}")?;
        }
        Ok(())
    }
}

impl Error {
    /// Create a new error
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            context: None,
            suggestion: None,
            source: None,
        }
    }

    /// Add context to the error
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Add a recovery suggestion
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add a source error
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Configuration problem without a more specific code
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// Explicitly requested configuration file is missing
    pub fn config_not_found(path: impl AsRef<std::path::Path>) -> Self {
        Self::new(
            ErrorCode::ConfigNotFound,
            format!("Configuration file not found: {}", path.as_ref().display()),
        )
        .with_suggestion("Create a .foodsearch.toml file or pass --config to specify a path")
    }

    /// A configuration value failed validation
    pub fn config_invalid(field: &str, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ConfigValidationError,
            format!("Invalid value for `{field}`: {}", reason.into()),
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Exit codes for CLI commands
pub mod exit_codes {
    /// Anything without a dedicated code
    pub const FAILURE: u8 = 1;
    /// Configuration could not be loaded or is invalid
    pub const CONFIG_ERROR: u8 = 3;
    /// An upstream source failed
    pub const SOURCE_ERROR: u8 = 4;
    /// Data could not be decoded
    pub const DATA_ERROR: u8 = 5;

    /// Map an error code family to a process exit code.
    pub fn for_code(code: super::ErrorCode) -> u8 {
        match code.code() / 1000 {
            3 => CONFIG_ERROR,
            4 => SOURCE_ERROR,
            5 => DATA_ERROR,
            _ => FAILURE,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::PermissionDenied,
            _ => ErrorCode::IoError,
        };
        Error::new(code, err.to_string()).with_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::new(ErrorCode::MalformedRecord, format!("JSON parse error: {err}")).with_source(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::new(ErrorCode::ConfigParseError, format!("TOML parse error: {err}"))
            .with_source(err)
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Attach context to the error, if any
    fn context(self, context: impl Into<String>) -> Result<T>;
    /// Attach a recovery suggestion to the error, if any
    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_suggestion(self, suggestion: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_suggestion(suggestion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::FileNotFound.to_string(), "E2001");
        assert_eq!(ErrorCode::SourceUnavailable.to_string(), "E4001");
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::IoError.category(), "IO");
        assert_eq!(ErrorCode::RateLimited.category(), "Source");
        assert_eq!(ErrorCode::MalformedRecord.category(), "Data");
    }

    #[test]
    fn test_display_includes_context_and_suggestion() {
        let err = Error::config_not_found("/etc/foodsearch.toml").with_context("Loading --config");
        let rendered = err.to_string();

        assert!(rendered.starts_with("[E3001] Configuration file not found"));
        assert!(rendered.contains("Context: Loading --config"));
        assert!(rendered.contains("Suggestion:"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "foods.json");
        let err: Error = io.into();
        assert_eq!(err.code, ErrorCode::FileNotFound);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(exit_codes::for_code(ErrorCode::ConfigParseError), exit_codes::CONFIG_ERROR);
        assert_eq!(exit_codes::for_code(ErrorCode::CircuitOpen), exit_codes::SOURCE_ERROR);
        assert_eq!(exit_codes::for_code(ErrorCode::MalformedRecord), exit_codes::DATA_ERROR);
        assert_eq!(exit_codes::for_code(ErrorCode::Timeout), exit_codes::FAILURE);
    }

    #[test]
    fn test_result_ext_context() {
        let result: Result<()> = Err(Error::config("bad value"));
        let err = result.context("reading [external]").unwrap_err();
        assert_eq!(err.context.as_deref(), Some("reading [external]"));
    }
}
