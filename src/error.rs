//! Error handling module for srch
//!
//! Provides the error taxonomy shared by every component. Recoverable cache
//! conditions never reach this type; see `engine::store::LoadOutcome`.

use thiserror::Error;

/// Main error type for srch
#[derive(Error, Debug)]
pub enum SrchError {
    /// IO errors (cache writes, unreadable files, pipes)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration errors (missing file, missing `bangs`, bad command line)
    #[error("Configuration error: {0}")]
    Config(String),

    /// External program errors (menu or browser could not be run)
    #[error("Process error: {0}")]
    Process(String),

    /// A selection that is not one of the configured engines
    #[error("Unknown engine: {0:?}")]
    UnknownEngine(String),

    /// The platform has no per-user configuration directory
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,

    /// The platform has no per-user cache directory
    #[error("Could not determine the user cache directory")]
    NoCacheDir,
}

/// Result type alias for srch operations
pub type Result<T> = std::result::Result<T, SrchError>;

impl SrchError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a process error
    pub fn process(msg: impl Into<String>) -> Self {
        Self::Process(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SrchError::config("missing \"bangs\"");
        assert_eq!(err.to_string(), "Configuration error: missing \"bangs\"");

        let err = SrchError::UnknownEngine("yt".to_string());
        assert_eq!(err.to_string(), "Unknown engine: \"yt\"");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SrchError = io_err.into();
        assert!(matches!(err, SrchError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: SrchError = json_err.into();
        assert!(matches!(err, SrchError::Json(_)));
    }

    #[test]
    fn test_error_constructors() {
        assert!(matches!(SrchError::process("dmenu"), SrchError::Process(_)));
        assert!(matches!(SrchError::config("bad"), SrchError::Config(_)));
    }
}
