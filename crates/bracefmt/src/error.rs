//! Error types for formatting.
//!
//! Every failure of a format call is reported as a single [`FormatError`]. The
//! first failure aborts evaluation of the rest of the message.

use std::io;

/// Errors that can occur while formatting a message.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A named or hex color was not recognized.
    #[error("color is not supported: {0}")]
    UnsupportedColor(String),

    /// A transform (`bright`, `background`, `foreground`, `off`) was applied to
    /// a value outside its domain.
    #[error("{0}")]
    InvalidTransformInput(String),

    /// The message could not be parsed or evaluated.
    #[error("template: {0}")]
    Expression(String),

    /// The output sink rejected a write.
    #[error("write error: {0}")]
    Write(#[from] io::Error),
}

impl FormatError {
    /// Create an expression error.
    pub fn expression(msg: impl Into<String>) -> Self {
        Self::Expression(msg.into())
    }

    /// Create a transform error.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::InvalidTransformInput(msg.into())
    }
}

/// Result type for formatting operations.
pub type Result<T> = std::result::Result<T, FormatError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormatError::UnsupportedColor("foo".to_string());
        assert!(err.to_string().contains("not supported"));
        assert!(err.to_string().contains("foo"));

        let err = FormatError::transform("bright can be used only with colors");
        assert_eq!(err.to_string(), "bright can be used only with colors");
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::BrokenPipe, "closed");
        let err: FormatError = io_err.into();
        assert!(matches!(err, FormatError::Write(_)));
    }
}
