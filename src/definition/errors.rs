//! Definition error types
//!
//! Every error in this crate signals a caller programming error, not a
//! transient condition: there is no retry path and no internal recovery.
//! Each error classifies into one of two kinds via `kind()`.

use std::fmt;

use thiserror::Error;

/// Result type for definition operations
pub type DefinitionResult<T> = Result<T, DefinitionError>;

/// The two classes of failure a caller can provoke
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The supplied input shape is unusable
    InvalidArgument,
    /// An operation was invoked outside its documented precondition
    PreconditionViolation,
}

impl ErrorKind {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ErrorKind::PreconditionViolation => "PRECONDITION_VIOLATION",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition errors
#[derive(Debug, Clone, Error)]
pub enum DefinitionError {
    #[error("field definition must be a JSON object, got {actual}")]
    NotAnObject {
        /// JSON type of the rejected value
        actual: &'static str,
    },
}

impl DefinitionError {
    /// Classifies this error into one of the two failure kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            DefinitionError::NotAnObject { .. } => ErrorKind::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings() {
        assert_eq!(ErrorKind::InvalidArgument.as_str(), "INVALID_ARGUMENT");
        assert_eq!(
            ErrorKind::PreconditionViolation.as_str(),
            "PRECONDITION_VIOLATION"
        );
    }

    #[test]
    fn test_not_an_object_is_invalid_argument() {
        let err = DefinitionError::NotAnObject { actual: "string" };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(err.to_string().contains("string"));
    }
}
