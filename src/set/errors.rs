//! Field set error types

use thiserror::Error;

use crate::definition::{DefinitionError, ErrorKind};

/// Result type for field set operations
pub type SetResult<T> = Result<T, SetError>;

/// Field set errors
#[derive(Debug, Clone, Error)]
pub enum SetError {
    #[error("field input must be a JSON object or array, got {actual}")]
    InvalidInput {
        /// JSON type of the rejected value
        actual: &'static str,
    },

    #[error("no field named '{anchor}' in the collection")]
    AnchorNotFound {
        /// Name the insertion point referred to
        anchor: String,
    },

    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

impl SetError {
    /// Classifies this error into one of the two failure kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            SetError::InvalidInput { .. } => ErrorKind::InvalidArgument,
            SetError::AnchorNotFound { .. } => ErrorKind::PreconditionViolation,
            SetError::Definition(err) => err.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let invalid = SetError::InvalidInput { actual: "number" };
        assert_eq!(invalid.kind(), ErrorKind::InvalidArgument);

        let missing = SetError::AnchorNotFound {
            anchor: "ghost".to_string(),
        };
        assert_eq!(missing.kind(), ErrorKind::PreconditionViolation);
        assert!(missing.to_string().contains("ghost"));

        let wrapped = SetError::Definition(DefinitionError::NotAnObject { actual: "array" });
        assert_eq!(wrapped.kind(), ErrorKind::InvalidArgument);
    }
}
