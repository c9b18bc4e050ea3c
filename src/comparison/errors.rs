//! Comparison builder error types
//!
//! Error codes:
//! - MEDIA_QUERY_INVALID_IDENTIFIER
//! - MEDIA_QUERY_INVALID_OPERATOR
//! - MEDIA_QUERY_UNSUPPORTED_VALUE_TYPE
//!
//! All of these are raised at construction time, before anything is sent
//! to the store.

use thiserror::Error;

/// Result type for comparison construction
pub type ComparisonResult<T> = Result<T, ComparisonError>;

/// Errors raised while building a comparison clause
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComparisonError {
    /// Identifier does not match `^[A-Za-z][A-Za-z0-9_-]*$`
    #[error("Invalid identifier `{0}`")]
    InvalidIdentifier(String),

    /// Operator is not in the allowed set
    #[error("Comparison operator `{operator}` does not match `({allowed})`")]
    InvalidOperator { operator: String, allowed: String },

    /// Value is not a scalar (array or object)
    #[error("Comparison of non-scalar values is not supported (got {0})")]
    UnsupportedValueType(&'static str),
}

impl ComparisonError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            ComparisonError::InvalidIdentifier(_) => "MEDIA_QUERY_INVALID_IDENTIFIER",
            ComparisonError::InvalidOperator { .. } => "MEDIA_QUERY_INVALID_OPERATOR",
            ComparisonError::UnsupportedValueType(_) => "MEDIA_QUERY_UNSUPPORTED_VALUE_TYPE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ComparisonError::InvalidIdentifier("a b".into()).code(),
            "MEDIA_QUERY_INVALID_IDENTIFIER"
        );
        assert_eq!(
            ComparisonError::UnsupportedValueType("array").code(),
            "MEDIA_QUERY_UNSUPPORTED_VALUE_TYPE"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ComparisonError::InvalidOperator {
            operator: "~".into(),
            allowed: "=|!=".into(),
        };
        let display = format!("{}", err);
        assert!(display.contains("`~`"));
        assert!(display.contains("=|!="));
    }
}
