//! Record store error types
//!
//! Store errors are propagated unchanged to the caller of the engine.
//! The engine never retries.

use thiserror::Error;

/// Result type for record store calls
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors a `RecordStore` implementation may report
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Record store unavailable: {0}")]
    Unavailable(String),

    /// The store rejected or failed the request
    #[error("Record store query failed: {0}")]
    QueryFailed(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "MEDIA_QUERY_STORE_UNAVAILABLE",
            StoreError::QueryFailed(_) => "MEDIA_QUERY_STORE_QUERY_FAILED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(
            StoreError::Unavailable("down".into()).code(),
            "MEDIA_QUERY_STORE_UNAVAILABLE"
        );
        assert_eq!(
            StoreError::QueryFailed("bad orderby".into()).code(),
            "MEDIA_QUERY_STORE_QUERY_FAILED"
        );
    }
}
