//! Query execution errors
//!
//! Error codes:
//! - MEDIA_QUERY_INVALID_IDENTIFIER / _INVALID_OPERATOR / _UNSUPPORTED_VALUE_TYPE
//! - MEDIA_QUERY_INVALID_FIELD_VALUE
//! - MEDIA_QUERY_STORE_UNAVAILABLE / _STORE_QUERY_FAILED
//! - MEDIA_QUERY_RESOLUTION_FAILED
//!
//! Nothing here is fatal to the process; every error is returned to the
//! caller of the engine. The engine never retries.

use thiserror::Error;

use crate::comparison::ComparisonError;
use crate::query::InvalidFieldValue;
use crate::record::ResolutionFailed;
use crate::store::StoreError;

/// Result type for query execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Any error surfaced while planning, fetching or resolving a query
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error(transparent)]
    InvalidFieldValue(#[from] InvalidFieldValue),

    /// Propagated unchanged from the record store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Surfaces when the failing field is accessed, not eagerly
    #[error(transparent)]
    ResolutionFailed(#[from] ResolutionFailed),
}

impl QueryError {
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::Comparison(e) => e.code(),
            QueryError::InvalidFieldValue(e) => e.code(),
            QueryError::Store(e) => e.code(),
            QueryError::ResolutionFailed(e) => e.code(),
        }
    }
}
