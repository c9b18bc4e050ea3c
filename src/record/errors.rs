//! Record resolution errors
//!
//! Collaborators report `LookupError`. The record layer attaches the
//! record id and field name, producing `ResolutionFailed`, which surfaces
//! at the point the failing field is accessed.

use thiserror::Error;

use crate::store::RecordId;

/// Result type for collaborator lookups
pub type LookupResult<T> = Result<T, LookupError>;

/// Result type for record field access
pub type ResolveResult<T> = Result<T, ResolutionFailed>;

/// A collaborator (metadata, filesystem, reference search) failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct LookupError {
    message: String,
}

impl LookupError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for LookupError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// A record field could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to resolve `{field}` for record {record_id}: {reason}")]
pub struct ResolutionFailed {
    pub record_id: RecordId,
    pub field: &'static str,
    pub reason: String,
}

impl ResolutionFailed {
    pub fn new(record_id: RecordId, field: &'static str, cause: LookupError) -> Self {
        Self {
            record_id,
            field,
            reason: cause.message,
        }
    }

    pub fn code(&self) -> &'static str {
        "MEDIA_QUERY_RESOLUTION_FAILED"
    }
}
