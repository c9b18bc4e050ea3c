//! Query specification errors
//!
//! A `QuerySpec` accepts any value at set time; values outside a field's
//! legal domain are reported when the query is planned.

use thiserror::Error;

/// A spec field holds a value outside its legal domain
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value for `{field}`: {reason}")]
pub struct InvalidFieldValue {
    pub field: String,
    pub reason: String,
}

impl InvalidFieldValue {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        "MEDIA_QUERY_INVALID_FIELD_VALUE"
    }
}
