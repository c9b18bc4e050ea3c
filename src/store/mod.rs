//! Record store contract
//!
//! The external store owns native search, filtering and paging. The
//! engine only builds a `NativeRequest` and consumes the ordered
//! identifiers that come back.
//!
//! # Ordering contract
//!
//! Result order reflects `NativeRequest::order`. With no native sort the
//! store applies its own documented fallback (descending creation date).
//! The engine never re-sorts native fields.

mod errors;
mod request;

pub use errors::{StoreError, StoreResult};
pub use request::{
    CalendarParts, DateBoundary, DateClause, DateColumn, NativeRequest, NativeSort, PageSize,
    ATTACHMENT_POST_TYPE,
};

/// Identifier of one media record in the store
pub type RecordId = u64;

/// Native search over the external record store
pub trait RecordStore {
    /// Runs a native request and returns matching identifiers in order
    fn search(&self, request: &NativeRequest) -> StoreResult<Vec<RecordId>>;
}
