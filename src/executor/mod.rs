//! Query execution subsystem
//!
//! Consumes plans and produces a lazy stream of records.
//!
//! # Execution Flow (strict order)
//!
//! 1. Fetch identifiers from the record store
//! 2. Wrap each identifier as a lazily resolved record
//! 3. Drop records failing a residual predicate
//! 4. Residual sort (if any virtual sort key)
//! 5. Limit after the sort (otherwise pushed down as the page size)
//!
//! Records the consumer never pulls are never resolved.

mod errors;
#[allow(clippy::module_inception)]
mod executor;
mod filters;
mod result;
mod sorter;
mod stream;

pub use errors::{QueryError, QueryResult};
pub use executor::QueryEngine;
pub use filters::ResidualFilter;
pub use result::ExecutionStats;
pub use sorter::VirtualSorter;
pub use stream::RecordStream;
