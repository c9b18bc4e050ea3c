//! media-query - A hybrid media query engine
//!
//! Native constraints are pushed down to the record store; file size,
//! dimensions and usage flags are resolved per record and filtered, sorted
//! and limited in memory.

pub mod comparison;
pub mod config;
pub mod executor;
pub mod mime;
pub mod observability;
pub mod planner;
pub mod query;
pub mod record;
pub mod reference;
pub mod store;

pub use config::{ConfigError, EngineConfig};
pub use executor::{ExecutionStats, QueryEngine, QueryError, QueryResult, RecordStream};
pub use query::{DateInput, OrderSpec, QuerySpec, SortDirection};
pub use record::{Record, RecordField, Resolvers};
pub use store::{NativeRequest, RecordId, RecordStore, StoreError};
