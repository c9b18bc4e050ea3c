//! Comparison builder subsystem
//!
//! Builds safe predicates against an external tabular store. Every
//! identifier is validated and every value rendered as a literal before
//! any text is handed to the store.
//!
//! # Allowed operators
//!
//! `=`, `!=`, `<>`, `>`, `>=`, `<`, `<=`, `LIKE`, `NOT LIKE`, `RLIKE`,
//! `NOT RLIKE` (case-insensitive on input).

mod builder;
mod errors;
mod escape;

pub use builder::{
    quote_identifier, validate_operator, ComparisonBuilder, ComparisonClause, ComparisonOperator,
};
pub use errors::{ComparisonError, ComparisonResult};
pub use escape::{MysqlEscaper, ValueEscaper};
