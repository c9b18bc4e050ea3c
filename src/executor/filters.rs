//! Residual predicate filtering
//!
//! Predicates are evaluated in plan order (cheapest first) and stop at the
//! first one that fails, so a record dropped by a dimension check never
//! triggers the reference scan behind `is_in_use`.

use crate::planner::ResidualPredicate;
use crate::record::{Record, ResolveResult};

/// Evaluates residual predicates against records
pub struct ResidualFilter;

impl ResidualFilter {
    /// Checks if a record matches all predicates (AND semantics)
    pub fn matches(record: &Record<'_>, predicates: &[ResidualPredicate]) -> ResolveResult<bool> {
        for predicate in predicates {
            if !Self::matches_predicate(record, predicate)? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn matches_predicate(record: &Record<'_>, predicate: &ResidualPredicate) -> ResolveResult<bool> {
        match predicate {
            ResidualPredicate::Range(range) => Ok(range.matches(record.virtual_value(range.field)?)),
            ResidualPredicate::FileExists { expected } => {
                Ok(record.is_file_exists()? == *expected)
            }
            ResidualPredicate::InUse { expected } => Ok(record.is_in_use()? == *expected),
        }
    }
}
