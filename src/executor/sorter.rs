//! Residual sort on virtual fields
//!
//! Keys are applied in declared order: a stable ascending sort on the key,
//! then a reversal of the whole sequence when that key is DESC. Each pass
//! is applied on top of the previous one, so the last declared key ends up
//! as the effective primary key. Unknown values sort before known ones.

use crate::query::{SortDirection, VirtualField};
use crate::record::{Record, ResolutionFailed, ResolveResult};

/// Sorts materialized records by virtual fields
pub struct VirtualSorter;

impl VirtualSorter {
    /// Resolves every sort key up front, then sorts.
    ///
    /// A record whose keys cannot be resolved is left out of the order and
    /// its failure returned alongside, in input order.
    pub fn sort<'a>(
        records: Vec<Record<'a>>,
        order: &[(VirtualField, SortDirection)],
    ) -> (Vec<Record<'a>>, Vec<ResolutionFailed>) {
        let mut keyed = Vec::with_capacity(records.len());
        let mut failures = Vec::new();
        for record in records {
            let keys = order
                .iter()
                .map(|(field, _)| record.virtual_value(*field))
                .collect::<ResolveResult<Vec<_>>>();
            match keys {
                Ok(keys) => keyed.push((keys, record)),
                Err(err) => failures.push(err),
            }
        }

        for (index, (_, direction)) in order.iter().enumerate() {
            keyed.sort_by(|a, b| a.0[index].cmp(&b.0[index]));
            if direction.is_desc() {
                keyed.reverse();
            }
        }

        let sorted = keyed.into_iter().map(|(_, record)| record).collect();
        (sorted, failures)
    }
}
