//! Lazy result stream
//!
//! Without a virtual sort, each pull wraps the next identifier in a
//! `Record`, runs the residual filter on it and hands it over. Nothing is
//! resolved for identifiers the consumer never reaches.
//!
//! With a virtual sort, the first pull materializes every surviving record,
//! sorts, truncates to the limit, and then yields from the sorted buffer.
//! Records that failed to resolve along the way are yielded as errors
//! before the sorted records.

use std::mem;
use std::vec;

use super::errors::QueryResult;
use super::filters::ResidualFilter;
use super::result::ExecutionStats;
use super::sorter::VirtualSorter;
use crate::observability::{Event, ObservationScope};
use crate::planner::QueryPlan;
use crate::record::{Record, ResolutionFailed, Resolvers};
use crate::store::RecordId;

enum Stage<'a> {
    /// Waiting for the first pull to materialize and sort
    Pending(vec::IntoIter<RecordId>),
    /// Filtering identifiers one pull at a time
    Filtering(vec::IntoIter<RecordId>),
    /// Yielding buffered failures, then the sorted, truncated records
    Sorted {
        failures: vec::IntoIter<ResolutionFailed>,
        records: vec::IntoIter<Record<'a>>,
    },
    Done,
}

/// Forward-only, single-pass sequence of matching records
///
/// Dropping the stream before it is exhausted logs `QUERY_ABANDONED`.
pub struct RecordStream<'a> {
    query_id: String,
    plan: QueryPlan,
    resolvers: Resolvers<'a>,
    stage: Stage<'a>,
    stats: ExecutionStats,
    scope: Option<ObservationScope>,
}

impl<'a> RecordStream<'a> {
    pub(crate) fn new(
        query_id: String,
        plan: QueryPlan,
        ids: Vec<RecordId>,
        resolvers: Resolvers<'a>,
        scope: ObservationScope,
    ) -> Self {
        let ids = ids.into_iter();
        let stage = if plan.needs_materialization() {
            Stage::Pending(ids)
        } else {
            Stage::Filtering(ids)
        };
        Self {
            query_id,
            plan,
            resolvers,
            stage,
            stats: ExecutionStats::default(),
            scope: Some(scope),
        }
    }

    /// Identifier carried by every log line of this execution
    pub fn query_id(&self) -> &str {
        &self.query_id
    }

    pub fn plan(&self) -> &QueryPlan {
        &self.plan
    }

    /// Counters so far; final once the stream returns `None`
    pub fn stats(&self) -> ExecutionStats {
        self.stats
    }

    /// Filters every identifier, sorts the survivors and applies the limit.
    ///
    /// A record that fails to resolve is set aside with its error; the rest
    /// are still sorted.
    fn materialize(&mut self, ids: vec::IntoIter<RecordId>) -> Stage<'a> {
        let total = ids.len().to_string();
        self.log(Event::ResidualSortBegin, &[("candidates", total.as_str())]);

        let mut survivors = Vec::new();
        let mut failures = Vec::new();
        for id in ids {
            self.stats.scanned += 1;
            let record = Record::new(id, self.resolvers);
            match ResidualFilter::matches(&record, &self.plan.residual) {
                Ok(true) => survivors.push(record),
                Ok(false) => self.stats.filtered_out += 1,
                Err(err) => failures.push(err),
            }
        }

        let (mut sorted, unsortable) = VirtualSorter::sort(survivors, &self.plan.virtual_order);
        failures.extend(unsortable);
        if let Some(limit) = self.plan.residual_limit() {
            let limit = usize::try_from(limit).unwrap_or(usize::MAX);
            if sorted.len() > limit {
                sorted.truncate(limit);
                self.stats.truncated = true;
            }
        }

        for err in &failures {
            self.log_resolution_failure(err);
        }
        self.stats.failed += failures.len();

        let kept = sorted.len().to_string();
        self.log(Event::ResidualSortComplete, &[("kept", kept.as_str())]);
        Stage::Sorted {
            failures: failures.into_iter(),
            records: sorted.into_iter(),
        }
    }

    fn log(&self, event: Event, fields: &[(&str, &str)]) {
        if let Some(scope) = &self.scope {
            scope.log(event, fields);
        }
    }

    /// Logs a failure for one record; the stream keeps going
    fn log_resolution_failure(&self, err: &ResolutionFailed) {
        let record_id = err.record_id.to_string();
        let reason = err.to_string();
        self.log(
            Event::ResolutionFailed,
            &[
                ("record_id", record_id.as_str()),
                ("field", err.field),
                ("reason", reason.as_str()),
            ],
        );
    }

    fn finish(&mut self) {
        self.stage = Stage::Done;
        if let Some(scope) = self.scope.take() {
            let fields = self.stats.fields();
            let fields: Vec<(&str, &str)> = fields.iter().map(|(k, v)| (*k, v.as_str())).collect();
            scope.complete(&fields);
        }
    }
}

impl<'a> Iterator for RecordStream<'a> {
    type Item = QueryResult<Record<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match mem::replace(&mut self.stage, Stage::Done) {
                Stage::Pending(ids) => self.stage = self.materialize(ids),
                Stage::Filtering(mut ids) => {
                    let Some(id) = ids.next() else {
                        self.finish();
                        return None;
                    };
                    self.stage = Stage::Filtering(ids);
                    self.stats.scanned += 1;

                    let record = Record::new(id, self.resolvers);
                    match ResidualFilter::matches(&record, &self.plan.residual) {
                        Ok(true) => {
                            self.stats.returned += 1;
                            return Some(Ok(record));
                        }
                        Ok(false) => self.stats.filtered_out += 1,
                        Err(err) => {
                            self.log_resolution_failure(&err);
                            self.stats.failed += 1;
                            return Some(Err(err.into()));
                        }
                    }
                }
                Stage::Sorted {
                    mut failures,
                    mut records,
                } => {
                    if let Some(err) = failures.next() {
                        self.stage = Stage::Sorted { failures, records };
                        return Some(Err(err.into()));
                    }
                    let Some(record) = records.next() else {
                        self.finish();
                        return None;
                    };
                    self.stage = Stage::Sorted { failures, records };
                    self.stats.returned += 1;
                    return Some(Ok(record));
                }
                Stage::Done => return None,
            }
        }
    }
}
