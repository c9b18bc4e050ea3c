//! Query engine
//!
//! Execution flow (strict order):
//! 1. Plan: split the `QuerySpec` into a native request and residual stages
//! 2. Fetch identifiers from the record store (page size per the plan)
//! 3. Wrap each identifier lazily as a `Record`
//! 4. Drop records failing a residual predicate
//! 5. Residual sort, when any virtual sort key is present
//! 6. Limit: after the sort, or already pushed down as the page size
//!
//! Steps 3 onwards run inside the returned `RecordStream`, one pull at a
//! time. There is no retry state; every failure is returned to the caller.

use chrono::FixedOffset;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::observability::{Event, Lifecycle, Logger, ObservationScope};
use crate::planner::{ExplainPlan, QueryPlan, QueryPlanner};
use crate::query::QuerySpec;
use crate::record::Resolvers;
use crate::store::RecordStore;

use super::errors::QueryResult;
use super::stream::RecordStream;

/// Orchestrates native push-down and the residual pipeline
///
/// Collaborators are injected at construction; the engine holds no state
/// between executions.
pub struct QueryEngine<'a> {
    store: &'a dyn RecordStore,
    resolvers: Resolvers<'a>,
    site_offset: FixedOffset,
    logger: Logger,
}

impl<'a> QueryEngine<'a> {
    /// Takes the site offset and logger from `config`.
    ///
    /// Mime groups are expanded with `resolvers.mime_types`; build that
    /// registry with `EngineConfig::mime_registry` to honor `mime_groups`.
    pub fn new(store: &'a dyn RecordStore, resolvers: Resolvers<'a>, config: &EngineConfig) -> Self {
        Self {
            store,
            resolvers,
            site_offset: config.site_offset(),
            logger: config.logger(),
        }
    }

    /// Replaces the logger taken from configuration
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Builds the plan for a spec without touching the store
    pub fn plan(&self, spec: &QuerySpec) -> QueryResult<QueryPlan> {
        let planner = QueryPlanner::new(self.resolvers.mime_types, self.site_offset);
        Ok(planner.plan(spec)?)
    }

    /// Describes how a spec would run; never touches the store
    pub fn explain(&self, spec: &QuerySpec) -> ExplainPlan {
        let planner = QueryPlanner::new(self.resolvers.mime_types, self.site_offset);
        match planner.plan(spec) {
            Ok(plan) => ExplainPlan::from_plan(&plan),
            Err(err) => ExplainPlan::from_error(&err),
        }
    }

    /// Executes a query.
    ///
    /// Planning and the native fetch happen here; residual filtering and
    /// field resolution are deferred to the returned stream.
    pub fn execute(&self, spec: &QuerySpec) -> QueryResult<RecordStream<'a>> {
        let query_id = Uuid::new_v4().to_string();
        let scope = ObservationScope::new(
            self.logger,
            Lifecycle::QUERY,
            &[("query_id", query_id.as_str())],
        );

        let plan = match self.plan(spec) {
            Ok(plan) => plan,
            Err(err) => {
                scope.fail(Event::QueryRejected, &err.to_string());
                return Err(err);
            }
        };

        let residual_filters = plan.residual.len().to_string();
        let page_size = plan.native.page_size.as_raw().to_string();
        scope.log(
            Event::QueryPlanned,
            &[
                ("limit_stage", plan.limit_stage().as_str()),
                ("page_size", page_size.as_str()),
                ("residual_filters", residual_filters.as_str()),
            ],
        );

        let ids = match self.store.search(&plan.native) {
            Ok(ids) => ids,
            Err(err) => {
                scope.fail(Event::StoreFailed, &err.to_string());
                return Err(err.into());
            }
        };

        let fetched = ids.len().to_string();
        scope.log(Event::NativeFetchComplete, &[("fetched", fetched.as_str())]);

        Ok(RecordStream::new(query_id, plan, ids, self.resolvers, scope))
    }
}
