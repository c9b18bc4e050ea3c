//! Query planner subsystem
//!
//! Turns a `QuerySpec` into a `QueryPlan`: the native request pushed down
//! to the record store plus the residual stages run in memory.
//!
//! # Push-down rules
//!
//! - Native fields (keywords, parents, authors, dates, mime types) go to
//!   the store.
//! - Virtual fields (file size, width, height) and the usage/existence
//!   flags become residual predicates.
//! - The limit becomes the native page size only when there is no virtual
//!   sort; otherwise the store fetches everything and the limit is applied
//!   after the residual sort.

mod explain;
#[allow(clippy::module_inception)]
mod planner;

pub use explain::ExplainPlan;
pub use planner::{
    LimitStage, PlannerResult, QueryPlan, QueryPlanner, ResidualPredicate, VirtualRange,
};
