//! Explain plan output
//!
//! Produces deterministic, human-readable explain output, and the same
//! content as JSON through serde.

use std::fmt;

use serde::Serialize;

use crate::query::InvalidFieldValue;
use crate::store::NativeRequest;

use super::planner::{LimitStage, QueryPlan};

/// Explain plan output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExplainPlan {
    /// Whether planning succeeded
    pub accepted: bool,
    /// Native request (if accepted)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub native: Option<NativeRequest>,
    /// Full-text search string sent to the store
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Residual predicates, in evaluation order
    pub residual_filters: Vec<String>,
    /// Residual sort keys, in declared order
    pub residual_sort: Vec<String>,
    /// Effective limit
    pub limit: Option<u64>,
    /// Where the limit is enforced
    pub limit_stage: Option<LimitStage>,
    /// Rejection reason (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    /// Rejection error code (if rejected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_code: Option<String>,
}

impl ExplainPlan {
    /// Creates an explain plan from a successful query plan
    pub fn from_plan(plan: &QueryPlan) -> Self {
        Self {
            accepted: true,
            search: plan.native.search_string(),
            native: Some(plan.native.clone()),
            residual_filters: plan.residual.iter().map(|p| p.to_string()).collect(),
            residual_sort: plan
                .virtual_order
                .iter()
                .map(|(field, direction)| format!("{} {}", field, direction))
                .collect(),
            limit: plan.limit,
            limit_stage: Some(plan.limit_stage()),
            rejection_reason: None,
            rejection_code: None,
        }
    }

    /// Creates an explain plan from a planning error
    pub fn from_error(err: &InvalidFieldValue) -> Self {
        Self {
            accepted: false,
            native: None,
            search: None,
            residual_filters: Vec::new(),
            residual_sort: Vec::new(),
            limit: None,
            limit_stage: None,
            rejection_reason: Some(err.to_string()),
            rejection_code: Some(err.code().to_string()),
        }
    }
}

fn join_ids(ids: &[u64]) -> String {
    ids.iter().map(|id| id.to_string()).collect::<Vec<_>>().join(", ")
}

impl fmt::Display for ExplainPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== EXPLAIN PLAN ===")?;

        if !self.accepted {
            writeln!(f, "Status: REJECTED")?;
            if let Some(code) = &self.rejection_code {
                writeln!(f, "Error Code: {}", code)?;
            }
            if let Some(reason) = &self.rejection_reason {
                writeln!(f, "Reason: {}", reason)?;
            }
            return Ok(());
        }

        writeln!(f, "Status: ACCEPTED")?;
        if let Some(native) = &self.native {
            writeln!(f, "Native Request:")?;
            writeln!(f, "  Post Type: {}", native.post_type)?;
            if let Some(search) = &self.search {
                writeln!(f, "  Search: {}", search)?;
            }
            if !native.parent_in.is_empty() {
                writeln!(f, "  Parent In: {}", join_ids(&native.parent_in))?;
            }
            if !native.parent_not_in.is_empty() {
                writeln!(f, "  Parent Not In: {}", join_ids(&native.parent_not_in))?;
            }
            if !native.author_in.is_empty() {
                writeln!(f, "  Author In: {}", join_ids(&native.author_in))?;
            }
            if !native.mime_types.is_empty() {
                writeln!(f, "  Mime Types: {}", native.mime_types.join(", "))?;
            }
            for clause in &native.date_clauses {
                writeln!(f, "  Date: {}", clause)?;
            }
            for sort in &native.order {
                writeln!(f, "  Order: {} {}", sort.field, sort.direction)?;
            }
            if native.page_size.is_unbounded() {
                writeln!(f, "  Page Size: unbounded")?;
            } else {
                writeln!(f, "  Page Size: {}", native.page_size.as_raw())?;
            }
        }
        if !self.residual_filters.is_empty() {
            writeln!(f, "Residual Filters:")?;
            for filter in &self.residual_filters {
                writeln!(f, "  - {}", filter)?;
            }
        }
        if !self.residual_sort.is_empty() {
            writeln!(f, "Residual Sort:")?;
            for key in &self.residual_sort {
                writeln!(f, "  - {}", key)?;
            }
        }
        match (self.limit, self.limit_stage) {
            (Some(limit), Some(stage)) => writeln!(f, "Limit: {} ({})", limit, stage.as_str())?,
            _ => writeln!(f, "Limit: none")?,
        }

        Ok(())
    }
}
