//! Query planner
//!
//! Splits a `QuerySpec` into a native request for the record store and the
//! residual stages run in memory afterwards. Planning is deterministic:
//! same spec and configuration, same plan.
//!
//! Every spec value is validated here, so an invalid value surfaces when
//! the query is executed rather than when it was set.

use std::fmt;

use chrono::FixedOffset;
use serde::Serialize;

use crate::mime::MimeTypeRegistry;
use crate::query::{DateInput, InvalidFieldValue, QuerySpec, Range, SortDirection, VirtualField};
use crate::store::{DateClause, DateColumn, NativeRequest, NativeSort, PageSize};

/// Result type for planning
pub type PlannerResult<T> = Result<T, InvalidFieldValue>;

/// Exact/min/max bounds on one virtual field, all inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VirtualRange {
    pub field: VirtualField,
    pub exact: Option<u64>,
    pub min: Option<u64>,
    pub max: Option<u64>,
}

impl VirtualRange {
    /// Returns true if a resolved value passes every bound.
    ///
    /// An unknown value never matches.
    pub fn matches(&self, value: Option<u64>) -> bool {
        let value = match value {
            Some(v) => v,
            None => return false,
        };
        self.exact.map_or(true, |e| value == e)
            && self.min.map_or(true, |m| value >= m)
            && self.max.map_or(true, |m| value <= m)
    }
}

impl fmt::Display for VirtualRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(exact) = self.exact {
            parts.push(format!("{} = {}", self.field, exact));
        }
        if let Some(min) = self.min {
            parts.push(format!("{} >= {}", self.field, min));
        }
        if let Some(max) = self.max {
            parts.push(format!("{} <= {}", self.field, max));
        }
        f.write_str(&parts.join(" AND "))
    }
}

/// One predicate of the residual filter stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResidualPredicate {
    Range(VirtualRange),
    FileExists { expected: bool },
    InUse { expected: bool },
}

impl ResidualPredicate {
    /// Relative cost; predicates run cheapest first
    pub fn cost(&self) -> u8 {
        match self {
            ResidualPredicate::Range(_) => 1,
            ResidualPredicate::FileExists { .. } => 2,
            ResidualPredicate::InUse { .. } => 3,
        }
    }
}

impl fmt::Display for ResidualPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResidualPredicate::Range(range) => write!(f, "{}", range),
            ResidualPredicate::FileExists { expected } => write!(f, "is_file_exists = {}", expected),
            ResidualPredicate::InUse { expected } => write!(f, "is_in_use = {}", expected),
        }
    }
}

/// Where the query limit is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LimitStage {
    /// No limit
    Unbounded,
    /// Pushed down as the native page size
    NativePageSize,
    /// Applied after the residual sort
    AfterResidualSort,
}

impl LimitStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitStage::Unbounded => "UNBOUNDED",
            LimitStage::NativePageSize => "NATIVE_PAGE_SIZE",
            LimitStage::AfterResidualSort => "AFTER_RESIDUAL_SORT",
        }
    }
}

/// Immutable query plan (no runtime state)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryPlan {
    /// Request handed to the record store
    pub native: NativeRequest,
    /// Residual filters, cheapest first
    pub residual: Vec<ResidualPredicate>,
    /// Virtual sort keys, in declared order
    pub virtual_order: Vec<(VirtualField, SortDirection)>,
    /// Effective limit (`None` = unbounded)
    pub limit: Option<u64>,
}

impl QueryPlan {
    /// True when the residual sort must see every filtered record first
    pub fn needs_materialization(&self) -> bool {
        !self.virtual_order.is_empty()
    }

    pub fn limit_stage(&self) -> LimitStage {
        match (self.limit, self.needs_materialization()) {
            (None, _) => LimitStage::Unbounded,
            (Some(_), true) => LimitStage::AfterResidualSort,
            (Some(_), false) => LimitStage::NativePageSize,
        }
    }

    /// Limit applied by the residual pipeline itself. The native page size
    /// already covers the no-virtual-sort case, so it is never applied twice.
    pub fn residual_limit(&self) -> Option<u64> {
        match self.limit_stage() {
            LimitStage::AfterResidualSort => self.limit,
            _ => None,
        }
    }
}

/// Query planner that produces deterministic plans
pub struct QueryPlanner<'a> {
    mime_types: &'a MimeTypeRegistry,
    site_offset: FixedOffset,
}

impl<'a> QueryPlanner<'a> {
    pub fn new(mime_types: &'a MimeTypeRegistry, site_offset: FixedOffset) -> Self {
        Self {
            mime_types,
            site_offset,
        }
    }

    /// Plans a query, returning an immutable plan or the first invalid value
    pub fn plan(&self, spec: &QuerySpec) -> PlannerResult<QueryPlan> {
        // 1. Residual stages; validates every virtual value
        let residual = self.residual_predicates(spec)?;
        let virtual_order = spec.virtual_order();
        let limit = spec.effective_limit();

        // 2. Native request
        let mut native = NativeRequest::new();
        native.keywords = spec.keywords.clone();
        self.apply_parents(spec, &mut native);
        native.author_in = spec.post_authors.clone();
        native.mime_types = self.mime_types(spec)?;
        native.date_clauses = self.date_clauses(spec)?;
        native.order = spec
            .native_order()
            .into_iter()
            .map(|(field, direction)| NativeSort { field, direction })
            .collect();

        // 3. Page size: a virtual sort needs the full set before truncating
        native.page_size = match (virtual_order.is_empty(), limit) {
            (true, Some(limit)) => PageSize::Limit(limit),
            _ => PageSize::Unbounded,
        };

        Ok(QueryPlan {
            native,
            residual,
            virtual_order,
            limit,
        })
    }

    /// Explicit parents override the attachment flag entirely
    fn apply_parents(&self, spec: &QuerySpec, native: &mut NativeRequest) {
        if !spec.post_parents.is_empty() {
            native.parent_in = spec.post_parents.clone();
            return;
        }
        match spec.post_attached {
            Some(true) => native.parent_not_in = vec![0],
            Some(false) => native.parent_in = vec![0],
            None => {}
        }
    }

    /// Group expansion replaces explicit mime types when both are given
    fn mime_types(&self, spec: &QuerySpec) -> PlannerResult<Vec<String>> {
        if spec.media_types.is_empty() {
            return Ok(spec.post_mime_types.clone());
        }
        if let Some(unknown) = spec.media_types.iter().find(|g| !self.mime_types.has_group(g)) {
            return Err(InvalidFieldValue::new(
                "media_types",
                format!(
                    "unknown media type `{}`, expected one of {}",
                    unknown,
                    self.mime_types.groups().join(", ")
                ),
            ));
        }
        Ok(self.mime_types.types_by_group(spec.media_types.as_slice()))
    }

    fn date_clauses(&self, spec: &QuerySpec) -> PlannerResult<Vec<DateClause>> {
        let mut clauses = Vec::new();
        self.push_date_clauses(&mut clauses, DateColumn::PostDate, &spec.post_date)?;
        self.push_date_clauses(&mut clauses, DateColumn::PostModified, &spec.post_modified)?;
        Ok(clauses)
    }

    fn push_date_clauses(
        &self,
        clauses: &mut Vec<DateClause>,
        column: DateColumn,
        range: &Range<DateInput>,
    ) -> PlannerResult<()> {
        let name = column.as_str();
        if let Some(exact) = &range.exact {
            let at = self.resolve_date(name, exact)?;
            clauses.push(DateClause::exact(column, &at));
        }
        if let Some(min) = &range.min {
            let at = self.resolve_date(&format!("{}_min", name), min)?;
            clauses.push(DateClause::after(column, &at));
        }
        if let Some(max) = &range.max {
            let at = self.resolve_date(&format!("{}_max", name), max)?;
            clauses.push(DateClause::before(column, &at));
        }
        Ok(())
    }

    fn resolve_date(
        &self,
        field: &str,
        input: &DateInput,
    ) -> PlannerResult<chrono::NaiveDateTime> {
        input
            .resolve(self.site_offset)
            .map_err(|reason| InvalidFieldValue::new(field, reason))
    }

    fn residual_predicates(&self, spec: &QuerySpec) -> PlannerResult<Vec<ResidualPredicate>> {
        let mut predicates = Vec::new();
        for field in VirtualField::ALL {
            if let Some(range) = virtual_range(field, spec.virtual_range(field))? {
                predicates.push(ResidualPredicate::Range(range));
            }
        }
        if let Some(expected) = spec.file_exists {
            predicates.push(ResidualPredicate::FileExists { expected });
        }
        if let Some(expected) = spec.in_use {
            predicates.push(ResidualPredicate::InUse { expected });
        }
        predicates.sort_by_key(ResidualPredicate::cost);
        Ok(predicates)
    }
}

/// Validates and normalizes one virtual range; `0` is inert
fn virtual_range(field: VirtualField, range: &Range<i64>) -> PlannerResult<Option<VirtualRange>> {
    let bound = |suffix: &str, value: Option<i64>| -> PlannerResult<Option<u64>> {
        match value {
            None | Some(0) => Ok(None),
            Some(v) => u64::try_from(v).map(Some).map_err(|_| {
                InvalidFieldValue::new(
                    format!("{}{}", field.as_str(), suffix),
                    format!("must not be negative, got {}", v),
                )
            }),
        }
    };

    let normalized = VirtualRange {
        field,
        exact: bound("", range.exact)?,
        min: bound("_min", range.min)?,
        max: bound("_max", range.max)?,
    };
    if normalized.exact.is_none() && normalized.min.is_none() && normalized.max.is_none() {
        return Ok(None);
    }
    Ok(Some(normalized))
}
