//! Native request sent to the record store
//!
//! Dates are expressed as decomposed calendar fields because the store
//! compares year/month/day/hour/minute/second components, not raw
//! timestamps.

use std::fmt;

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::query::SortDirection;

/// Record type the native request always targets
pub const ATTACHMENT_POST_TYPE: &str = "attachment";

/// Page size of a native request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "i64")]
pub enum PageSize {
    /// Fetch everything that matches
    Unbounded,
    /// Fetch at most this many identifiers
    Limit(u64),
}

impl PageSize {
    /// Raw store representation (`-1` = unbounded)
    pub fn as_raw(&self) -> i64 {
        match self {
            PageSize::Unbounded => -1,
            PageSize::Limit(n) => i64::try_from(*n).unwrap_or(i64::MAX),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        matches!(self, PageSize::Unbounded)
    }
}

impl From<PageSize> for i64 {
    fn from(size: PageSize) -> Self {
        size.as_raw()
    }
}

/// Which date column a clause targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateColumn {
    PostDate,
    PostModified,
}

impl DateColumn {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateColumn::PostDate => "post_date",
            DateColumn::PostModified => "post_modified",
        }
    }
}

/// How a date clause bounds the column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBoundary {
    /// Column equals the given components
    Exact,
    /// Column is after the given components
    After,
    /// Column is before the given components
    Before,
}

/// A timestamp decomposed into calendar components, truncated to the second
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalendarParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CalendarParts {
    pub fn from_naive(at: &NaiveDateTime) -> Self {
        Self {
            year: at.year(),
            month: at.month(),
            day: at.day(),
            hour: at.hour(),
            minute: at.minute(),
            second: at.second(),
        }
    }
}

impl fmt::Display for CalendarParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
            self.year, self.month, self.day, self.hour, self.minute, self.second
        )
    }
}

/// One date constraint in a native request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateClause {
    pub column: DateColumn,
    pub boundary: DateBoundary,
    /// Whether the boundary itself matches (always true for `Exact`)
    pub inclusive: bool,
    pub parts: CalendarParts,
}

impl DateClause {
    pub fn exact(column: DateColumn, at: &NaiveDateTime) -> Self {
        Self {
            column,
            boundary: DateBoundary::Exact,
            inclusive: true,
            parts: CalendarParts::from_naive(at),
        }
    }

    /// Inclusive lower bound
    pub fn after(column: DateColumn, at: &NaiveDateTime) -> Self {
        Self {
            column,
            boundary: DateBoundary::After,
            inclusive: true,
            parts: CalendarParts::from_naive(at),
        }
    }

    /// Inclusive upper bound
    pub fn before(column: DateColumn, at: &NaiveDateTime) -> Self {
        Self {
            column,
            boundary: DateBoundary::Before,
            inclusive: true,
            parts: CalendarParts::from_naive(at),
        }
    }
}

impl fmt::Display for DateClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match (self.boundary, self.inclusive) {
            (DateBoundary::Exact, _) => "=",
            (DateBoundary::After, true) => ">=",
            (DateBoundary::After, false) => ">",
            (DateBoundary::Before, true) => "<=",
            (DateBoundary::Before, false) => "<",
        };
        write!(f, "{} {} {}", self.column.as_str(), op, self.parts)
    }
}

/// A native sort entry; field names the store does not know are passed
/// through for the store adapter to reject or ignore
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeSort {
    pub field: String,
    pub direction: SortDirection,
}

/// The request handed to `RecordStore::search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NativeRequest {
    pub post_type: String,
    /// Keyword phrases, OR-combined by the store's full-text facility
    pub keywords: Vec<String>,
    pub parent_in: Vec<u64>,
    pub parent_not_in: Vec<u64>,
    pub author_in: Vec<u64>,
    pub date_clauses: Vec<DateClause>,
    pub mime_types: Vec<String>,
    pub order: Vec<NativeSort>,
    pub page_size: PageSize,
}

impl NativeRequest {
    /// An unconstrained, unbounded request for attachments
    pub fn new() -> Self {
        Self {
            post_type: ATTACHMENT_POST_TYPE.to_string(),
            keywords: Vec::new(),
            parent_in: Vec::new(),
            parent_not_in: Vec::new(),
            author_in: Vec::new(),
            date_clauses: Vec::new(),
            mime_types: Vec::new(),
            order: Vec::new(),
            page_size: PageSize::Unbounded,
        }
    }

    /// The full-text search string: each keyword quoted as a phrase,
    /// space-separated. `None` when there are no keywords.
    pub fn search_string(&self) -> Option<String> {
        if self.keywords.is_empty() {
            return None;
        }
        Some(
            self.keywords
                .iter()
                .map(|kw| format!("\"{}\"", kw))
                .collect::<Vec<_>>()
                .join(" "),
        )
    }

    /// Returns true if the request imposes no filtering at all
    pub fn is_unconstrained(&self) -> bool {
        self.keywords.is_empty()
            && self.parent_in.is_empty()
            && self.parent_not_in.is_empty()
            && self.author_in.is_empty()
            && self.date_clauses.is_empty()
            && self.mime_types.is_empty()
    }
}

impl Default for NativeRequest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_milli_opt(h, min, s, 750)
            .unwrap()
    }

    #[test]
    fn test_page_size_raw() {
        assert_eq!(PageSize::Unbounded.as_raw(), -1);
        assert_eq!(PageSize::Limit(5).as_raw(), 5);
        assert_eq!(PageSize::Limit(u64::MAX).as_raw(), i64::MAX);
    }

    #[test]
    fn test_calendar_parts_truncate_to_second() {
        let parts = CalendarParts::from_naive(&at(2021, 3, 9, 14, 5, 59));
        assert_eq!(
            parts,
            CalendarParts {
                year: 2021,
                month: 3,
                day: 9,
                hour: 14,
                minute: 5,
                second: 59
            }
        );
        assert_eq!(parts.to_string(), "2021-03-09 14:05:59");
    }

    #[test]
    fn test_date_clause_display() {
        let clause = DateClause::after(DateColumn::PostModified, &at(2020, 1, 1, 0, 0, 0));
        assert_eq!(clause.to_string(), "post_modified >= 2020-01-01 00:00:00");
        assert!(clause.inclusive);
    }

    #[test]
    fn test_search_string() {
        let mut request = NativeRequest::new();
        assert_eq!(request.search_string(), None);

        request.keywords = vec!["red car".into(), "logo".into()];
        assert_eq!(
            request.search_string().as_deref(),
            Some("\"red car\" \"logo\"")
        );
    }

    #[test]
    fn test_new_request_unconstrained() {
        let request = NativeRequest::new();
        assert!(request.is_unconstrained());
        assert_eq!(request.post_type, "attachment");
        assert!(request.page_size.is_unbounded());
    }

    #[test]
    fn test_serialize_page_size_as_raw() {
        let value = serde_json::to_value(PageSize::Unbounded).unwrap();
        assert_eq!(value, serde_json::json!(-1));
    }
}
