//! Declarative query specification
//!
//! `QuerySpec` is a transparent data holder built incrementally by the
//! caller. Setters replace the previous value wholesale (list fields
//! replace the whole set). Nothing is validated here: the planner checks
//! every value when the query is executed.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};

use super::order::{OrderSpec, SortDirection, VirtualField};

/// Exact/min/max constraint on one field. Each part is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Range<T> {
    pub exact: Option<T>,
    pub min: Option<T>,
    pub max: Option<T>,
}

impl<T> Range<T> {
    pub fn is_unset(&self) -> bool {
        self.exact.is_none() && self.min.is_none() && self.max.is_none()
    }
}

impl<T> Default for Range<T> {
    fn default() -> Self {
        Self {
            exact: None,
            min: None,
            max: None,
        }
    }
}

/// A date as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateInput {
    /// Site-local calendar time
    Local(NaiveDateTime),
    /// An absolute instant, converted to site-local time when planned
    Instant(DateTime<Utc>),
    /// Free text, parsed when planned
    Text(String),
}

const TEXT_DATE_TIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl DateInput {
    /// Resolves to site-local calendar time, truncated to the second
    pub fn resolve(&self, site_offset: FixedOffset) -> Result<NaiveDateTime, String> {
        let local = match self {
            DateInput::Local(at) => *at,
            DateInput::Instant(at) => at.with_timezone(&site_offset).naive_local(),
            DateInput::Text(text) => parse_date_text(text.trim(), site_offset)?,
        };
        Ok(local.with_nanosecond(0).unwrap_or(local))
    }
}

fn parse_date_text(text: &str, site_offset: FixedOffset) -> Result<NaiveDateTime, String> {
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Ok(at.with_timezone(&site_offset).naive_local());
    }
    for format in TEXT_DATE_TIME_FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("unrecognised date `{}`", text))
}

impl From<NaiveDateTime> for DateInput {
    fn from(at: NaiveDateTime) -> Self {
        DateInput::Local(at)
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(at: DateTime<Utc>) -> Self {
        DateInput::Instant(at)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

/// What the caller wants: native filters, virtual filters, order and limit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySpec {
    pub(crate) keywords: Vec<String>,
    pub(crate) file_size: Range<i64>,
    pub(crate) media_width: Range<i64>,
    pub(crate) media_height: Range<i64>,
    pub(crate) media_types: Vec<String>,
    pub(crate) post_authors: Vec<u64>,
    pub(crate) post_parents: Vec<u64>,
    pub(crate) post_attached: Option<bool>,
    pub(crate) post_date: Range<DateInput>,
    pub(crate) post_modified: Range<DateInput>,
    pub(crate) post_mime_types: Vec<String>,
    pub(crate) in_use: Option<bool>,
    pub(crate) file_exists: Option<bool>,
    pub(crate) order: OrderSpec,
    pub(crate) limit: Option<i64>,
}

impl Default for QuerySpec {
    fn default() -> Self {
        Self {
            keywords: Vec::new(),
            file_size: Range::default(),
            media_width: Range::default(),
            media_height: Range::default(),
            media_types: Vec::new(),
            post_authors: Vec::new(),
            post_parents: Vec::new(),
            post_attached: None,
            post_date: Range::default(),
            post_modified: Range::default(),
            post_mime_types: Vec::new(),
            in_use: None,
            file_exists: None,
            order: OrderSpec::new().then("post_date", SortDirection::Desc),
            limit: None,
        }
    }
}

fn unique<T: PartialEq>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out = Vec::new();
    for value in values {
        if !out.contains(&value) {
            out.push(value);
        }
    }
    out
}

impl QuerySpec {
    /// An empty spec ordered by `post_date DESC`
    pub fn new() -> Self {
        Self::default()
    }

    // Native

    pub fn set_keywords<S: Into<String>>(&mut self, keywords: impl IntoIterator<Item = S>) {
        self.keywords = unique(keywords.into_iter().map(Into::into));
    }

    pub fn set_media_types<S: Into<String>>(&mut self, groups: impl IntoIterator<Item = S>) {
        self.media_types = unique(groups.into_iter().map(Into::into));
    }

    pub fn set_post_authors(&mut self, authors: impl IntoIterator<Item = u64>) {
        self.post_authors = unique(authors);
    }

    pub fn set_post_parents(&mut self, parents: impl IntoIterator<Item = u64>) {
        self.post_parents = unique(parents);
    }

    /// `Some(true)` attached only, `Some(false)` unattached only
    pub fn set_post_attached(&mut self, attached: Option<bool>) {
        self.post_attached = attached;
    }

    pub fn set_post_date(&mut self, date: Option<DateInput>) {
        self.post_date.exact = date;
    }

    pub fn set_post_date_min(&mut self, date: Option<DateInput>) {
        self.post_date.min = date;
    }

    pub fn set_post_date_max(&mut self, date: Option<DateInput>) {
        self.post_date.max = date;
    }

    pub fn set_post_modified(&mut self, date: Option<DateInput>) {
        self.post_modified.exact = date;
    }

    pub fn set_post_modified_min(&mut self, date: Option<DateInput>) {
        self.post_modified.min = date;
    }

    pub fn set_post_modified_max(&mut self, date: Option<DateInput>) {
        self.post_modified.max = date;
    }

    pub fn set_post_mime_types<S: Into<String>>(&mut self, types: impl IntoIterator<Item = S>) {
        self.post_mime_types = unique(types.into_iter().map(Into::into));
    }

    // Virtual

    pub fn set_file_size(&mut self, bytes: Option<i64>) {
        self.file_size.exact = bytes;
    }

    pub fn set_file_size_min(&mut self, bytes: Option<i64>) {
        self.file_size.min = bytes;
    }

    pub fn set_file_size_max(&mut self, bytes: Option<i64>) {
        self.file_size.max = bytes;
    }

    pub fn set_media_width(&mut self, px: Option<i64>) {
        self.media_width.exact = px;
    }

    pub fn set_media_width_min(&mut self, px: Option<i64>) {
        self.media_width.min = px;
    }

    pub fn set_media_width_max(&mut self, px: Option<i64>) {
        self.media_width.max = px;
    }

    pub fn set_media_height(&mut self, px: Option<i64>) {
        self.media_height.exact = px;
    }

    pub fn set_media_height_min(&mut self, px: Option<i64>) {
        self.media_height.min = px;
    }

    pub fn set_media_height_max(&mut self, px: Option<i64>) {
        self.media_height.max = px;
    }

    /// `Some(true)` only records referenced somewhere, `Some(false)` only
    /// unreferenced ones. Expensive to evaluate.
    pub fn set_in_use(&mut self, in_use: Option<bool>) {
        self.in_use = in_use;
    }

    pub fn set_file_exists(&mut self, exists: Option<bool>) {
        self.file_exists = exists;
    }

    // Order and limit

    pub fn set_order(&mut self, order: OrderSpec) {
        self.order = order;
    }

    /// `None` or a negative value means unbounded
    pub fn set_limit(&mut self, limit: Option<i64>) {
        self.limit = limit;
    }

    // Accessors

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn order(&self) -> &OrderSpec {
        &self.order
    }

    pub fn limit(&self) -> Option<i64> {
        self.limit
    }

    /// The effective limit: `None` when unset or negative
    pub fn effective_limit(&self) -> Option<u64> {
        self.limit.and_then(|l| u64::try_from(l).ok())
    }

    pub fn virtual_range(&self, field: VirtualField) -> &Range<i64> {
        match field {
            VirtualField::FileSize => &self.file_size,
            VirtualField::MediaWidth => &self.media_width,
            VirtualField::MediaHeight => &self.media_height,
        }
    }

    /// Order entries on virtual fields, in declared order
    pub fn virtual_order(&self) -> Vec<(VirtualField, SortDirection)> {
        self.order.virtual_order()
    }

    /// Order entries on everything else, in declared order
    pub fn native_order(&self) -> Vec<(String, SortDirection)> {
        self.order.native_order()
    }
}
