//! Sort order and the native/virtual field table
//!
//! The split between native and virtual fields is fixed here and is not
//! configurable per query. Any field name that is not virtual is treated
//! as native and handed to the store, which rejects or ignores names it
//! does not understand.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::InvalidFieldValue;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }

    /// Parses `asc`/`desc`, case-insensitively
    pub fn parse(text: &str) -> Option<Self> {
        if text.eq_ignore_ascii_case("asc") {
            Some(SortDirection::Asc)
        } else if text.eq_ignore_ascii_case("desc") {
            Some(SortDirection::Desc)
        } else {
            None
        }
    }

    pub fn is_desc(&self) -> bool {
        matches!(self, SortDirection::Desc)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a field is evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Delegated to the record store
    Native,
    /// Computed after fetching and resolving a record
    Virtual,
}

/// Fields the store cannot filter or sort on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VirtualField {
    FileSize,
    MediaWidth,
    MediaHeight,
}

impl VirtualField {
    pub const ALL: [VirtualField; 3] = [
        VirtualField::FileSize,
        VirtualField::MediaWidth,
        VirtualField::MediaHeight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VirtualField::FileSize => "file_size",
            VirtualField::MediaWidth => "media_width",
            VirtualField::MediaHeight => "media_height",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

impl fmt::Display for VirtualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies a field name using the static table
pub fn classify(field: &str) -> FieldKind {
    if VirtualField::from_name(field).is_some() {
        FieldKind::Virtual
    } else {
        FieldKind::Native
    }
}

/// Ordered mapping from field name to direction.
///
/// Insertion order defines sort precedence. Re-inserting a field keeps its
/// original position and replaces the direction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderSpec {
    entries: Vec<(String, SortDirection)>,
}

impl OrderSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a field's direction
    pub fn insert(&mut self, field: impl Into<String>, direction: SortDirection) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = direction,
            None => self.entries.push((field, direction)),
        }
    }

    /// Builder form of `insert`
    pub fn then(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.insert(field, direction);
        self
    }

    /// Parses `field[.direction][,field[.direction]...]`.
    ///
    /// A missing direction means DESC. Empty segments are skipped.
    pub fn parse(text: &str) -> Result<Self, InvalidFieldValue> {
        let mut order = Self::new();
        for segment in text.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let (field, direction) = match segment.split_once('.') {
                Some((field, dir)) => {
                    let direction = SortDirection::parse(dir).ok_or_else(|| {
                        InvalidFieldValue::new(
                            "order",
                            format!("unknown direction `{}` for `{}`", dir, field),
                        )
                    })?;
                    (field, direction)
                }
                None => (segment, SortDirection::Desc),
            };
            if field.is_empty() {
                return Err(InvalidFieldValue::new("order", "empty field name"));
            }
            order.insert(field, direction);
        }
        Ok(order)
    }

    pub fn entries(&self) -> &[(String, SortDirection)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries restricted to virtual fields, in declared order
    pub fn virtual_order(&self) -> Vec<(VirtualField, SortDirection)> {
        self.entries
            .iter()
            .filter_map(|(name, dir)| VirtualField::from_name(name).map(|f| (f, *dir)))
            .collect()
    }

    /// Entries for everything that is not virtual, in declared order
    pub fn native_order(&self) -> Vec<(String, SortDirection)> {
        self.entries
            .iter()
            .filter(|(name, _)| classify(name) == FieldKind::Native)
            .cloned()
            .collect()
    }
}

impl<S: Into<String>> FromIterator<(S, SortDirection)> for OrderSpec {
    fn from_iter<I: IntoIterator<Item = (S, SortDirection)>>(iter: I) -> Self {
        let mut order = Self::new();
        for (field, direction) in iter {
            order.insert(field, direction);
        }
        order
    }
}
