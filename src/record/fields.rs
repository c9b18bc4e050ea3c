//! Output fields of a record
//!
//! A fixed enumeration maps each field tag to a typed accessor and its
//! formatter. Only requested fields are resolved, so asking for
//! `is_in_use` is what triggers the expensive reference scan.

use std::fmt;

use serde_json::{json, Value};

use super::errors::ResolveResult;
use super::record::Record;

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const SIZE_UNITS: &[(&str, u64)] = &[
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
    ("B", 1),
];

/// A field a consumer can read from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordField {
    Id,
    FileName,
    FilePath,
    FileUrl,
    FileSize,
    MediaType,
    MediaSize,
    MediaWidth,
    MediaHeight,
    PostDate,
    PostModified,
    PostStatus,
    PostAuthor,
    PostMimeType,
    PostParent,
    IsInUse,
    IsAttached,
    IsFileExists,
}

impl RecordField {
    pub const ALL: [RecordField; 18] = [
        RecordField::Id,
        RecordField::FileName,
        RecordField::FilePath,
        RecordField::FileUrl,
        RecordField::FileSize,
        RecordField::MediaType,
        RecordField::MediaSize,
        RecordField::MediaWidth,
        RecordField::MediaHeight,
        RecordField::PostDate,
        RecordField::PostModified,
        RecordField::PostStatus,
        RecordField::PostAuthor,
        RecordField::PostMimeType,
        RecordField::PostParent,
        RecordField::IsInUse,
        RecordField::IsAttached,
        RecordField::IsFileExists,
    ];

    /// Fields shown when the consumer does not ask for specific ones
    pub const DEFAULT: [RecordField; 4] = [
        RecordField::Id,
        RecordField::FileName,
        RecordField::PostDate,
        RecordField::PostStatus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordField::Id => "id",
            RecordField::FileName => "file_name",
            RecordField::FilePath => "file_path",
            RecordField::FileUrl => "file_url",
            RecordField::FileSize => "file_size",
            RecordField::MediaType => "media_type",
            RecordField::MediaSize => "media_size",
            RecordField::MediaWidth => "media_width",
            RecordField::MediaHeight => "media_height",
            RecordField::PostDate => "post_date",
            RecordField::PostModified => "post_modified",
            RecordField::PostStatus => "post_status",
            RecordField::PostAuthor => "post_author",
            RecordField::PostMimeType => "post_mime_type",
            RecordField::PostParent => "post_parent",
            RecordField::IsInUse => "is_in_use",
            RecordField::IsAttached => "is_attached",
            RecordField::IsFileExists => "is_file_exists",
        }
    }

    /// Parses a field tag; `ID` is accepted for `id`
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if tag == "ID" {
            return Some(RecordField::Id);
        }
        Self::ALL.iter().copied().find(|f| f.as_str() == tag)
    }

    /// Parses a comma-separated field list, rejecting unknown tags
    pub fn parse_list(list: &str) -> Result<Vec<Self>, String> {
        list.split(',')
            .filter(|tag| !tag.trim().is_empty())
            .map(|tag| Self::parse(tag).ok_or_else(|| format!("Invalid field `{}`", tag.trim())))
            .collect()
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human file size, base 1024, rounded to a whole unit (`1,023 B`, `2 KB`)
pub fn format_file_size(bytes: u64) -> String {
    for (unit, factor) in SIZE_UNITS {
        if bytes >= *factor {
            let scaled = (bytes as f64 / *factor as f64).round() as u64;
            return format!("{} {}", group_thousands(scaled), unit);
        }
    }
    "0 B".to_string()
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

fn opt<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

impl Record<'_> {
    /// Resolves and formats a single output field
    pub fn field_value(&self, field: RecordField) -> ResolveResult<Value> {
        let value = match field {
            RecordField::Id => json!(self.id()),
            RecordField::FileName => opt(self.file_name()?),
            RecordField::FilePath => opt(self.file_path()?),
            RecordField::FileUrl => opt(self.file_url()?),
            RecordField::FileSize => opt(self.file_size()?.map(format_file_size)),
            RecordField::MediaType => opt(self.media_type()?),
            RecordField::MediaSize => opt(self.media_size()?),
            RecordField::MediaWidth => opt(self.media_width()?),
            RecordField::MediaHeight => opt(self.media_height()?),
            RecordField::PostDate => json!(self.post_date()?.format(DATE_FORMAT).to_string()),
            RecordField::PostModified => {
                json!(self.post_modified()?.format(DATE_FORMAT).to_string())
            }
            RecordField::PostStatus => json!(self.post_status()?),
            RecordField::PostAuthor => opt(self.post_author()?.map(|u| u.display_name.clone())),
            RecordField::PostMimeType => json!(self.post_mime_type()?),
            RecordField::PostParent => opt(self.post_parent()?.map(|p| p.name.clone())),
            RecordField::IsInUse => json!(self.is_in_use()?),
            RecordField::IsAttached => json!(self.is_attached()?),
            RecordField::IsFileExists => json!(self.is_file_exists()?),
        };
        Ok(value)
    }

    /// Resolves the requested fields, in the requested order
    pub fn to_row(&self, fields: &[RecordField]) -> ResolveResult<Vec<(RecordField, Value)>> {
        fields
            .iter()
            .map(|field| Ok((*field, self.field_value(*field)?)))
            .collect()
    }
}
