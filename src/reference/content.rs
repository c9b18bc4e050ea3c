//! Substring search over post content
//!
//! A reference is a plain substring match of the file name inside
//! `post_content`, limited to the searchable post types. It both
//! over-matches (similar names) and under-matches (references stored
//! elsewhere).

use serde_json::Value;

use crate::comparison::{quote_identifier, ComparisonBuilder, ComparisonOperator, ComparisonResult};

/// Builder for the content reference count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSearch {
    table_prefix: String,
    post_types: Vec<String>,
}

impl ContentSearch {
    pub fn new(table_prefix: impl Into<String>, post_types: Vec<String>) -> Self {
        Self {
            table_prefix: table_prefix.into(),
            post_types,
        }
    }

    /// Renders the count statement, or `None` when there is nothing to
    /// look for (no needles, or no post types to search)
    pub fn to_sql(
        &self,
        needles: &[String],
        builder: &ComparisonBuilder<'_>,
    ) -> ComparisonResult<Option<String>> {
        if needles.is_empty() || self.post_types.is_empty() {
            return Ok(None);
        }

        let search = needles
            .iter()
            .map(|needle| {
                builder
                    .build(
                        "post_content",
                        &Value::String(format!("%{}%", needle)),
                        ComparisonOperator::Like,
                    )
                    .map(|clause| clause.to_string())
            })
            .collect::<ComparisonResult<Vec<_>>>()?
            .join(" OR ");

        let post_types = self
            .post_types
            .iter()
            .map(|t| builder.escape_value(&Value::String(t.clone())))
            .collect::<ComparisonResult<Vec<_>>>()?
            .join(",");

        let table = quote_identifier(&format!("{}posts", self.table_prefix))?;
        let query = [
            "SELECT COUNT(*)".to_string(),
            format!("FROM {}", table),
            format!("WHERE ({}) AND `post_type` IN ({})", search, post_types),
            "LIMIT 1".to_string(),
        ];
        Ok(Some(query.join("\n")))
    }
}
