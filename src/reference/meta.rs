//! Meta table lookup
//!
//! Builds `SELECT \`meta_id\` FROM \`<prefix><type>meta\` ...` against one
//! of the store's key/value meta tables (`postmeta`, `termmeta`, ...).

use serde_json::Value;

use crate::comparison::{
    quote_identifier, ComparisonBuilder, ComparisonOperator, ComparisonResult,
};

/// Lookup of meta rows by key and value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaLookup {
    meta_type: String,
    table_prefix: String,
    key: Option<String>,
    value: Option<String>,
    operator: ComparisonOperator,
    limit: Option<u64>,
}

impl MetaLookup {
    /// Lookup against `<table_prefix><meta_type>meta`, limited to one row
    pub fn new(meta_type: impl Into<String>, table_prefix: impl Into<String>) -> Self {
        Self {
            meta_type: meta_type.into(),
            table_prefix: table_prefix.into(),
            key: None,
            value: None,
            operator: ComparisonOperator::Eq,
            limit: Some(1),
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Operator applied to `meta_value`; validated immediately
    pub fn operator(mut self, operator: &str) -> ComparisonResult<Self> {
        self.operator = ComparisonOperator::parse(operator)?;
        Ok(self)
    }

    /// `None` removes the limit
    pub fn limit(mut self, limit: Option<u64>) -> Self {
        self.limit = limit;
        self
    }

    pub fn table(&self) -> String {
        format!("{}{}meta", self.table_prefix, self.meta_type)
    }

    /// Renders the lookup as a single statement
    pub fn to_sql(&self, builder: &ComparisonBuilder<'_>) -> ComparisonResult<String> {
        let mut query = vec![
            "SELECT `meta_id`".to_string(),
            format!("FROM {}", quote_identifier(&self.table())?),
        ];

        let mut conditions = Vec::new();
        if let Some(key) = &self.key {
            conditions.push(builder.eq("meta_key", &Value::String(key.clone()))?.to_string());
        }
        if let Some(value) = &self.value {
            conditions.push(
                builder
                    .build("meta_value", &Value::String(value.clone()), self.operator)?
                    .to_string(),
            );
        }
        if !conditions.is_empty() {
            query.push(format!("WHERE {}", conditions.join(" AND ")));
        }

        if let Some(limit) = self.limit {
            query.push(format!("LIMIT {}", limit));
        }

        Ok(query.join("\n"))
    }
}
