//! Safe equality/range predicates against a tabular store
//!
//! Identifiers are validated against a fixed pattern and back-quoted;
//! values are rendered as literals (`NULL`, unquoted numerics, or quoted
//! strings escaped by the store's `ValueEscaper`). Pure and deterministic.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use super::errors::{ComparisonError, ComparisonResult};
use super::escape::ValueEscaper;

const IDENTIFIER_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9_-]*$";

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(IDENTIFIER_PATTERN).expect("valid regex"))
}

/// Allowed comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Eq,
    NotEq,
    LtGt,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    NotLike,
    Rlike,
    NotRlike,
}

impl ComparisonOperator {
    /// Every allowed operator, in canonical order
    pub const ALL: [ComparisonOperator; 11] = [
        ComparisonOperator::Eq,
        ComparisonOperator::NotEq,
        ComparisonOperator::LtGt,
        ComparisonOperator::Gt,
        ComparisonOperator::Gte,
        ComparisonOperator::Lt,
        ComparisonOperator::Lte,
        ComparisonOperator::Like,
        ComparisonOperator::NotLike,
        ComparisonOperator::Rlike,
        ComparisonOperator::NotRlike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "=",
            ComparisonOperator::NotEq => "!=",
            ComparisonOperator::LtGt => "<>",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
            ComparisonOperator::Like => "LIKE",
            ComparisonOperator::NotLike => "NOT LIKE",
            ComparisonOperator::Rlike => "RLIKE",
            ComparisonOperator::NotRlike => "NOT RLIKE",
        }
    }

    /// Parses an operator, case-insensitively.
    ///
    /// Fails with `InvalidOperator` when the uppercased text is not one
    /// of the allowed operators.
    pub fn parse(op: &str) -> ComparisonResult<Self> {
        let upper = op.to_uppercase();
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| candidate.as_str() == upper)
            .ok_or_else(|| ComparisonError::InvalidOperator {
                operator: upper,
                allowed: Self::allowed_list(),
            })
    }

    fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl Default for ComparisonOperator {
    fn default() -> Self {
        ComparisonOperator::Eq
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validates an operator string without keeping the parsed value
pub fn validate_operator(op: &str) -> ComparisonResult<()> {
    ComparisonOperator::parse(op).map(|_| ())
}

/// A validated `identifier operator literal` clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonClause {
    identifier: String,
    operator: ComparisonOperator,
    literal: String,
}

impl ComparisonClause {
    /// The bare (unquoted) identifier
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn operator(&self) -> ComparisonOperator {
        self.operator
    }

    /// The rendered value literal (already escaped and quoted if needed)
    pub fn literal(&self) -> &str {
        &self.literal
    }
}

impl fmt::Display for ComparisonClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {} {}", self.identifier, self.operator, self.literal)
    }
}

/// Builds comparison clauses using a store-specific escaper
pub struct ComparisonBuilder<'a> {
    escaper: &'a dyn ValueEscaper,
}

impl<'a> ComparisonBuilder<'a> {
    pub fn new(escaper: &'a dyn ValueEscaper) -> Self {
        Self { escaper }
    }

    /// Builds `identifier = value`
    pub fn eq(&self, identifier: &str, value: &Value) -> ComparisonResult<ComparisonClause> {
        self.build(identifier, value, ComparisonOperator::Eq)
    }

    /// Builds a clause from an operator given as text
    pub fn build_str(
        &self,
        identifier: &str,
        value: &Value,
        operator: &str,
    ) -> ComparisonResult<ComparisonClause> {
        let operator = ComparisonOperator::parse(operator)?;
        self.build(identifier, value, operator)
    }

    /// Builds `identifier operator value`.
    ///
    /// Fails with `InvalidIdentifier` if the identifier does not match the
    /// allowed pattern, and `UnsupportedValueType` for arrays and objects.
    pub fn build(
        &self,
        identifier: &str,
        value: &Value,
        operator: ComparisonOperator,
    ) -> ComparisonResult<ComparisonClause> {
        let literal = self.escape_value(value)?;
        let identifier = escape_identifier(identifier)?;
        Ok(ComparisonClause {
            identifier: identifier.to_string(),
            operator,
            literal,
        })
    }

    /// Renders a scalar as a literal
    pub fn escape_value(&self, value: &Value) -> ComparisonResult<String> {
        match value {
            Value::Null => Ok("NULL".to_string()),
            Value::Number(n) => Ok(n.to_string()),
            Value::String(s) => Ok(self.quote(s)),
            // Booleans stringify the way the store casts them: "1" / ""
            Value::Bool(b) => Ok(self.quote(if *b { "1" } else { "" })),
            Value::Array(_) => Err(ComparisonError::UnsupportedValueType("array")),
            Value::Object(_) => Err(ComparisonError::UnsupportedValueType("object")),
        }
    }

    fn quote(&self, raw: &str) -> String {
        format!("'{}'", self.escaper.escape_str(raw))
    }
}

/// Validates an identifier and returns it back-quoted
pub fn quote_identifier(identifier: &str) -> ComparisonResult<String> {
    escape_identifier(identifier).map(|id| format!("`{}`", id))
}

fn escape_identifier(identifier: &str) -> ComparisonResult<&str> {
    if identifier_regex().is_match(identifier) {
        Ok(identifier)
    } else {
        Err(ComparisonError::InvalidIdentifier(identifier.to_string()))
    }
}
