//! `ReferenceSearch` over a SQL connection
//!
//! The connection itself is supplied by the caller as a `SqlExecutor`;
//! this module only builds statements and interprets their results.

use crate::comparison::{ComparisonBuilder, ComparisonError, MysqlEscaper};
use crate::config::EngineConfig;
use crate::record::{LookupError, LookupResult, ReferenceSearch};
use crate::store::RecordId;

use super::content::ContentSearch;
use super::meta::MetaLookup;

/// Meta key marking a post's featured image
pub const POST_THUMBNAIL_KEY: &str = "_thumbnail_id";

/// Meta key marking a term's thumbnail
pub const TERM_THUMBNAIL_KEY: &str = "thumbnail_id";

/// Raw statement execution against the store
pub trait SqlExecutor {
    /// First column of every returned row
    fn query_column(&self, sql: &str) -> LookupResult<Vec<String>>;

    /// First column of the first row, `None` for an empty result
    fn query_scalar(&self, sql: &str) -> LookupResult<Option<String>>;
}

impl From<ComparisonError> for LookupError {
    fn from(err: ComparisonError) -> Self {
        LookupError::new(format!("{}: {}", err.code(), err))
    }
}

/// Reference search backed by meta-table lookups and a content scan
pub struct SqlReferenceSearch<E: SqlExecutor> {
    executor: E,
    escaper: MysqlEscaper,
    table_prefix: String,
    content: ContentSearch,
}

impl<E: SqlExecutor> SqlReferenceSearch<E> {
    pub fn new(executor: E, config: &EngineConfig) -> Self {
        Self {
            executor,
            escaper: MysqlEscaper,
            table_prefix: config.table_prefix.clone(),
            content: ContentSearch::new(config.table_prefix.clone(), config.searchable_post_types()),
        }
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    fn has_meta(&self, meta_type: &str, key: &str, id: RecordId) -> LookupResult<bool> {
        let builder = ComparisonBuilder::new(&self.escaper);
        let sql = MetaLookup::new(meta_type, self.table_prefix.as_str())
            .key(key)
            .value(id.to_string())
            .to_sql(&builder)?;
        Ok(!self.executor.query_column(&sql)?.is_empty())
    }
}

impl<E: SqlExecutor> ReferenceSearch for SqlReferenceSearch<E> {
    fn is_referenced_in_content(&self, needles: &[String]) -> LookupResult<bool> {
        let builder = ComparisonBuilder::new(&self.escaper);
        let sql = match self.content.to_sql(needles, &builder)? {
            Some(sql) => sql,
            None => return Ok(false),
        };
        let count = self.executor.query_scalar(&sql)?;
        Ok(matches!(count.as_deref().map(str::trim), Some(n) if !n.is_empty() && n != "0"))
    }

    fn is_thumbnail_of_post(&self, id: RecordId) -> LookupResult<bool> {
        self.has_meta("post", POST_THUMBNAIL_KEY, id)
    }

    fn is_thumbnail_of_term(&self, id: RecordId) -> LookupResult<bool> {
        self.has_meta("term", TERM_THUMBNAIL_KEY, id)
    }
}
