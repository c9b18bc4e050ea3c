//! Reverse-reference search over the SQL store
//!
//! Backs the "in use" flag: an item is in use when it is a post or term
//! thumbnail, or when its file name appears in searchable post content.
//! Every statement is built through `ComparisonBuilder`.

mod content;
mod meta;
mod search;

pub use content::ContentSearch;
pub use meta::MetaLookup;
pub use search::{SqlExecutor, SqlReferenceSearch, POST_THUMBNAIL_KEY, TERM_THUMBNAIL_KEY};
