//! Query specification subsystem
//!
//! Holds the declarative description of a media search: native filters
//! (keywords, parents, authors, dates, mime types), virtual filters
//! (file size, width, height, usage and existence flags), sort order and
//! limit.
//!
//! # Native vs virtual
//!
//! | Field                         | Kind    |
//! |-------------------------------|---------|
//! | keywords, authors, parents    | native  |
//! | post date, post modified      | native  |
//! | mime types, media type groups | native  |
//! | file size, width, height      | virtual |

mod errors;
mod order;
mod spec;

pub use errors::InvalidFieldValue;
pub use order::{classify, FieldKind, OrderSpec, SortDirection, VirtualField};
pub use spec::{DateInput, QuerySpec, Range};
