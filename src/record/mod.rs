//! Record subsystem
//!
//! A `Record` is one media item whose attributes are resolved on first
//! read through explicitly injected collaborators and cached for the
//! record's lifetime. Records are created per query and never shared
//! across queries or threads.

mod collaborators;
mod errors;
mod fields;
#[cfg(test)]
pub(crate) mod fixtures;
#[allow(clippy::module_inception)]
mod record;

pub use collaborators::{
    AttachmentMetadata, FileProbe, LocalFileProbe, MetadataResolver, PostView, ReferenceSearch,
    Resolvers, SizeVariant, UserView,
};
pub use errors::{LookupError, LookupResult, ResolutionFailed, ResolveResult};
pub use fields::{format_file_size, RecordField};
pub use record::Record;
