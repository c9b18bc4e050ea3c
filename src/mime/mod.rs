//! Mime-type groups (`image`, `video`, ...) and their expansion into
//! concrete mime types for the native store.

mod registry;

pub use registry::{MimeGroup, MimeTypeRegistry};
