//! Collaborator contracts consumed by `Record`
//!
//! All collaborators are passed in explicitly; nothing here reaches for
//! global state.

use std::fs;
use std::io;
use std::path::Path;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::errors::{LookupError, LookupResult};
use crate::mime::MimeTypeRegistry;
use crate::store::RecordId;

/// Read-only view of a post row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostView {
    pub id: RecordId,
    /// URL slug
    pub name: String,
    /// Parent post id, 0 when unattached
    pub parent: RecordId,
    pub author: u64,
    pub mime_type: String,
    pub status: String,
    pub date: NaiveDateTime,
    pub modified: NaiveDateTime,
}

/// Read-only view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: u64,
    pub display_name: String,
}

/// A registered resized copy of an image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeVariant {
    /// Registered size name (`thumbnail`, `medium`, ...)
    pub name: String,
    /// File name of the variant, relative to the original's directory
    pub file: String,
    pub width: Option<u64>,
    pub height: Option<u64>,
}

/// Attachment metadata; dimensions are absent for non-image media
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentMetadata {
    pub width: Option<u64>,
    pub height: Option<u64>,
    #[serde(default)]
    pub sizes: Vec<SizeVariant>,
}

/// Post, user and attachment lookups
pub trait MetadataResolver {
    /// Stored relative file name (`2020/01/photo.jpg`)
    fn attached_file_name(&self, id: RecordId) -> LookupResult<Option<String>>;

    /// Absolute path of the attached file
    fn file_path(&self, id: RecordId) -> LookupResult<Option<String>>;

    /// Public URL of the attached file
    fn file_url(&self, id: RecordId) -> LookupResult<Option<String>>;

    fn attachment_metadata(&self, id: RecordId) -> LookupResult<Option<AttachmentMetadata>>;

    fn post(&self, id: RecordId) -> LookupResult<Option<PostView>>;

    /// Author of the record, `None` if unset or no longer existing
    fn post_author(&self, id: RecordId) -> LookupResult<Option<UserView>>;
}

/// Reverse-reference lookups backing the "in use" flag. Each call may
/// scan whole tables.
pub trait ReferenceSearch {
    /// True if any needle appears as a substring in searchable content
    fn is_referenced_in_content(&self, needles: &[String]) -> LookupResult<bool>;

    fn is_thumbnail_of_post(&self, id: RecordId) -> LookupResult<bool>;

    fn is_thumbnail_of_term(&self, id: RecordId) -> LookupResult<bool>;
}

/// Filesystem probe: `Some(size)` if the file exists, `None` otherwise
pub trait FileProbe {
    fn stat(&self, path: &Path) -> LookupResult<Option<u64>>;
}

/// `FileProbe` over the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileProbe;

impl FileProbe for LocalFileProbe {
    fn stat(&self, path: &Path) -> LookupResult<Option<u64>> {
        match fs::metadata(path) {
            Ok(meta) if meta.is_file() => Ok(Some(meta.len())),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(LookupError::from(e)),
        }
    }
}

/// Everything a `Record` needs to resolve its fields
#[derive(Clone, Copy)]
pub struct Resolvers<'a> {
    pub metadata: &'a dyn MetadataResolver,
    pub references: &'a dyn ReferenceSearch,
    pub files: &'a dyn FileProbe,
    pub mime_types: &'a MimeTypeRegistry,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_local_probe_existing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("photo.jpg");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[0u8; 2048]).unwrap();

        assert_eq!(LocalFileProbe.stat(&path).unwrap(), Some(2048));
    }

    #[test]
    fn test_local_probe_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("gone.png");
        assert_eq!(LocalFileProbe.stat(&path).unwrap(), None);
    }

    #[test]
    fn test_local_probe_directory_is_not_a_file() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(LocalFileProbe.stat(tmp.path()).unwrap(), None);
    }

    #[test]
    fn test_metadata_deserialize_without_sizes() {
        let meta: AttachmentMetadata =
            serde_json::from_str(r#"{"width": 640, "height": null}"#).unwrap();
        assert_eq!(meta.width, Some(640));
        assert_eq!(meta.height, None);
        assert!(meta.sizes.is_empty());
    }
}
