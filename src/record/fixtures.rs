//! In-memory collaborators for unit tests

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use super::collaborators::{
    AttachmentMetadata, FileProbe, MetadataResolver, PostView, ReferenceSearch, Resolvers, UserView,
};
use super::errors::{LookupError, LookupResult};
use crate::mime::MimeTypeRegistry;
use crate::store::RecordId;

/// One stored media item
#[derive(Debug, Clone)]
pub(crate) struct Item {
    pub file_name: String,
    pub mime_type: String,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub bytes: Option<u64>,
    pub thumbnail: bool,
}

#[derive(Default)]
pub(crate) struct Fixture {
    items: HashMap<RecordId, Item>,
    failing: Vec<RecordId>,
    pub meta_calls: Cell<usize>,
    pub stat_calls: Cell<usize>,
    pub reference_calls: Cell<usize>,
    pub resolved: RefCell<Vec<RecordId>>,
}

fn date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2021, 3, 4)
        .and_then(|d| d.and_hms_opt(5, 6, 7))
        .unwrap_or_default()
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Image with known dimensions and on-disk size
    pub fn image(mut self, id: RecordId, width: u64, height: u64, bytes: u64) -> Self {
        self.items.insert(
            id,
            Item {
                file_name: format!("2021/03/img-{}.jpg", id),
                mime_type: "image/jpeg".to_string(),
                width: Some(width),
                height: Some(height),
                bytes: Some(bytes),
                thumbnail: false,
            },
        );
        self
    }

    /// Non-image item without dimensions
    pub fn document(mut self, id: RecordId, bytes: Option<u64>) -> Self {
        self.items.insert(
            id,
            Item {
                file_name: format!("2021/03/doc-{}.pdf", id),
                mime_type: "application/pdf".to_string(),
                width: None,
                height: None,
                bytes,
                thumbnail: false,
            },
        );
        self
    }

    pub fn thumbnail(mut self, id: RecordId) -> Self {
        if let Some(item) = self.items.get_mut(&id) {
            item.thumbnail = true;
        }
        self
    }

    /// Metadata lookups for `id` fail
    pub fn failing(mut self, id: RecordId) -> Self {
        self.failing.push(id);
        self
    }

    pub fn resolvers<'a>(&'a self, mime_types: &'a MimeTypeRegistry) -> Resolvers<'a> {
        Resolvers {
            metadata: self,
            references: self,
            files: self,
            mime_types,
        }
    }

    fn item(&self, id: RecordId) -> Option<&Item> {
        self.items.get(&id)
    }
}

impl MetadataResolver for Fixture {
    fn attached_file_name(&self, id: RecordId) -> LookupResult<Option<String>> {
        Ok(self.item(id).map(|i| i.file_name.clone()))
    }

    fn file_path(&self, id: RecordId) -> LookupResult<Option<String>> {
        Ok(self.item(id).map(|i| format!("/uploads/{}", i.file_name)))
    }

    fn file_url(&self, id: RecordId) -> LookupResult<Option<String>> {
        Ok(self.item(id).map(|i| format!("https://example.test/uploads/{}", i.file_name)))
    }

    fn attachment_metadata(&self, id: RecordId) -> LookupResult<Option<AttachmentMetadata>> {
        self.meta_calls.set(self.meta_calls.get() + 1);
        self.resolved.borrow_mut().push(id);
        if self.failing.contains(&id) {
            return Err(LookupError::new("metadata table unavailable"));
        }
        Ok(self.item(id).map(|i| AttachmentMetadata {
            width: i.width,
            height: i.height,
            sizes: Vec::new(),
        }))
    }

    fn post(&self, id: RecordId) -> LookupResult<Option<PostView>> {
        Ok(self.item(id).map(|i| PostView {
            id,
            name: format!("item-{}", id),
            parent: 0,
            author: 1,
            mime_type: i.mime_type.clone(),
            status: "inherit".to_string(),
            date: date(),
            modified: date(),
        }))
    }

    fn post_author(&self, _id: RecordId) -> LookupResult<Option<UserView>> {
        Ok(Some(UserView {
            id: 1,
            display_name: "Admin".to_string(),
        }))
    }
}

impl ReferenceSearch for Fixture {
    fn is_referenced_in_content(&self, _needles: &[String]) -> LookupResult<bool> {
        self.reference_calls.set(self.reference_calls.get() + 1);
        Ok(false)
    }

    fn is_thumbnail_of_post(&self, id: RecordId) -> LookupResult<bool> {
        self.reference_calls.set(self.reference_calls.get() + 1);
        Ok(self.item(id).map_or(false, |i| i.thumbnail))
    }

    fn is_thumbnail_of_term(&self, _id: RecordId) -> LookupResult<bool> {
        self.reference_calls.set(self.reference_calls.get() + 1);
        Ok(false)
    }
}

impl FileProbe for Fixture {
    fn stat(&self, path: &Path) -> LookupResult<Option<u64>> {
        self.stat_calls.set(self.stat_calls.get() + 1);
        let path = path.to_string_lossy();
        Ok(self
            .items
            .values()
            .find(|i| path.ends_with(&i.file_name))
            .and_then(|i| i.bytes))
    }
}
