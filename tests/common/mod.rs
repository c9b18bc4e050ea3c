//! Shared test collaborators
//!
//! `Library` is an in-memory media library acting as record store,
//! metadata resolver, reference search and file probe at once. Every
//! collaborator call is counted so tests can assert laziness.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};

use media_query::mime::MimeTypeRegistry;
use media_query::observability::{Logger, Severity};
use media_query::record::{
    AttachmentMetadata, FileProbe, LookupError, LookupResult, MetadataResolver, PostView,
    ReferenceSearch, Resolvers, SizeVariant, UserView,
};
use media_query::store::{NativeRequest, PageSize, RecordId, RecordStore, StoreError, StoreResult};
use media_query::{EngineConfig, QueryEngine};

/// One media item in the library
#[derive(Debug, Clone)]
pub struct Media {
    pub id: RecordId,
    pub file: String,
    pub mime_type: String,
    pub width: Option<u64>,
    pub height: Option<u64>,
    pub bytes: Option<u64>,
    pub parent: RecordId,
    pub sizes: Vec<SizeVariant>,
    pub post_thumbnail: bool,
}

impl Media {
    pub fn image(id: RecordId, width: u64, height: u64) -> Self {
        Self {
            id,
            file: format!("2022/05/photo-{}.jpg", id),
            mime_type: "image/jpeg".to_string(),
            width: Some(width),
            height: Some(height),
            bytes: Some(width * height),
            parent: 0,
            sizes: Vec::new(),
            post_thumbnail: false,
        }
    }

    pub fn video(id: RecordId) -> Self {
        Self {
            id,
            file: format!("2022/05/clip-{}.mp4", id),
            mime_type: "video/mp4".to_string(),
            width: None,
            height: None,
            bytes: Some(1_000_000),
            parent: 0,
            sizes: Vec::new(),
            post_thumbnail: false,
        }
    }

    pub fn bytes(mut self, bytes: Option<u64>) -> Self {
        self.bytes = bytes;
        self
    }

    pub fn parent(mut self, parent: RecordId) -> Self {
        self.parent = parent;
        self
    }

    pub fn variant(mut self, name: &str, file: &str) -> Self {
        self.sizes.push(SizeVariant {
            name: name.to_string(),
            file: file.to_string(),
            width: None,
            height: None,
        });
        self
    }

    pub fn post_thumbnail(mut self) -> Self {
        self.post_thumbnail = true;
        self
    }
}

/// In-memory media library with counting collaborators
#[derive(Default)]
pub struct Library {
    items: Vec<Media>,
    /// Bodies of searchable posts, scanned for file names
    content: Vec<String>,
    store_error: Option<StoreError>,
    honor_page_size: bool,
    failing_metadata: Vec<RecordId>,

    pub requests: RefCell<Vec<NativeRequest>>,
    /// Ids whose attachment metadata was looked up, in call order
    pub metadata_lookups: RefCell<Vec<RecordId>>,
    pub post_lookups: Cell<usize>,
    pub reference_calls: Cell<usize>,
    pub stat_calls: Cell<usize>,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, media: Media) -> Self {
        self.items.push(media);
        self
    }

    pub fn content(mut self, body: &str) -> Self {
        self.content.push(body.to_string());
        self
    }

    pub fn store_error(mut self, error: StoreError) -> Self {
        self.store_error = Some(error);
        self
    }

    /// Truncate search results to the request's page size
    pub fn honor_page_size(mut self) -> Self {
        self.honor_page_size = true;
        self
    }

    pub fn failing_metadata(mut self, id: RecordId) -> Self {
        self.failing_metadata.push(id);
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

    /// Engine over this library with logging silenced
    pub fn engine<'a>(&'a self, mime_types: &'a MimeTypeRegistry) -> QueryEngine<'a> {
        QueryEngine::new(self, self.resolvers(mime_types), &EngineConfig::default())
            .with_logger(Logger::new(Severity::Error))
    }

    pub fn last_request(&self) -> NativeRequest {
        self.requests.borrow().last().cloned().unwrap_or_default()
    }

    fn item(&self, id: RecordId) -> Option<&Media> {
        self.items.iter().find(|m| m.id == id)
    }
}

pub fn upload_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 5, 17)
        .and_then(|d| d.and_hms_opt(9, 30, 0))
        .unwrap()
}

impl RecordStore for Library {
    fn search(&self, request: &NativeRequest) -> StoreResult<Vec<RecordId>> {
        self.requests.borrow_mut().push(request.clone());
        if let Some(err) = &self.store_error {
            return Err(err.clone());
        }

        let mut ids: Vec<RecordId> = self
            .items
            .iter()
            .filter(|m| request.mime_types.is_empty() || request.mime_types.contains(&m.mime_type))
            .filter(|m| request.parent_in.is_empty() || request.parent_in.contains(&m.parent))
            .filter(|m| !request.parent_not_in.contains(&m.parent))
            .map(|m| m.id)
            .collect();

        if let (true, PageSize::Limit(n)) = (self.honor_page_size, request.page_size) {
            ids.truncate(n as usize);
        }
        Ok(ids)
    }
}

impl MetadataResolver for Library {
    fn attached_file_name(&self, id: RecordId) -> LookupResult<Option<String>> {
        Ok(self.item(id).map(|m| m.file.clone()))
    }

    fn file_path(&self, id: RecordId) -> LookupResult<Option<String>> {
        Ok(self.item(id).map(|m| format!("/srv/uploads/{}", m.file)))
    }

    fn file_url(&self, id: RecordId) -> LookupResult<Option<String>> {
        Ok(self.item(id).map(|m| format!("https://media.test/uploads/{}", m.file)))
    }

    fn attachment_metadata(&self, id: RecordId) -> LookupResult<Option<AttachmentMetadata>> {
        self.metadata_lookups.borrow_mut().push(id);
        if self.failing_metadata.contains(&id) {
            return Err(LookupError::new("lost connection to metadata table"));
        }
        Ok(self.item(id).map(|m| AttachmentMetadata {
            width: m.width,
            height: m.height,
            sizes: m.sizes.clone(),
        }))
    }

    fn post(&self, id: RecordId) -> LookupResult<Option<PostView>> {
        self.post_lookups.set(self.post_lookups.get() + 1);
        if let Some(m) = self.item(id) {
            return Ok(Some(PostView {
                id,
                name: format!("media-{}", id),
                parent: m.parent,
                author: 1,
                mime_type: m.mime_type.clone(),
                status: "inherit".to_string(),
                date: upload_date(),
                modified: upload_date(),
            }));
        }
        // Any other id is a regular post acting as a parent
        Ok(Some(PostView {
            id,
            name: format!("post-{}", id),
            parent: 0,
            author: 1,
            mime_type: String::new(),
            status: "publish".to_string(),
            date: upload_date(),
            modified: upload_date(),
        }))
    }

    fn post_author(&self, _id: RecordId) -> LookupResult<Option<UserView>> {
        Ok(Some(UserView {
            id: 1,
            display_name: "Editor".to_string(),
        }))
    }
}

impl ReferenceSearch for Library {
    fn is_referenced_in_content(&self, needles: &[String]) -> LookupResult<bool> {
        self.reference_calls.set(self.reference_calls.get() + 1);
        Ok(self
            .content
            .iter()
            .any(|body| needles.iter().any(|needle| body.contains(needle.as_str()))))
    }

    fn is_thumbnail_of_post(&self, id: RecordId) -> LookupResult<bool> {
        self.reference_calls.set(self.reference_calls.get() + 1);
        Ok(self.item(id).map_or(false, |m| m.post_thumbnail))
    }

    fn is_thumbnail_of_term(&self, _id: RecordId) -> LookupResult<bool> {
        self.reference_calls.set(self.reference_calls.get() + 1);
        Ok(false)
    }
}

impl FileProbe for Library {
    fn stat(&self, path: &Path) -> LookupResult<Option<u64>> {
        self.stat_calls.set(self.stat_calls.get() + 1);
        let path = path.to_string_lossy();
        Ok(self
            .items
            .iter()
            .find(|m| path.ends_with(&m.file))
            .and_then(|m| m.bytes))
    }
}

/// Collects ids, panicking on the first error
pub fn collect_ids<'a>(
    stream: impl Iterator<Item = media_query::QueryResult<media_query::Record<'a>>>,
) -> Vec<RecordId> {
    stream.map(|r| r.unwrap().id()).collect()
}
