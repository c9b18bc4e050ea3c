//! Lazily resolved media record
//!
//! Every attribute is fetched from a collaborator on first access and
//! cached in a per-field cell for the record's lifetime. A second access
//! never calls the collaborator again. Failed lookups are not cached.

use std::cell::OnceCell;
use std::path::Path;

use chrono::NaiveDateTime;

use super::collaborators::{AttachmentMetadata, PostView, Resolvers, SizeVariant, UserView};
use super::errors::{LookupError, LookupResult, ResolutionFailed, ResolveResult};
use crate::query::VirtualField;
use crate::store::RecordId;

/// One media item plus its lazily resolved attributes
pub struct Record<'a> {
    id: RecordId,
    resolvers: Resolvers<'a>,
    post: OnceCell<PostView>,
    meta: OnceCell<Option<AttachmentMetadata>>,
    file_name: OnceCell<Option<String>>,
    file_path: OnceCell<Option<String>>,
    file_url: OnceCell<Option<String>>,
    file_stat: OnceCell<Option<u64>>,
    author: OnceCell<Option<UserView>>,
    parent: OnceCell<Option<PostView>>,
    in_use: OnceCell<bool>,
}

/// Returns the cached value, or runs `lookup` once and caches its result
fn resolve<'r, T>(
    cell: &'r OnceCell<T>,
    id: RecordId,
    field: &'static str,
    lookup: impl FnOnce() -> LookupResult<T>,
) -> ResolveResult<&'r T> {
    if let Some(value) = cell.get() {
        return Ok(value);
    }
    let value = lookup().map_err(|e| ResolutionFailed::new(id, field, e))?;
    Ok(cell.get_or_init(|| value))
}

impl<'a> Record<'a> {
    pub fn new(id: RecordId, resolvers: Resolvers<'a>) -> Self {
        Self {
            id,
            resolvers,
            post: OnceCell::new(),
            meta: OnceCell::new(),
            file_name: OnceCell::new(),
            file_path: OnceCell::new(),
            file_url: OnceCell::new(),
            file_stat: OnceCell::new(),
            author: OnceCell::new(),
            parent: OnceCell::new(),
            in_use: OnceCell::new(),
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Stored relative file name
    pub fn file_name(&self) -> ResolveResult<Option<&str>> {
        let metadata = self.resolvers.metadata;
        let id = self.id;
        resolve(&self.file_name, id, "file_name", || metadata.attached_file_name(id))
            .map(|v| v.as_deref())
    }

    pub fn file_path(&self) -> ResolveResult<Option<&str>> {
        let metadata = self.resolvers.metadata;
        let id = self.id;
        resolve(&self.file_path, id, "file_path", || metadata.file_path(id)).map(|v| v.as_deref())
    }

    pub fn file_url(&self) -> ResolveResult<Option<&str>> {
        let metadata = self.resolvers.metadata;
        let id = self.id;
        resolve(&self.file_url, id, "file_url", || metadata.file_url(id)).map(|v| v.as_deref())
    }

    /// Size on disk; `None` when the file is missing or has no path
    pub fn file_size(&self) -> ResolveResult<Option<u64>> {
        self.file_stat()
    }

    pub fn is_file_exists(&self) -> ResolveResult<bool> {
        Ok(self.file_stat()?.is_some())
    }

    fn file_stat(&self) -> ResolveResult<Option<u64>> {
        if let Some(stat) = self.file_stat.get() {
            return Ok(*stat);
        }
        let path = self.file_path()?;
        let files = self.resolvers.files;
        let stat = resolve(&self.file_stat, self.id, "file_size", || match path {
            Some(path) if !path.is_empty() => files.stat(Path::new(path)),
            _ => Ok(None),
        })?;
        Ok(*stat)
    }

    /// Mime-type group of the record (`image`, `video`, ...)
    pub fn media_type(&self) -> ResolveResult<Option<&'a str>> {
        let mime_types = self.resolvers.mime_types;
        let post = self.post()?;
        Ok(mime_types.group_by_type(&post.mime_type))
    }

    pub fn media_width(&self) -> ResolveResult<Option<u64>> {
        Ok(self.metadata()?.and_then(|m| m.width))
    }

    pub fn media_height(&self) -> ResolveResult<Option<u64>> {
        Ok(self.metadata()?.and_then(|m| m.height))
    }

    /// `WxH`, or `None` unless both dimensions are known
    pub fn media_size(&self) -> ResolveResult<Option<String>> {
        match (self.media_width()?, self.media_height()?) {
            (Some(w), Some(h)) => Ok(Some(format!("{}x{}", w, h))),
            _ => Ok(None),
        }
    }

    /// Registered resized copies
    pub fn size_variants(&self) -> ResolveResult<&[SizeVariant]> {
        Ok(self.metadata()?.map(|m| m.sizes.as_slice()).unwrap_or(&[]))
    }

    /// Value of a virtual field; `None` means unknown
    pub fn virtual_value(&self, field: VirtualField) -> ResolveResult<Option<u64>> {
        match field {
            VirtualField::FileSize => self.file_size(),
            VirtualField::MediaWidth => self.media_width(),
            VirtualField::MediaHeight => self.media_height(),
        }
    }

    pub fn post_date(&self) -> ResolveResult<NaiveDateTime> {
        Ok(self.post()?.date)
    }

    pub fn post_modified(&self) -> ResolveResult<NaiveDateTime> {
        Ok(self.post()?.modified)
    }

    pub fn post_status(&self) -> ResolveResult<&str> {
        Ok(&self.post()?.status)
    }

    pub fn post_mime_type(&self) -> ResolveResult<&str> {
        Ok(&self.post()?.mime_type)
    }

    pub fn post_author(&self) -> ResolveResult<Option<&UserView>> {
        let metadata = self.resolvers.metadata;
        let id = self.id;
        resolve(&self.author, id, "post_author", || metadata.post_author(id)).map(Option::as_ref)
    }

    /// Parent post, `None` when unattached or the parent no longer exists
    pub fn post_parent(&self) -> ResolveResult<Option<&PostView>> {
        if let Some(parent) = self.parent.get() {
            return Ok(parent.as_ref());
        }
        let parent_id = self.post()?.parent;
        let metadata = self.resolvers.metadata;
        resolve(&self.parent, self.id, "post_parent", || {
            if parent_id == 0 {
                Ok(None)
            } else {
                metadata.post(parent_id)
            }
        })
        .map(Option::as_ref)
    }

    pub fn is_attached(&self) -> ResolveResult<bool> {
        Ok(self.post_parent()?.is_some())
    }

    /// True if the record is a post thumbnail, a term thumbnail, or its
    /// file name (or any size variant's) appears in searchable content.
    ///
    /// Each check may scan whole tables; checks stop at the first hit.
    pub fn is_in_use(&self) -> ResolveResult<bool> {
        if let Some(in_use) = self.in_use.get() {
            return Ok(*in_use);
        }

        let references = self.resolvers.references;
        let id = self.id;
        let fail = |e: LookupError| ResolutionFailed::new(id, "is_in_use", e);

        let in_use = references.is_thumbnail_of_post(id).map_err(fail)?
            || references.is_thumbnail_of_term(id).map_err(fail)?
            || self.is_in_content()?;

        Ok(*self.in_use.get_or_init(|| in_use))
    }

    fn is_in_content(&self) -> ResolveResult<bool> {
        let references = self.resolvers.references;
        let id = self.id;
        let fail = |e: LookupError| ResolutionFailed::new(id, "is_in_use", e);

        let file_name = match self.file_name()? {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(false),
        };
        if references
            .is_referenced_in_content(std::slice::from_ref(&file_name))
            .map_err(fail)?
        {
            return Ok(true);
        }

        let variants = self.size_variants()?;
        if variants.is_empty() {
            return Ok(false);
        }
        // Root-level files get bare variant names, not `./<variant>`
        let base_dir = match file_name.rfind('/') {
            Some(pos) => &file_name[..=pos],
            None => "",
        };
        let needles: Vec<String> = variants
            .iter()
            .map(|v| format!("{}{}", base_dir, v.file))
            .collect();
        references.is_referenced_in_content(&needles).map_err(fail)
    }

    fn post(&self) -> ResolveResult<&PostView> {
        let metadata = self.resolvers.metadata;
        let id = self.id;
        resolve(&self.post, id, "post", || {
            metadata
                .post(id)?
                .ok_or_else(|| LookupError::new(format!("record {} not found", id)))
        })
    }

    fn metadata(&self) -> ResolveResult<Option<&AttachmentMetadata>> {
        let metadata = self.resolvers.metadata;
        let id = self.id;
        resolve(&self.meta, id, "metadata", || metadata.attachment_metadata(id)).map(Option::as_ref)
    }
}

impl std::fmt::Debug for Record<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Record").field("id", &self.id).finish_non_exhaustive()
    }
}
