//! Mime-type group registry
//!
//! Groups are derived from two tables: extensions per group, and
//! extension patterns (`jpg|jpeg|jpe`) per mime type. A mime type lands in
//! the first group owning an extension that matches one of its pattern
//! alternatives; each mime type is assigned to at most one group.

use serde::{Deserialize, Serialize};

const DEFAULT_EXTENSION_GROUPS: &[(&str, &[&str])] = &[
    (
        "image",
        &["jpg", "jpeg", "jpe", "gif", "png", "bmp", "tif", "tiff", "ico", "heic", "webp", "avif"],
    ),
    (
        "audio",
        &[
            "aac", "ac3", "aif", "aiff", "flac", "m3a", "m4a", "m4b", "mka", "mp1", "mp2", "mp3",
            "ogg", "oga", "ram", "wav", "wma",
        ],
    ),
    (
        "video",
        &[
            "3g2", "3gp", "3gpp", "asf", "avi", "divx", "dv", "flv", "m4v", "mkv", "mov", "mp4",
            "mpeg", "mpg", "mpv", "ogm", "ogv", "qt", "rm", "vob", "wmv", "webm",
        ],
    ),
    (
        "document",
        &[
            "doc", "docx", "docm", "dotm", "odt", "pages", "pdf", "xps", "oxps", "rtf", "wp",
            "wpd", "psd", "xcf",
        ],
    ),
    ("spreadsheet", &["numbers", "ods", "xls", "xlsx", "xlsm", "xlsb"]),
    (
        "interactive",
        &["swf", "key", "ppt", "pptx", "pptm", "pps", "ppsx", "ppsm", "sldx", "sldm", "odp"],
    ),
    ("text", &["asc", "csv", "tsv", "txt"]),
    (
        "archive",
        &["bz2", "cab", "dmg", "gz", "rar", "sea", "sit", "sqx", "tar", "tgz", "zip", "7z"],
    ),
    ("code", &["css", "htm", "html", "php", "js"]),
];

const DEFAULT_MIME_PATTERNS: &[(&str, &str)] = &[
    ("jpg|jpeg|jpe", "image/jpeg"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("bmp", "image/bmp"),
    ("tiff|tif", "image/tiff"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("heic", "image/heic"),
    ("asf|asx", "video/x-ms-asf"),
    ("wmv", "video/x-ms-wmv"),
    ("avi", "video/avi"),
    ("divx", "video/divx"),
    ("flv", "video/x-flv"),
    ("mov|qt", "video/quicktime"),
    ("mpeg|mpg|mpe", "video/mpeg"),
    ("mp4|m4v", "video/mp4"),
    ("ogv", "video/ogg"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("3gp|3gpp", "video/3gpp"),
    ("3g2|3gp2", "video/3gpp2"),
    ("txt|asc|c|cc|h|srt", "text/plain"),
    ("csv", "text/csv"),
    ("tsv", "text/tab-separated-values"),
    ("ics", "text/calendar"),
    ("rtx", "text/richtext"),
    ("css", "text/css"),
    ("htm|html", "text/html"),
    ("vtt", "text/vtt"),
    ("mp3|m4a|m4b", "audio/mpeg"),
    ("aac", "audio/aac"),
    ("ra|ram", "audio/x-realaudio"),
    ("wav", "audio/wav"),
    ("ogg|oga", "audio/ogg"),
    ("flac", "audio/flac"),
    ("mid|midi", "audio/midi"),
    ("wma", "audio/x-ms-wma"),
    ("mka", "audio/x-matroska"),
    ("rtf", "application/rtf"),
    ("js", "application/javascript"),
    ("pdf", "application/pdf"),
    ("swf", "application/x-shockwave-flash"),
    ("tar", "application/x-tar"),
    ("zip", "application/zip"),
    ("gz|gzip", "application/x-gzip"),
    ("rar", "application/rar"),
    ("7z", "application/x-7z-compressed"),
    ("psd", "application/octet-stream"),
    ("doc", "application/msword"),
    ("pot|pps|ppt", "application/vnd.ms-powerpoint"),
    ("xla|xls|xlt|xlw", "application/vnd.ms-excel"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("key", "application/vnd.apple.keynote"),
    ("numbers", "application/vnd.apple.numbers"),
    ("pages", "application/vnd.apple.pages"),
    ("oxps", "application/oxps"),
    ("xps", "application/vnd.ms-xpsdocument"),
];

/// One configured group: a name and the mime types it covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeGroup {
    pub name: String,
    pub types: Vec<String>,
}

/// Ordered mapping from group name to the mime types it covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeTypeRegistry {
    groups: Vec<(String, Vec<String>)>,
}

impl MimeTypeRegistry {
    /// Builds a registry from an extension table and a pattern table
    pub fn from_tables(extension_groups: &[(&str, &[&str])], mime_patterns: &[(&str, &str)]) -> Self {
        let mut remaining: Vec<(&str, &str)> = mime_patterns.to_vec();
        let mut groups = Vec::with_capacity(extension_groups.len());

        for (group, extensions) in extension_groups {
            let mut types = Vec::new();
            remaining.retain(|(pattern, mime_type)| {
                let matched = extensions
                    .iter()
                    .any(|ext| pattern_matches(pattern, ext));
                if matched {
                    types.push(mime_type.to_string());
                }
                !matched
            });
            groups.push((group.to_string(), types));
        }

        Self { groups }
    }

    /// Builds a registry from explicit groups, keeping their order.
    ///
    /// A mime type listed under several groups stays with the first one.
    pub fn from_groups(groups: &[MimeGroup]) -> Self {
        let mut seen: Vec<&str> = Vec::new();
        let groups = groups
            .iter()
            .map(|group| {
                let mut types = Vec::new();
                for mime_type in &group.types {
                    if !seen.contains(&mime_type.as_str()) {
                        seen.push(mime_type);
                        types.push(mime_type.clone());
                    }
                }
                (group.name.clone(), types)
            })
            .collect();
        Self { groups }
    }

    /// Group names, in registry order
    pub fn groups(&self) -> Vec<&str> {
        self.groups.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Returns true if the group is known
    pub fn has_group(&self, group: &str) -> bool {
        self.groups.iter().any(|(name, _)| name == group)
    }

    /// Every mime type across all groups
    pub fn types(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|(_, types)| types.iter().map(String::as_str))
            .collect()
    }

    /// Concatenates the mime types of the given groups, in argument order.
    /// Unknown groups contribute nothing.
    pub fn types_by_group<S: AsRef<str>>(&self, groups: &[S]) -> Vec<String> {
        let mut out = Vec::new();
        for group in groups {
            if let Some((_, types)) = self.groups.iter().find(|(name, _)| name == group.as_ref()) {
                out.extend(types.iter().cloned());
            }
        }
        out
    }

    /// Returns the group a mime type belongs to
    pub fn group_by_type(&self, mime_type: &str) -> Option<&str> {
        self.groups
            .iter()
            .find(|(_, types)| types.iter().any(|t| t == mime_type))
            .map(|(name, _)| name.as_str())
    }
}

impl Default for MimeTypeRegistry {
    fn default() -> Self {
        Self::from_tables(DEFAULT_EXTENSION_GROUPS, DEFAULT_MIME_PATTERNS)
    }
}

/// Matches an extension against an alternation pattern, case-insensitively
fn pattern_matches(pattern: &str, extension: &str) -> bool {
    pattern
        .split('|')
        .any(|alt| alt.eq_ignore_ascii_case(extension))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups() {
        let registry = MimeTypeRegistry::default();
        assert_eq!(
            registry.groups(),
            vec![
                "image",
                "audio",
                "video",
                "document",
                "spreadsheet",
                "interactive",
                "text",
                "archive",
                "code"
            ]
        );
    }

    #[test]
    fn test_image_group() {
        let registry = MimeTypeRegistry::default();
        let images = registry.types_by_group(&["image"]);
        assert!(images.contains(&"image/jpeg".to_string()));
        assert!(images.contains(&"image/png".to_string()));
        assert!(!images.iter().any(|t| t.starts_with("video/")));
    }

    #[test]
    fn test_types_by_group_concatenates_in_order() {
        let registry = MimeTypeRegistry::default();
        let video = registry.types_by_group(&["video"]);
        let audio = registry.types_by_group(&["audio"]);
        let both = registry.types_by_group(&["video", "audio"]);

        let mut expected = video.clone();
        expected.extend(audio);
        assert_eq!(both, expected);
    }

    #[test]
    fn test_unknown_group_contributes_nothing() {
        let registry = MimeTypeRegistry::default();
        assert!(registry.types_by_group(&["hologram"]).is_empty());
        assert!(!registry.has_group("hologram"));
    }

    #[test]
    fn test_group_by_type() {
        let registry = MimeTypeRegistry::default();
        assert_eq!(registry.group_by_type("video/mp4"), Some("video"));
        assert_eq!(registry.group_by_type("text/csv"), Some("text"));
        assert_eq!(registry.group_by_type("text/css"), Some("code"));
        assert_eq!(registry.group_by_type("application/x-unknown"), None);
    }

    #[test]
    fn test_mime_type_assigned_once() {
        // "mp3|m4a|m4b" matches audio only; it must not reappear elsewhere
        let registry = MimeTypeRegistry::default();
        let count = registry
            .types()
            .into_iter()
            .filter(|t| *t == "audio/mpeg")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_pattern_match_case_insensitive() {
        assert!(pattern_matches("JPG|jpeg", "jpg"));
        assert!(!pattern_matches("jpg|jpeg", "jp"));
    }

    fn group(name: &str, types: &[&str]) -> MimeGroup {
        MimeGroup {
            name: name.to_string(),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_from_groups() {
        let registry = MimeTypeRegistry::from_groups(&[group("raw", &["image/x-raw"])]);
        assert_eq!(registry.groups(), vec!["raw"]);
        assert_eq!(registry.group_by_type("image/x-raw"), Some("raw"));
    }

    #[test]
    fn test_from_groups_keeps_configured_order() {
        let registry = MimeTypeRegistry::from_groups(&[
            group("video", &["video/mp4", "image/gif"]),
            group("animated", &["image/gif", "image/webp"]),
        ]);
        assert_eq!(registry.groups(), vec!["video", "animated"]);
        assert_eq!(registry.group_by_type("image/gif"), Some("video"));
        assert_eq!(
            registry.types_by_group(&["animated", "video"]),
            vec!["image/webp", "video/mp4", "image/gif"]
        );
    }
}
