//! Path utilities for detecting image files by extension.
//!
//! Photos picked from disk carry no declared media type, so one is inferred
//! from the file extension before validation.

use std::path::Path;

/// Extensions mapped to their media types.
const IMAGE_MEDIA_TYPES: &[(&str, &str)] = &[
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
];

/// Media type reported for unknown extensions.
pub const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// Infer a media type from a path's extension.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use shoptrack_common::paths::media_type_for_path;
///
/// assert_eq!(media_type_for_path(Path::new("engine.JPG")), "image/jpeg");
/// assert_eq!(media_type_for_path(Path::new("notes.txt")), "application/octet-stream");
/// ```
pub fn media_type_for_path(path: &Path) -> &'static str {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| {
            let ext = ext.to_lowercase();
            IMAGE_MEDIA_TYPES
                .iter()
                .find(|(known, _)| *known == ext)
                .map(|(_, media_type)| *media_type)
        })
        .unwrap_or(UNKNOWN_MEDIA_TYPE)
}
