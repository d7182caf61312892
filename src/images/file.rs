//! Photo inputs and advisory validation.

use std::path::Path;

use bytes::Bytes;
use shoptrack_common::paths::media_type_for_path;

use super::ImageError;

/// Media types accepted for upload.
pub const ALLOWED_MEDIA_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png", "image/webp"];

/// Upload size ceiling (10 MiB).
pub const MAX_FILE_BYTES: u64 = 10 * 1024 * 1024;

/// A photo as selected by the user: raw bytes plus the declared media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub media_type: String,
    pub data: Bytes,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            data: data.into(),
        }
    }

    /// Read a photo from disk, declaring its media type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self, ImageError> {
        let data = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self::new(name, media_type_for_path(path), data))
    }

    /// Size in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Check a photo against the allow-list and the size ceiling.
///
/// Only the declared type and size are inspected; the bytes are not sniffed.
pub fn validate_image(file: Option<&ImageFile>, max_bytes: u64) -> Result<(), ImageError> {
    let file = file.ok_or(ImageError::NoFile)?;

    if !ALLOWED_MEDIA_TYPES.contains(&file.media_type.as_str()) {
        return Err(ImageError::UnsupportedType(file.media_type.clone()));
    }

    if file.size() > max_bytes {
        return Err(ImageError::TooLarge {
            size: file.size(),
            max: max_bytes,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            validate_image(None, MAX_FILE_BYTES),
            Err(ImageError::NoFile)
        ));
    }

    #[test]
    fn test_type_mismatch() {
        let file = ImageFile::new("notes.txt", "text/plain", Vec::new());
        assert!(matches!(
            validate_image(Some(&file), MAX_FILE_BYTES),
            Err(ImageError::UnsupportedType(t)) if t == "text/plain"
        ));

        let file = ImageFile::new("anim.gif", "image/gif", vec![0u8; 16]);
        assert!(validate_image(Some(&file), MAX_FILE_BYTES).is_err());
    }

    #[test]
    fn test_size_ceiling() {
        let at_limit = ImageFile::new("a.jpg", "image/jpeg", vec![0u8; MAX_FILE_BYTES as usize]);
        assert!(validate_image(Some(&at_limit), MAX_FILE_BYTES).is_ok());

        let over = ImageFile::new("b.jpg", "image/jpeg", vec![0u8; MAX_FILE_BYTES as usize + 1]);
        assert!(matches!(
            validate_image(Some(&over), MAX_FILE_BYTES),
            Err(ImageError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_allowed_types() {
        for media_type in ALLOWED_MEDIA_TYPES {
            let file = ImageFile::new("x", *media_type, vec![1u8, 2, 3]);
            assert!(validate_image(Some(&file), MAX_FILE_BYTES).is_ok());
        }
    }

    #[tokio::test]
    async fn test_from_path_declares_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.PNG");
        std::fs::write(&path, b"not really a png").unwrap();

        let file = ImageFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "engine.PNG");
        assert_eq!(file.media_type, "image/png");
        assert_eq!(file.size(), 16);
    }
}
