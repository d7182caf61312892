//! Photo normalization.
//!
//! Turns user-supplied photos into bounded-size JPEG `data:` URIs that can be
//! stored inline on a task record. Validation is advisory (declared media type
//! and byte size only); decoding and encoding run on the blocking thread pool.

mod data_url;
mod file;
mod normalizer;

pub use data_url::{decode_data_url, encode_data_url, JPEG_MEDIA_TYPE};
pub use file::{validate_image, ImageFile, ALLOWED_MEDIA_TYPES, MAX_FILE_BYTES};
pub use normalizer::{fit_within, Dimensions, ImageNormalizer, NormalizerSettings};

/// Errors raised while validating or transcoding photos.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// No file was given.
    #[error("No file selected")]
    NoFile,

    /// The declared media type is not on the allow-list.
    #[error("File type not allowed ({0}). Use JPG, PNG or WebP")]
    UnsupportedType(String),

    /// The file is over the size ceiling.
    #[error("File is too large ({size} bytes). Maximum is {max} bytes")]
    TooLarge { size: u64, max: u64 },

    /// Resize bounds or quality out of range.
    #[error("Invalid image settings: {0}")]
    InvalidSettings(String),

    /// The string is not a base64 `data:` URI.
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Decoding or encoding failed.
    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// Reading the file failed.
    #[error("Failed to read image: {0}")]
    Io(#[from] std::io::Error),

    /// The blocking worker panicked or was shut down.
    #[error("Image worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

impl From<ImageError> for shoptrack_common::Error {
    fn from(err: ImageError) -> Self {
        match err {
            ImageError::NoFile
            | ImageError::UnsupportedType(_)
            | ImageError::TooLarge { .. }
            | ImageError::InvalidSettings(_) => {
                shoptrack_common::Error::invalid_input(err.to_string())
            }
            ImageError::Io(io) => shoptrack_common::Error::Io(io),
            other => shoptrack_common::Error::image(other.to_string()),
        }
    }
}
