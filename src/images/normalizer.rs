//! Resize and re-encode photos as inline JPEG data URIs.

use std::io::Cursor;

use futures::future::try_join_all;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use serde::Serialize;

use super::data_url::{decode_data_url, encode_data_url, JPEG_MEDIA_TYPE};
use super::file::{validate_image, ImageFile, MAX_FILE_BYTES};
use super::ImageError;

/// Tunables for photo normalization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizerSettings {
    /// Bounding box for stored photos.
    pub max_width: u32,
    pub max_height: u32,
    /// JPEG quality in `(0, 1]`.
    pub quality: f32,
    /// Edge length of square thumbnails.
    pub thumbnail_size: u32,
    pub thumbnail_quality: f32,
    /// Upload size ceiling.
    pub max_file_bytes: u64,
}

impl Default for NormalizerSettings {
    fn default() -> Self {
        Self {
            max_width: 1200,
            max_height: 1200,
            quality: 0.8,
            thumbnail_size: 150,
            thumbnail_quality: 0.7,
            max_file_bytes: MAX_FILE_BYTES,
        }
    }
}

/// Pixel dimensions of a decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Validates photos and turns them into JPEG data URIs.
#[derive(Debug, Clone, Default)]
pub struct ImageNormalizer {
    settings: NormalizerSettings,
}

impl ImageNormalizer {
    pub fn new(settings: NormalizerSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &NormalizerSettings {
        &self.settings
    }

    /// Advisory check of declared media type and size.
    pub fn validate(&self, file: Option<&ImageFile>) -> Result<(), ImageError> {
        validate_image(file, self.settings.max_file_bytes)
    }

    /// Compress with the configured bounding box and quality.
    pub async fn compress(&self, file: &ImageFile) -> Result<String, ImageError> {
        self.compress_with(
            file,
            self.settings.max_width,
            self.settings.max_height,
            self.settings.quality,
        )
        .await
    }

    /// Decode `file`, shrink it to fit `max_width × max_height` keeping its
    /// aspect ratio, and re-encode it as a JPEG data URI.
    ///
    /// Bounds must be at least 1 and quality in `(0, 1]`.
    pub async fn compress_with(
        &self,
        file: &ImageFile,
        max_width: u32,
        max_height: u32,
        quality: f32,
    ) -> Result<String, ImageError> {
        check_settings(max_width, max_height, quality)?;

        let data = file.data.clone();
        let name = file.name.clone();
        let encoded = tokio::task::spawn_blocking(move || {
            compress_bytes(&data, max_width, max_height, quality)
        })
        .await??;
        tracing::debug!(file = %name, encoded_len = encoded.len(), "Compressed photo");
        Ok(encoded)
    }

    /// Validate every file, then compress them all.
    ///
    /// Validation is all-or-nothing: the first invalid file (in input order)
    /// fails the whole batch before any decoding starts. Results keep the
    /// input order.
    pub async fn process_many(&self, files: &[ImageFile]) -> Result<Vec<String>, ImageError> {
        for file in files {
            if let Err(e) = self.validate(Some(file)) {
                tracing::warn!(file = %file.name, "Rejected photo: {}", e);
                return Err(e);
            }
        }

        try_join_all(files.iter().map(|file| self.compress(file))).await
    }

    /// Decode a data URI just far enough to read its dimensions.
    pub async fn dimensions(&self, encoded: &str) -> Result<Dimensions, ImageError> {
        let (_, data) = decode_data_url(encoded)?;
        tokio::task::spawn_blocking(move || read_dimensions(&data)).await?
    }

    /// Square thumbnail at the configured size.
    pub async fn thumbnail(&self, encoded: &str) -> Result<String, ImageError> {
        self.thumbnail_with(encoded, self.settings.thumbnail_size).await
    }

    /// Center-crop to a square on the shorter side and scale to `size × size`.
    pub async fn thumbnail_with(&self, encoded: &str, size: u32) -> Result<String, ImageError> {
        let (_, data) = decode_data_url(encoded)?;
        let quality = self.settings.thumbnail_quality;
        tokio::task::spawn_blocking(move || thumbnail_bytes(&data, size, quality)).await?
    }
}

/// Target size for `width × height` inside `max_width × max_height`.
///
/// Only ever scales down, by the same factor on both axes, rounding to whole
/// pixels (at least 1).
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = f64::min(
        max_width as f64 / width as f64,
        max_height as f64 / height as f64,
    );
    let scaled = |v: u32, bound: u32| ((v as f64 * scale).round() as u32).clamp(1, bound.max(1));

    (scaled(width, max_width), scaled(height, max_height))
}

fn check_settings(max_width: u32, max_height: u32, quality: f32) -> Result<(), ImageError> {
    if max_width == 0 || max_height == 0 {
        return Err(ImageError::InvalidSettings(format!(
            "bounds must be at least 1x1, got {max_width}x{max_height}"
        )));
    }
    if !(quality > 0.0 && quality <= 1.0) {
        return Err(ImageError::InvalidSettings(format!(
            "quality must be in (0, 1], got {quality}"
        )));
    }
    Ok(())
}

fn compress_bytes(
    data: &[u8],
    max_width: u32,
    max_height: u32,
    quality: f32,
) -> Result<String, ImageError> {
    let img = image::load_from_memory(data)?;
    let (width, height) = fit_within(img.width(), img.height(), max_width, max_height);

    let img = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    let jpeg = encode_jpeg(&img, quality)?;
    Ok(encode_data_url(JPEG_MEDIA_TYPE, &jpeg))
}

fn thumbnail_bytes(data: &[u8], size: u32, quality: f32) -> Result<String, ImageError> {
    let img = image::load_from_memory(data)?;
    let side = img.width().min(img.height());
    let x = (img.width() - side) / 2;
    let y = (img.height() - side) / 2;

    let thumb = img
        .crop_imm(x, y, side, side)
        .resize_exact(size.max(1), size.max(1), FilterType::Lanczos3);

    let jpeg = encode_jpeg(&thumb, quality)?;
    Ok(encode_data_url(JPEG_MEDIA_TYPE, &jpeg))
}

fn read_dimensions(data: &[u8]) -> Result<Dimensions, ImageError> {
    let (width, height) = ImageReader::new(Cursor::new(data))
        .with_guessed_format()?
        .into_dimensions()?;
    Ok(Dimensions { width, height })
}

/// JPEG has no alpha channel; transparent pixels are flattened by dropping it.
fn encode_jpeg(img: &DynamicImage, quality: f32) -> Result<Vec<u8>, ImageError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    JpegEncoder::new_with_quality(&mut buf, jpeg_quality(quality)).encode_image(&rgb)?;
    Ok(buf)
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8
}
