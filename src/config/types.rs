use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::images::{NormalizerSettings, MAX_FILE_BYTES};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub images: ImagesConfig,

    #[serde(default)]
    pub export: ExportConfig,
}

/// Where work orders and the roster are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// SQLite file at `storage.path`.
    #[default]
    Sqlite,
    /// Process-local; everything is lost on exit.
    Memory,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Database file, tilde-expanded
    #[serde(default = "default_storage_path")]
    pub path: String,

    /// Total bytes the stored collections may occupy (default: 5 MiB)
    #[serde(default = "default_quota_bytes")]
    pub quota_bytes: u64,
}

fn default_storage_path() -> String {
    "~/.local/share/shoptrack/shoptrack.db".to_string()
}

fn default_quota_bytes() -> u64 {
    5 * 1024 * 1024
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_storage_path(),
            quota_bytes: default_quota_bytes(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Bounding box for stored photos (default: 1200x1200)
    #[serde(default = "default_max_dimension")]
    pub max_width: u32,

    #[serde(default = "default_max_dimension")]
    pub max_height: u32,

    /// JPEG quality in (0, 1] (default: 0.8)
    #[serde(default = "default_quality")]
    pub quality: f32,

    /// Square thumbnail edge (default: 150)
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    #[serde(default = "default_thumbnail_quality")]
    pub thumbnail_quality: f32,

    /// Upload ceiling (default: 10 MiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

fn default_max_dimension() -> u32 {
    1200
}

fn default_quality() -> f32 {
    0.8
}

fn default_thumbnail_size() -> u32 {
    150
}

fn default_thumbnail_quality() -> f32 {
    0.7
}

fn default_max_file_bytes() -> u64 {
    MAX_FILE_BYTES
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            max_width: default_max_dimension(),
            max_height: default_max_dimension(),
            quality: default_quality(),
            thumbnail_size: default_thumbnail_size(),
            thumbnail_quality: default_thumbnail_quality(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl From<&ImagesConfig> for NormalizerSettings {
    fn from(config: &ImagesConfig) -> Self {
        Self {
            max_width: config.max_width,
            max_height: config.max_height,
            quality: config.quality,
            thumbnail_size: config.thumbnail_size,
            thumbnail_quality: config.thumbnail_quality,
            max_file_bytes: config.max_file_bytes,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExportConfig {
    /// Directory backups are written to
    #[serde(default = "default_export_dir")]
    pub dir: PathBuf,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            dir: default_export_dir(),
        }
    }
}
