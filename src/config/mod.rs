mod types;

pub use types::*;

use anyhow::{Context, Result};
use shoptrack_db::{KvStore, MemoryKv, SqliteKv};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./shoptrack.toml",
        "~/.config/shoptrack/config.toml",
        "/etc/shoptrack/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.storage.quota_bytes == 0 {
        anyhow::bail!("Storage quota cannot be 0");
    }

    if config.storage.backend == StorageBackend::Sqlite && config.storage.path.trim().is_empty() {
        anyhow::bail!("Storage path cannot be empty for the sqlite backend");
    }

    let images = &config.images;
    if images.max_width == 0 || images.max_height == 0 {
        anyhow::bail!("Image bounds must be at least 1x1");
    }
    if images.thumbnail_size == 0 {
        anyhow::bail!("Thumbnail size cannot be 0");
    }
    for (name, quality) in [
        ("quality", images.quality),
        ("thumbnail_quality", images.thumbnail_quality),
    ] {
        if !(quality > 0.0 && quality <= 1.0) {
            anyhow::bail!("Image {} must be in (0, 1], got {}", name, quality);
        }
    }
    if images.max_file_bytes == 0 {
        anyhow::bail!("Image size limit cannot be 0");
    }

    Ok(())
}

impl StorageConfig {
    /// Storage path with `~` expanded.
    pub fn resolved_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.path).as_ref())
    }

    /// Open the configured key-value backend.
    pub fn open(&self) -> Result<Arc<dyn KvStore>> {
        match self.backend {
            StorageBackend::Memory => Ok(Arc::new(MemoryKv::with_quota(self.quota_bytes))),
            StorageBackend::Sqlite => {
                let path = self.resolved_path();
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("Failed to create storage directory: {:?}", parent)
                    })?;
                }

                let path_str = path
                    .to_str()
                    .with_context(|| format!("Storage path is not valid UTF-8: {:?}", path))?;
                let kv = SqliteKv::open(path_str, Some(self.quota_bytes))
                    .with_context(|| format!("Failed to open storage: {:?}", path))?;

                tracing::debug!("Opened storage at {:?}", path);
                Ok(Arc::new(kv))
            }
        }
    }
}
