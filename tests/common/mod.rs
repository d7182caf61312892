//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which wires a [`Tracker`] to an in-memory
//! key-value store and a [`ScriptedPrompt`], plus helpers that build real
//! images in memory.

#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use shoptrack::images::{ImageFile, ImageNormalizer};
use shoptrack::prompt::ScriptedPrompt;
use shoptrack::store::Store;
use shoptrack::tracker::Tracker;
use shoptrack_common::TaskDraft;
use shoptrack_db::{KvStore, MemoryKv};

/// A tracker backed by process memory with a prompt that always gives the
/// same answer.
pub struct TestHarness {
    pub tracker: Tracker,
    pub store: Store,
    pub kv: Arc<MemoryKv>,
    pub prompt: Arc<ScriptedPrompt>,
}

impl TestHarness {
    /// Harness whose prompt confirms everything.
    pub fn new() -> Self {
        Self::with_answer(true)
    }

    pub fn with_answer(answer: bool) -> Self {
        Self::build(Arc::new(MemoryKv::new()), answer)
    }

    /// Harness whose store rejects writes past `quota` bytes.
    pub fn with_quota(quota: u64) -> Self {
        Self::build(Arc::new(MemoryKv::with_quota(quota)), true)
    }

    fn build(kv: Arc<MemoryKv>, answer: bool) -> Self {
        let prompt = Arc::new(ScriptedPrompt::new(answer));
        let store = Store::new(kv.clone() as Arc<dyn KvStore>, prompt.clone());
        let tracker = Tracker::new(store.clone(), prompt.clone(), ImageNormalizer::default());
        Self {
            tracker,
            store,
            kv,
            prompt,
        }
    }
}

/// Draft assigned to one of the default mechanics.
pub fn draft(title: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        checklist: vec!["Inspect".to_string()],
        mechanic: "Carlos Gómez".to_string(),
        ..Default::default()
    }
}

/// Encode a solid-colour image of the given size.
pub fn image_bytes(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb([40, 120, 200]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, format)
        .expect("failed to encode test image");
    buf.into_inner()
}

pub fn png_file(name: &str, width: u32, height: u32) -> ImageFile {
    ImageFile::new(name, "image/png", image_bytes(width, height, ImageFormat::Png))
}
