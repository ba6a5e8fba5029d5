//! Shared test utilities for the trail-journal test suite.
//!
//! Provides an in-memory [`MockAssets`] source with per-handle delays and
//! failures, a [`ManualLocation`] provider whose replies the test releases by
//! hand, and a synthetic JPEG writer.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let assets = MockAssets::new()
//!     .with_image("header.jpg", 40, 30)
//!     .with_broken("lost.jpg")
//!     .with_delay("header.jpg", Duration::from_millis(50));
//! ```

use crate::assets::{AssetHandle, AssetSource, ResolveError};
use crate::imaging::{BackendError, Orientation, SourceImage};
use crate::location::{Coordinate, FixReply, LocationError, LocationProvider};
use image::{DynamicImage, ImageEncoder, RgbImage};
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

// =========================================================================
// Asset source
// =========================================================================

#[derive(Debug, Clone)]
enum MockEntry {
    Image(u32, u32),
    Broken,
    Unsupported,
}

/// In-memory asset source keyed by handle path.
///
/// Unknown handles resolve like broken ones.
#[derive(Default)]
pub struct MockAssets {
    entries: HashMap<String, MockEntry>,
    delays: HashMap<String, Duration>,
    resolved: Mutex<Vec<String>>,
}

impl MockAssets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(mut self, name: &str, width: u32, height: u32) -> Self {
        self.entries
            .insert(name.to_string(), MockEntry::Image(width, height));
        self
    }

    pub fn with_broken(mut self, name: &str) -> Self {
        self.entries.insert(name.to_string(), MockEntry::Broken);
        self
    }

    pub fn with_unsupported(mut self, name: &str) -> Self {
        self.entries.insert(name.to_string(), MockEntry::Unsupported);
        self
    }

    /// Sleep this long inside `resolve` for `name`.
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Handles passed to `resolve`, in call order.
    pub fn resolved(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }
}

impl AssetSource for MockAssets {
    fn can_resolve(&self, handle: &AssetHandle) -> bool {
        !matches!(
            self.entries.get(&handle.to_string()),
            Some(MockEntry::Unsupported)
        )
    }

    fn resolve(&self, handle: &AssetHandle) -> Result<SourceImage, ResolveError> {
        let key = handle.to_string();
        self.resolved.lock().unwrap().push(key.clone());
        if let Some(delay) = self.delays.get(&key) {
            std::thread::sleep(*delay);
        }
        match self.entries.get(&key) {
            Some(MockEntry::Image(w, h)) => Ok(SourceImage::new(
                DynamicImage::new_rgb8(*w, *h),
                Orientation::Normal,
            )),
            Some(MockEntry::Unsupported) => Err(ResolveError::Unsupported(handle.clone())),
            Some(MockEntry::Broken) | None => Err(ResolveError::Load {
                handle: handle.clone(),
                source: BackendError::ProcessingFailed("mock load failure".to_string()),
            }),
        }
    }
}

// =========================================================================
// Location provider
// =========================================================================

/// Holds every request until the test answers it.
///
/// Clones share the same queue, so a test can keep one clone while the
/// draft owns the other.
#[derive(Clone, Default)]
pub struct ManualLocation {
    pending: Arc<Mutex<Vec<FixReply>>>,
}

impl ManualLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Answer the oldest outstanding request. Returns false if none.
    pub fn answer_oldest(&self, result: Result<Coordinate, LocationError>) -> bool {
        let mut pending = self.pending.lock().unwrap();
        if pending.is_empty() {
            return false;
        }
        pending.remove(0).deliver(result);
        true
    }

    /// Answer every outstanding request with the same result.
    pub fn answer_all(&self, result: Result<Coordinate, LocationError>) {
        for reply in self.pending.lock().unwrap().drain(..) {
            reply.deliver(result.clone());
        }
    }
}

impl LocationProvider for ManualLocation {
    fn request_fix(&self, reply: FixReply) {
        self.pending.lock().unwrap().push(reply);
    }
}

// =========================================================================
// Image files
// =========================================================================

/// Write a small valid JPEG with the given dimensions.
pub fn create_test_jpeg(path: &Path, width: u32, height: u32) {
    let img = RgbImage::from_fn(width, height, |x, y| {
        image::Rgb([(x % 256) as u8, (y % 256) as u8, 128])
    });
    let file = std::fs::File::create(path).unwrap();
    let writer = std::io::BufWriter::new(file);
    image::codecs::jpeg::JpegEncoder::new(writer)
        .write_image(img.as_raw(), width, height, image::ExtendedColorType::Rgb8)
        .unwrap();
}
