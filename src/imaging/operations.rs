//! High-level image operations.
//!
//! These functions combine calculations with backend execution.
//! They take configuration, compute parameters, and call the backend.

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::calculations::scaled_max_dimension;
use super::params::{Quality, TransformParams};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// How every post asset is re-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformConfig {
    /// Max output dimension as a percentage of the upright source width.
    pub scale_percent: u32,
    pub quality: Quality,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            scale_percent: 50,
            quality: Quality::default(),
        }
    }
}

/// Plan a transform without executing it.
pub fn plan_transform(source: &SourceImage, config: &TransformConfig) -> TransformParams {
    let width = source.dimensions().width;
    TransformParams {
        max_dimension: scaled_max_dimension(width, config.scale_percent),
        quality: config.quality,
    }
}

/// Transform `source` and write the JPEG bytes to `output`.
///
/// Returns the written path so callers can collect it directly.
pub fn persist_transformed(
    backend: &impl ImageBackend,
    source: &SourceImage,
    output: &Path,
    config: &TransformConfig,
) -> Result<PathBuf> {
    let params = plan_transform(source, config);
    let bytes = backend.transform(source, &params)?;
    std::fs::write(output, bytes)?;
    Ok(output.to_path_buf())
}
