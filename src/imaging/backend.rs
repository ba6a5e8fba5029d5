//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait defines the two operations the post pipeline
//! needs from an image library: decode a source (keeping its orientation) and
//! transform a decoded image into the JPEG bytes that get published.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate. Tests use a recording mock.

use super::calculations::upright_dimensions;
use super::params::{Orientation, TransformParams};
use image::DynamicImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Width and height in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// A decoded image as it came off the source, plus the orientation needed to
/// display it upright.
///
/// Pixels are not rotated at decode time. The transform corrects orientation
/// before scaling, and previews ask for [`upright`](Self::upright) copies.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub pixels: DynamicImage,
    pub orientation: Orientation,
}

impl SourceImage {
    pub fn new(pixels: DynamicImage, orientation: Orientation) -> Self {
        Self {
            pixels,
            orientation,
        }
    }

    /// Dimensions as displayed (after orientation correction).
    pub fn dimensions(&self) -> Dimensions {
        let (width, height) = upright_dimensions(
            (self.pixels.width(), self.pixels.height()),
            self.orientation,
        );
        Dimensions { width, height }
    }

    /// A copy of the pixels with orientation applied.
    pub fn upright(&self) -> DynamicImage {
        let img = &self.pixels;
        match self.orientation {
            Orientation::Normal => img.clone(),
            Orientation::FlipHorizontal => img.fliph(),
            Orientation::Rotate180 => img.rotate180(),
            Orientation::FlipVertical => img.flipv(),
            Orientation::Rotate90FlipH => img.rotate90().fliph(),
            Orientation::Rotate90 => img.rotate90(),
            Orientation::Rotate270FlipH => img.rotate270().fliph(),
            Orientation::Rotate270 => img.rotate270(),
        }
    }
}

/// Trait for image processing backends.
///
/// `Sync` because photo transforms run on rayon workers.
pub trait ImageBackend: Sync {
    /// Decode an image file, reading its orientation tag.
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError>;

    /// Orientation-correct, downscale and JPEG-encode `source`.
    fn transform(
        &self,
        source: &SourceImage,
        params: &TransformParams,
    ) -> Result<Vec<u8>, BackendError>;
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use std::sync::Mutex;

    /// Mock backend that records operations without encoding anything.
    /// Uses Mutex (not RefCell) so it is Sync and works across rayon workers.
    #[derive(Default)]
    pub struct MockBackend {
        pub decode_results: Mutex<Vec<Dimensions>>,
        pub operations: Mutex<Vec<RecordedOp>>,
        pub fail_transforms: bool,
    }

    #[derive(Debug, Clone, PartialEq)]
    pub enum RecordedOp {
        Decode(String),
        Transform {
            width: u32,
            height: u32,
            max_dimension: u32,
            quality: u32,
        },
    }

    /// Bytes every successful mock transform returns.
    pub const MOCK_JPEG: &[u8] = b"\xFF\xD8mock-jpeg\xFF\xD9";

    impl MockBackend {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_dimensions(dims: Vec<Dimensions>) -> Self {
            Self {
                decode_results: Mutex::new(dims),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail_transforms: true,
                ..Self::default()
            }
        }

        pub fn get_operations(&self) -> Vec<RecordedOp> {
            self.operations.lock().unwrap().clone()
        }
    }

    impl ImageBackend for MockBackend {
        fn decode(&self, path: &Path) -> Result<SourceImage, BackendError> {
            self.operations
                .lock()
                .unwrap()
                .push(RecordedOp::Decode(path.to_string_lossy().to_string()));

            let dims = self
                .decode_results
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| BackendError::ProcessingFailed("No mock dimensions".to_string()))?;
            Ok(SourceImage::new(
                DynamicImage::new_rgb8(dims.width, dims.height),
                Orientation::Normal,
            ))
        }

        fn transform(
            &self,
            source: &SourceImage,
            params: &TransformParams,
        ) -> Result<Vec<u8>, BackendError> {
            let dims = source.dimensions();
            self.operations.lock().unwrap().push(RecordedOp::Transform {
                width: dims.width,
                height: dims.height,
                max_dimension: params.max_dimension,
                quality: params.quality.value(),
            });
            if self.fail_transforms {
                return Err(BackendError::ProcessingFailed(
                    "mock transform failure".to_string(),
                ));
            }
            Ok(MOCK_JPEG.to_vec())
        }
    }

    #[test]
    fn mock_records_decode() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 800,
            height: 600,
        }]);

        let source = backend.decode(Path::new("/test/image.jpg")).unwrap();
        assert_eq!(source.dimensions().width, 800);
        assert_eq!(source.dimensions().height, 600);

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 1);
        assert!(matches!(&ops[0], RecordedOp::Decode(p) if p == "/test/image.jpg"));
    }

    #[test]
    fn mock_records_transform() {
        let backend = MockBackend::new();
        let source = SourceImage::new(DynamicImage::new_rgb8(40, 30), Orientation::Normal);

        let bytes = backend
            .transform(
                &source,
                &TransformParams {
                    max_dimension: 20,
                    quality: Quality::new(50),
                },
            )
            .unwrap();

        assert_eq!(bytes, MOCK_JPEG);
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Transform {
                width: 40,
                height: 30,
                max_dimension: 20,
                quality: 50,
            }]
        );
    }

    #[test]
    fn source_dimensions_follow_orientation() {
        let source = SourceImage::new(DynamicImage::new_rgb8(40, 30), Orientation::Rotate90);
        assert_eq!(
            source.dimensions(),
            Dimensions {
                width: 30,
                height: 40
            }
        );
        let upright = source.upright();
        assert_eq!((upright.width(), upright.height()), (30, 40));
    }

    #[test]
    fn upright_normal_is_a_plain_copy() {
        let source = SourceImage::new(DynamicImage::new_rgb8(4, 2), Orientation::Normal);
        assert_eq!(source.upright().width(), 4);
        assert_eq!(source.upright().height(), 2);
    }
}
