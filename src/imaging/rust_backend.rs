//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` → `ImageDecoder` |
//! | Orientation tag | `ImageDecoder::orientation` (EXIF) |
//! | Orientation fix | `DynamicImage::{rotate90, rotate180, rotate270, fliph, flipv}` |
//! | Resize | `DynamicImage::resize_exact` with `Lanczos3` filter |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |

use super::backend::{BackendError, ImageBackend, SourceImage};
use super::calculations::fit_within;
use super::params::{Orientation, TransformParams};
use image::imageops::FilterType;
use image::{DynamicImage, ExtendedColorType, ImageDecoder, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const PHOTO_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    PHOTO_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// True when `path` has an extension one of the compiled decoders handles.
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| {
            supported_input_extensions()
                .iter()
                .any(|s| s.eq_ignore_ascii_case(e))
        })
}

/// Pure Rust backend using the `image` crate.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_failed(path: &Path, err: impl std::fmt::Display) -> BackendError {
    BackendError::ProcessingFailed(format!("Failed to decode {}: {}", path.display(), err))
}

fn map_orientation(orientation: image::metadata::Orientation) -> Orientation {
    use image::metadata::Orientation as Exif;
    match orientation {
        Exif::NoTransforms => Orientation::Normal,
        Exif::FlipHorizontal => Orientation::FlipHorizontal,
        Exif::Rotate180 => Orientation::Rotate180,
        Exif::FlipVertical => Orientation::FlipVertical,
        Exif::Rotate90FlipH => Orientation::Rotate90FlipH,
        Exif::Rotate90 => Orientation::Rotate90,
        Exif::Rotate270FlipH => Orientation::Rotate270FlipH,
        Exif::Rotate270 => Orientation::Rotate270,
    }
}

/// Encode as baseline JPEG. JPEG has no alpha, so everything goes through RGB8.
fn encode_jpeg(img: &DynamicImage, quality: u32) -> Result<Vec<u8>, BackendError> {
    let rgb = img.to_rgb8();
    let mut buf = Vec::new();
    let mut encoder =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100) as u8);
    encoder
        .encode(rgb.as_raw(), rgb.width(), rgb.height(), ExtendedColorType::Rgb8)
        .map_err(|e| BackendError::ProcessingFailed(format!("JPEG encode failed: {}", e)))?;
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn decode(&self, path: &Path) -> Result<SourceImage, BackendError> {
        let reader = ImageReader::open(path)
            .map_err(BackendError::Io)?
            .with_guessed_format()
            .map_err(BackendError::Io)?;
        let mut decoder = reader.into_decoder().map_err(|e| decode_failed(path, e))?;
        // A missing or unreadable EXIF block is not fatal: treat it as upright.
        let orientation = decoder
            .orientation()
            .map(map_orientation)
            .unwrap_or_default();
        let pixels = DynamicImage::from_decoder(decoder).map_err(|e| decode_failed(path, e))?;
        Ok(SourceImage::new(pixels, orientation))
    }

    fn transform(
        &self,
        source: &SourceImage,
        params: &TransformParams,
    ) -> Result<Vec<u8>, BackendError> {
        // Orientation first, so the max dimension applies to the displayed image
        let upright = source.upright();
        let (width, height) = fit_within((upright.width(), upright.height()), params.max_dimension);
        let resized = if (width, height) == (upright.width(), upright.height()) {
            upright
        } else {
            upright.resize_exact(width, height, FilterType::Lanczos3)
        };
        encode_jpeg(&resized, params.quality.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::params::Quality;
    use crate::test_helpers::create_test_jpeg;

    #[test]
    fn supported_extensions_match_decodable_formats() {
        let exts = supported_input_extensions();
        for expected in &["jpg", "jpeg", "png", "tif", "tiff", "webp"] {
            assert!(
                exts.contains(expected),
                "expected {expected} in supported extensions"
            );
        }
    }

    #[test]
    fn is_supported_image_ignores_case() {
        assert!(is_supported_image(Path::new("/photos/IMG_0001.JPG")));
        assert!(is_supported_image(Path::new("camp.png")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no-extension")));
    }

    #[test]
    fn decode_synthetic_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("test.jpg");
        create_test_jpeg(&path, 200, 150);

        let backend = RustBackend::new();
        let source = backend.decode(&path).unwrap();
        assert_eq!(source.pixels.width(), 200);
        assert_eq!(source.pixels.height(), 150);
        assert_eq!(source.orientation, Orientation::Normal);
    }

    #[test]
    fn decode_nonexistent_file_errors() {
        let backend = RustBackend::new();
        let result = backend.decode(Path::new("/nonexistent/image.jpg"));
        assert!(matches!(result, Err(BackendError::Io(_))));
    }

    #[test]
    fn decode_garbage_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("broken.jpg");
        std::fs::write(&path, b"definitely not a jpeg").unwrap();

        let result = RustBackend::new().decode(&path);
        assert!(result.is_err());
    }

    #[test]
    fn transform_halves_and_encodes_jpeg() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("source.jpg");
        create_test_jpeg(&path, 400, 300);

        let backend = RustBackend::new();
        let source = backend.decode(&path).unwrap();
        let bytes = backend
            .transform(
                &source,
                &TransformParams {
                    max_dimension: 200,
                    quality: Quality::new(50),
                },
            )
            .unwrap();

        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (200, 150));
    }

    #[test]
    fn transform_applies_orientation_before_scaling() {
        let pixels = DynamicImage::new_rgb8(400, 300);
        let source = SourceImage::new(pixels, Orientation::Rotate90);

        let bytes = RustBackend::new()
            .transform(
                &source,
                &TransformParams {
                    max_dimension: 200,
                    quality: Quality::default(),
                },
            )
            .unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap();
        // Upright is 300x400 portrait; its long edge is pinned to 200
        assert_eq!((decoded.width(), decoded.height()), (150, 200));
    }

    #[test]
    fn transform_flattens_alpha() {
        let pixels = DynamicImage::new_rgba8(20, 10);
        let source = SourceImage::new(pixels, Orientation::Normal);

        let bytes = RustBackend::new()
            .transform(
                &source,
                &TransformParams {
                    max_dimension: 10,
                    quality: Quality::default(),
                },
            )
            .unwrap();
        assert!(bytes.starts_with(&[0xFF, 0xD8]));
    }
}
