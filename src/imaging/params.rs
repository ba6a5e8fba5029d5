//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They sit between
//! [`operations`](super::operations), which decides the target size for a post
//! asset, and the [`backend`](super::backend), which does the pixel work. A
//! mock backend can then check the decisions without encoding anything.
//!
//! ## Types
//!
//! - [`Quality`]: JPEG encoding quality (1–100, default 50). Clamped on construction.
//! - [`Orientation`]: EXIF orientation of a decoded source (codes 1–8).
//! - [`TransformParams`]: Target max dimension + quality for one transform.

/// Quality setting for JPEG encoding (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(50)
    }
}

/// How the stored pixels must be turned to display upright.
///
/// Variant order follows the EXIF orientation codes 1 through 8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Orientation {
    #[default]
    Normal,
    FlipHorizontal,
    Rotate180,
    FlipVertical,
    /// Transpose: rotate 90° clockwise, then flip horizontally.
    Rotate90FlipH,
    Rotate90,
    /// Transverse: rotate 270° clockwise, then flip horizontally.
    Rotate270FlipH,
    Rotate270,
}

impl Orientation {
    /// Map an EXIF orientation code. Unknown codes mean "leave as is".
    pub fn from_exif(code: u16) -> Self {
        match code {
            2 => Self::FlipHorizontal,
            3 => Self::Rotate180,
            4 => Self::FlipVertical,
            5 => Self::Rotate90FlipH,
            6 => Self::Rotate90,
            7 => Self::Rotate270FlipH,
            8 => Self::Rotate270,
            _ => Self::Normal,
        }
    }

    /// True when correcting this orientation swaps width and height.
    pub fn swaps_axes(self) -> bool {
        matches!(
            self,
            Self::Rotate90 | Self::Rotate270 | Self::Rotate90FlipH | Self::Rotate270FlipH
        )
    }
}

/// Parameters for one post-asset transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransformParams {
    /// Longest edge of the output, in pixels.
    pub max_dimension: u32,
    pub quality: Quality,
}
