//! Image processing: pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Decode** | `image::ImageReader` + EXIF orientation |
//! | **Transform** | orientation fix → Lanczos3 downscale → JPEG |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + backend

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend, SourceImage};
pub use calculations::{fit_within, scaled_max_dimension, upright_dimensions};
pub use operations::{TransformConfig, persist_transformed, plan_transform};
pub use params::{Orientation, Quality, TransformParams};
pub use rust_backend::{RustBackend, is_supported_image, supported_input_extensions};
