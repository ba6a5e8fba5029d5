//! Asset selection and resolution.
//!
//! Picking and loading are two separate steps. A picker hands back opaque
//! [`AssetHandle`]s straight away. The pixels are only loaded when finalize
//! asks an [`AssetSource`] to resolve a handle. Resolution can fail per
//! handle, and each caller decides what a failure means: the header is
//! required, photos are best effort.
//!
//! Pickers:
//! - [`PathPicker`]: explicit file list (e.g. repeated `--photo` flags)
//! - [`DirectoryPicker`]: every supported image under a directory, sorted by path

use crate::imaging::{BackendError, ImageBackend, SourceImage, is_supported_image};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Opaque reference to a picked image.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AssetHandle(PathBuf);

impl AssetHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{0} is not a loadable image")]
    Unsupported(AssetHandle),
    #[error("Failed to load {handle}: {source}")]
    Load {
        handle: AssetHandle,
        #[source]
        source: BackendError,
    },
}

/// Loads picked handles into decoded images.
///
/// `Sync` because photo handles are resolved concurrently.
pub trait AssetSource: Sync {
    /// Whether this source knows how to load `handle` at all.
    ///
    /// Handles that answer `false` are skipped before any load is attempted.
    fn can_resolve(&self, handle: &AssetHandle) -> bool;

    /// Load the image behind `handle`.
    fn resolve(&self, handle: &AssetHandle) -> Result<SourceImage, ResolveError>;
}

/// Resolves handles as image files on disk, decoding through an [`ImageBackend`].
pub struct FileAssets<'a, B: ImageBackend> {
    backend: &'a B,
}

impl<'a, B: ImageBackend> FileAssets<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }
}

impl<B: ImageBackend> AssetSource for FileAssets<'_, B> {
    fn can_resolve(&self, handle: &AssetHandle) -> bool {
        is_supported_image(handle.path())
    }

    fn resolve(&self, handle: &AssetHandle) -> Result<SourceImage, ResolveError> {
        if !self.can_resolve(handle) {
            return Err(ResolveError::Unsupported(handle.clone()));
        }
        self.backend
            .decode(handle.path())
            .map_err(|source| ResolveError::Load {
                handle: handle.clone(),
                source,
            })
    }
}

/// What the caller wants from a picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerRequest {
    pub allow_multiple: bool,
}

impl PickerRequest {
    pub fn single() -> Self {
        Self {
            allow_multiple: false,
        }
    }

    pub fn multiple() -> Self {
        Self {
            allow_multiple: true,
        }
    }
}

#[derive(Error, Debug)]
pub enum PickError {
    #[error("Cannot read {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A selection surface returning zero or more handles, in selection order.
pub trait AssetPicker {
    fn pick(&self, request: PickerRequest) -> Result<Vec<AssetHandle>, PickError>;
}

/// Cap a selection to what the request allows.
fn limit(mut handles: Vec<AssetHandle>, request: PickerRequest) -> Vec<AssetHandle> {
    if !request.allow_multiple {
        handles.truncate(1);
    }
    handles
}

/// Picks an explicit list of paths, preserving their order.
#[derive(Debug, Clone, Default)]
pub struct PathPicker {
    paths: Vec<PathBuf>,
}

impl PathPicker {
    pub fn new(paths: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl AssetPicker for PathPicker {
    fn pick(&self, request: PickerRequest) -> Result<Vec<AssetHandle>, PickError> {
        let handles = self.paths.iter().cloned().map(AssetHandle::new).collect();
        Ok(limit(handles, request))
    }
}

/// Picks every supported image below a directory, sorted by path.
#[derive(Debug, Clone)]
pub struct DirectoryPicker {
    root: PathBuf,
}

impl DirectoryPicker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl AssetPicker for DirectoryPicker {
    fn pick(&self, request: PickerRequest) -> Result<Vec<AssetHandle>, PickError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|source| PickError::Walk {
                path: self.root.clone(),
                source,
            })?;
            if entry.file_type().is_file() && is_supported_image(entry.path()) {
                paths.push(entry.into_path());
            }
        }
        Ok(limit(
            paths.into_iter().map(AssetHandle::new).collect(),
            request,
        ))
    }
}
