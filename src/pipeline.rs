//! Post assembly: turn a draft's fields and picked handles into a
//! [`FinishedPost`].
//!
//! ## Steps
//!
//! ```text
//! 1. header picked?            no → MissingHeaderImage
//! 2. resolve header            fails → MissingHeaderImage
//! 3. title non-blank?          no → MissingTitle
//! 4. tag chosen?               no → MissingTag
//! 5. transform + write header  <scratch>/<Title-Hyphenated>Header.jpg
//! 6. fan out photo loads       each: resolve → transform → <scratch>/<Title><index>.jpg
//! 7. join                      every photo persisted or dropped
//! 8. build FinishedPost
//! ```
//!
//! The header is resolved before the title and tag are checked, so a missing
//! title still costs one header decode. Callers can observe that ordering.
//!
//! ## Photos
//!
//! Photo handles are resolved concurrently on the rayon pool inside a
//! `rayon::scope`, which is the join: [`Pipeline::assemble`] does not return
//! until every spawned load has finished. Each worker reports back over a
//! channel as soon as its file is written, so the collected list is in
//! *completion* order, while file names carry the *selection* index.
//!
//! A photo that fails to resolve is dropped quietly. A photo that resolves
//! but cannot be written fails the whole assembly.
//!
//! ## Progress
//!
//! Pass a `Sender<FinalizeEvent>` with [`Pipeline::with_events`] to observe
//! each persisted or dropped asset as it happens.

use crate::assets::{AssetHandle, AssetSource};
use crate::imaging::{BackendError, ImageBackend, TransformConfig, persist_transformed};
use crate::location::Coordinate;
use crate::naming::{header_file_name, parse_mile, photo_file_name};
use crate::post::{FinishedPost, PostFields};
use crate::tag::Tag;
use image::DynamicImage;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use thiserror::Error;
use tracing::{debug, info};

/// Why a finalize attempt failed. The `Display` text is what the user sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostError {
    #[error("No Header Image")]
    MissingHeaderImage,
    #[error("No Title")]
    MissingTitle,
    #[error("No Tag")]
    MissingTag,
    #[error("Failed to write {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
    #[error("Image processing failed: {0}")]
    Imaging(String),
}

impl PostError {
    fn persist(path: &Path, err: BackendError) -> Self {
        match err {
            BackendError::Io(e) => PostError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            BackendError::ProcessingFailed(msg) => PostError::Imaging(msg),
        }
    }
}

/// Progress notifications from a running assembly.
#[derive(Debug, Clone, PartialEq)]
pub enum FinalizeEvent {
    HeaderPersisted {
        path: PathBuf,
    },
    PhotoPersisted {
        index: usize,
        path: PathBuf,
    },
    /// The handle could not be resolved to an image.
    PhotoDropped {
        index: usize,
        handle: String,
        reason: String,
    },
    /// The source does not support this handle; no load was attempted.
    PhotoSkipped {
        index: usize,
        handle: String,
    },
}

/// Borrowed view of everything the draft contributes to one finalize.
#[derive(Debug, Clone, Copy)]
pub struct FinalizeRequest<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
    pub author: &'a str,
    pub mile: &'a str,
    pub tag: Option<Tag>,
    pub location: Option<Coordinate>,
    pub header: Option<&'a AssetHandle>,
    pub photos: &'a [AssetHandle],
}

/// A persisted photo plus its upright preview.
struct PersistedPhoto {
    path: PathBuf,
    preview: DynamicImage,
}

/// Everything assembly needs besides the draft: where images come from, how
/// they are transformed, and where the results go.
pub struct Pipeline<'a, B: ImageBackend, S: AssetSource> {
    backend: &'a B,
    assets: &'a S,
    scratch_dir: PathBuf,
    transform: TransformConfig,
    events: Option<Sender<FinalizeEvent>>,
}

impl<'a, B: ImageBackend, S: AssetSource> Pipeline<'a, B, S> {
    pub fn new(backend: &'a B, assets: &'a S, scratch_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend,
            assets,
            scratch_dir: scratch_dir.into(),
            transform: TransformConfig::default(),
            events: None,
        }
    }

    pub fn with_transform(mut self, transform: TransformConfig) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_events(mut self, events: Sender<FinalizeEvent>) -> Self {
        self.events = Some(events);
        self
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    fn emit(&self, event: FinalizeEvent) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }

    /// Run the assembly steps. See the [module docs](self) for the order.
    pub fn assemble(&self, request: &FinalizeRequest<'_>) -> Result<FinishedPost, PostError> {
        let header = request.header.ok_or(PostError::MissingHeaderImage)?;
        let header_image = self.assets.resolve(header).map_err(|e| {
            debug!(%header, error = %e, "header image did not resolve");
            PostError::MissingHeaderImage
        })?;

        let title = request.title.trim();
        if title.is_empty() {
            return Err(PostError::MissingTitle);
        }
        let tag = request.tag.ok_or(PostError::MissingTag)?;

        std::fs::create_dir_all(&self.scratch_dir).map_err(|e| PostError::Io {
            path: self.scratch_dir.clone(),
            message: e.to_string(),
        })?;

        let header_path = self.scratch_dir.join(header_file_name(title));
        persist_transformed(self.backend, &header_image, &header_path, &self.transform)
            .map_err(|e| PostError::persist(&header_path, e))?;
        info!(path = %header_path.display(), "header image persisted");
        self.emit(FinalizeEvent::HeaderPersisted {
            path: header_path.clone(),
        });

        let photos = self.gather_photos(title, request.photos)?;

        let mut previews = Vec::with_capacity(photos.len() + 1);
        previews.push(header_image.upright());
        let mut photo_paths = Vec::with_capacity(photos.len());
        for photo in photos {
            photo_paths.push(photo.path);
            previews.push(photo.preview);
        }

        let subtitle = request.subtitle.trim();
        let fields = PostFields {
            title: title.to_string(),
            subtitle: (!subtitle.is_empty()).then(|| subtitle.to_string()),
            author: request.author.trim().to_string(),
            mile: parse_mile(request.mile),
            tag,
            location: request.location,
        };
        Ok(FinishedPost::new(fields, header_path, photo_paths, previews))
    }

    /// Resolve, transform and write every photo concurrently, then join.
    ///
    /// Results come back in completion order.
    fn gather_photos(
        &self,
        title: &str,
        photos: &[AssetHandle],
    ) -> Result<Vec<PersistedPhoto>, PostError> {
        let (tx, rx) = mpsc::channel();

        rayon::scope(|scope| {
            for (index, handle) in photos.iter().enumerate() {
                if !self.assets.can_resolve(handle) {
                    debug!(index, %handle, "photo skipped: not loadable");
                    self.emit(FinalizeEvent::PhotoSkipped {
                        index,
                        handle: handle.to_string(),
                    });
                    continue;
                }
                let tx = tx.clone();
                scope.spawn(move |_| {
                    let outcome = self.load_photo(title, index, handle);
                    let _ = tx.send(outcome);
                });
            }
        });
        drop(tx);

        let mut persisted = Vec::new();
        let mut first_error = None;
        for outcome in rx {
            match outcome {
                Ok(Some(photo)) => persisted.push(photo),
                Ok(None) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(persisted),
        }
    }

    /// One photo worker. `Ok(None)` means the handle did not resolve.
    fn load_photo(
        &self,
        title: &str,
        index: usize,
        handle: &AssetHandle,
    ) -> Result<Option<PersistedPhoto>, PostError> {
        let source = match self.assets.resolve(handle) {
            Ok(source) => source,
            Err(e) => {
                debug!(index, %handle, error = %e, "photo dropped");
                self.emit(FinalizeEvent::PhotoDropped {
                    index,
                    handle: handle.to_string(),
                    reason: e.to_string(),
                });
                return Ok(None);
            }
        };

        let path = self.scratch_dir.join(photo_file_name(title, index));
        persist_transformed(self.backend, &source, &path, &self.transform)
            .map_err(|e| PostError::persist(&path, e))?;
        info!(index, path = %path.display(), "photo persisted");
        self.emit(FinalizeEvent::PhotoPersisted {
            index,
            path: path.clone(),
        });

        Ok(Some(PersistedPhoto {
            path,
            preview: source.upright(),
        }))
    }
}
