//! Handing finished files to their destination.
//!
//! A [`ShareExporter`] takes an ordered list of files and delivers them
//! somewhere. The returned [`ShareOutcome`] is the completion signal: once
//! it comes back the caller can close its review screen.
//!
//! [`DirectoryExporter`] copies into a local folder, e.g. a checkout of the
//! blog repository:
//!
//! ```text
//! trail-journal compose ... --export-dir ~/blog/drop
//! ```

use crate::post::FinishedPost;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Cannot create export directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot export {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Cannot write post file into {}: {source}", path.display())]
    WriteBody {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} has no file name", .0.display())]
    NoFileName(PathBuf),
}

/// What a share delivered, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShareOutcome {
    pub delivered: Vec<PathBuf>,
}

pub trait ShareExporter {
    fn share(&self, items: &[PathBuf]) -> Result<ShareOutcome, ExportError>;
}

/// Copies shared files into one directory, keeping their file names.
#[derive(Debug, Clone)]
pub struct DirectoryExporter {
    destination: PathBuf,
}

impl DirectoryExporter {
    pub fn new(destination: impl Into<PathBuf>) -> Self {
        Self {
            destination: destination.into(),
        }
    }
}

impl ShareExporter for DirectoryExporter {
    fn share(&self, items: &[PathBuf]) -> Result<ShareOutcome, ExportError> {
        std::fs::create_dir_all(&self.destination).map_err(|source| ExportError::CreateDir {
            path: self.destination.clone(),
            source,
        })?;

        let mut delivered = Vec::with_capacity(items.len());
        for item in items {
            let name = item
                .file_name()
                .ok_or_else(|| ExportError::NoFileName(item.clone()))?;
            let target = self.destination.join(name);
            std::fs::copy(item, &target).map_err(|source| ExportError::Copy {
                path: item.clone(),
                source,
            })?;
            delivered.push(target);
        }
        Ok(ShareOutcome { delivered })
    }
}

/// "Save Body": write the markdown file into `scratch_dir` and share it.
pub fn share_body(
    post: &FinishedPost,
    scratch_dir: &Path,
    exporter: &impl ShareExporter,
) -> Result<ShareOutcome, ExportError> {
    let body = post
        .write_post_file(scratch_dir)
        .map_err(|source| ExportError::WriteBody {
            path: scratch_dir.to_path_buf(),
            source,
        })?;
    exporter.share(&[body])
}

/// "Save Photos": share the header followed by every photo.
pub fn share_photos(
    post: &FinishedPost,
    exporter: &impl ShareExporter,
) -> Result<ShareOutcome, ExportError> {
    exporter.share(&post.asset_paths())
}
