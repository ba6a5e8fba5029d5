//! The in-progress post.
//!
//! [`PostDraft`] is a plain state struct owned by one thread. Callers change
//! it through [`DraftCommand`]s (or the matching methods), run
//! [`finalize`](PostDraft::finalize) to produce a [`FinishedPost`], and read
//! an immutable [`DraftSnapshot`] after each step to redraw.
//!
//! ## Lifecycle
//!
//! ```text
//!            commands                 finalize ok
//!   Editing ─────────▶ Editing ─────────────────────▶ Reviewing (result set)
//!      ▲                  │ finalize err                  │
//!      │                  ▼                               │ dismiss_result
//!      │           Editing + last_error                   ▼
//!      └──────────────── reset ◀──────────────────── Editing (fields kept)
//! ```
//!
//! ## Location
//!
//! Location fixes arrive on a channel and are applied by
//! [`sync_location`](PostDraft::sync_location), which finalize also calls
//! first. Every fix carries the generation it was requested under; `reset`
//! bumps the generation, so a fix requested before a reset is discarded
//! instead of landing on the fresh draft. A fix that arrives after a post
//! was finalized only updates the draft, never the finished post.

use crate::assets::{AssetHandle, AssetSource};
use crate::imaging::ImageBackend;
use crate::location::{Coordinate, FixReply, LocationFix, LocationProvider};
use crate::pipeline::{FinalizeRequest, Pipeline, PostError};
use crate::post::FinishedPost;
use crate::tag::Tag;
use chrono::{Local, NaiveDateTime};
use std::sync::mpsc::{self, Receiver, Sender};
use tracing::{debug, warn};

/// Author used when none is configured.
pub const DEFAULT_AUTHOR: &str = "Randall";

/// One edit to a draft.
#[derive(Debug, Clone, PartialEq)]
pub enum DraftCommand {
    SetTitle(String),
    SetSubtitle(String),
    SetAuthor(String),
    SetMile(String),
    SetTag(Option<Tag>),
    /// Only the first handle is kept.
    SelectHeader(Vec<AssetHandle>),
    SelectPhotos(Vec<AssetHandle>),
    ClearError,
    DismissResult,
    Reset,
}

/// Read-only copy of the draft for display.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub title: String,
    pub subtitle: String,
    pub author: String,
    pub mile: String,
    pub tag: Option<Tag>,
    pub location: Option<Coordinate>,
    pub date: NaiveDateTime,
    pub has_header: bool,
    pub photo_count: usize,
    pub error: Option<String>,
    pub has_result: bool,
}

pub struct PostDraft {
    title: String,
    subtitle: String,
    author: String,
    mile: String,
    tag: Option<Tag>,
    location: Option<Coordinate>,
    date: NaiveDateTime,
    header_selection: Vec<AssetHandle>,
    photo_selection: Vec<AssetHandle>,
    last_error: Option<PostError>,
    result: Option<FinishedPost>,
    generation: u64,
    default_author: String,
    provider: Box<dyn LocationProvider>,
    fix_tx: Sender<LocationFix>,
    fix_rx: Receiver<LocationFix>,
}

impl PostDraft {
    /// Create an empty draft and ask `provider` for a first fix.
    pub fn new(provider: impl LocationProvider + 'static, default_author: impl Into<String>) -> Self {
        let (fix_tx, fix_rx) = mpsc::channel();
        let default_author = default_author.into();
        let draft = Self {
            title: String::new(),
            subtitle: String::new(),
            author: default_author.clone(),
            mile: String::new(),
            tag: None,
            location: None,
            date: Local::now().naive_local(),
            header_selection: Vec::new(),
            photo_selection: Vec::new(),
            last_error: None,
            result: None,
            generation: 0,
            default_author,
            provider: Box::new(provider),
            fix_tx,
            fix_rx,
        };
        draft.request_location();
        draft
    }

    fn request_location(&self) {
        self.provider
            .request_fix(FixReply::new(self.generation, self.fix_tx.clone()));
    }

    /// Apply one command.
    pub fn apply(&mut self, command: DraftCommand) {
        match command {
            DraftCommand::SetTitle(v) => self.title = v,
            DraftCommand::SetSubtitle(v) => self.subtitle = v,
            DraftCommand::SetAuthor(v) => self.author = v,
            DraftCommand::SetMile(v) => self.mile = v,
            DraftCommand::SetTag(tag) => self.tag = tag,
            DraftCommand::SelectHeader(handles) => self.select_header(handles),
            DraftCommand::SelectPhotos(handles) => self.photo_selection = handles,
            DraftCommand::ClearError => self.last_error = None,
            DraftCommand::DismissResult => self.dismiss_result(),
            DraftCommand::Reset => self.reset(),
        }
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_subtitle(&mut self, subtitle: impl Into<String>) {
        self.subtitle = subtitle.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    pub fn set_mile(&mut self, mile: impl Into<String>) {
        self.mile = mile.into();
    }

    pub fn set_tag(&mut self, tag: Option<Tag>) {
        self.tag = tag;
    }

    pub fn select_header(&mut self, mut handles: Vec<AssetHandle>) {
        handles.truncate(1);
        self.header_selection = handles;
    }

    pub fn select_photos(&mut self, handles: Vec<AssetHandle>) {
        self.photo_selection = handles;
    }

    /// Apply every location fix that has arrived. Returns how many were applied.
    pub fn sync_location(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(fix) = self.fix_rx.try_recv() {
            if fix.generation != self.generation {
                debug!(
                    fix_generation = fix.generation,
                    generation = self.generation,
                    "discarding stale location fix"
                );
                continue;
            }
            match fix.result {
                Ok(coordinate) => {
                    self.location = Some(coordinate);
                    applied += 1;
                }
                Err(e) => warn!(error = %e, "location fix failed"),
            }
        }
        applied
    }

    /// Validate, resolve and persist everything, then publish the result.
    ///
    /// Runs to completion before returning: every photo load has either been
    /// written or dropped. On failure the error is kept as
    /// [`last_error`](Self::last_error) and any earlier result is left alone.
    pub fn finalize<B: ImageBackend, S: AssetSource>(
        &mut self,
        pipeline: &Pipeline<'_, B, S>,
    ) -> Result<&FinishedPost, PostError> {
        self.sync_location();
        let request = FinalizeRequest {
            title: &self.title,
            subtitle: &self.subtitle,
            author: &self.author,
            mile: &self.mile,
            tag: self.tag,
            location: self.location,
            header: self.header_selection.first(),
            photos: &self.photo_selection,
        };
        match pipeline.assemble(&request) {
            Ok(post) => {
                self.last_error = None;
                Ok(self.result.insert(post))
            }
            Err(e) => {
                debug!(error = %e, "finalize failed");
                self.last_error = Some(e.clone());
                Err(e)
            }
        }
    }

    /// Back to an empty draft: every field, selection, error and result is
    /// cleared, and a fresh location fix is requested.
    pub fn reset(&mut self) {
        self.title.clear();
        self.subtitle.clear();
        self.author = self.default_author.clone();
        self.mile.clear();
        self.tag = None;
        self.location = None;
        self.date = Local::now().naive_local();
        self.header_selection.clear();
        self.photo_selection.clear();
        self.last_error = None;
        self.result = None;
        self.generation += 1;
        self.request_location();
    }

    /// Leave review and return to editing, keeping every other field.
    pub fn dismiss_result(&mut self) {
        self.result = None;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> &str {
        &self.subtitle
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn mile(&self) -> &str {
        &self.mile
    }

    pub fn tag(&self) -> Option<Tag> {
        self.tag
    }

    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn header_selection(&self) -> &[AssetHandle] {
        &self.header_selection
    }

    pub fn photo_selection(&self) -> &[AssetHandle] {
        &self.photo_selection
    }

    pub fn last_error(&self) -> Option<&PostError> {
        self.last_error.as_ref()
    }

    pub fn result(&self) -> Option<&FinishedPost> {
        self.result.as_ref()
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
            mile: self.mile.clone(),
            tag: self.tag,
            location: self.location,
            date: self.date,
            has_header: !self.header_selection.is_empty(),
            photo_count: self.photo_selection.len(),
            error: self.last_error.as_ref().map(ToString::to_string),
            has_result: self.result.is_some(),
        }
    }
}
