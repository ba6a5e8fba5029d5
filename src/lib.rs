//! # Trail Journal
//!
//! Composes blog posts from a long-distance hike: one header image, any number
//! of photos, a title, a region tag, and the hiker's location. Finalizing a
//! draft resizes every image, writes them to a scratch directory, and renders
//! a Jekyll-style markdown document that references them.
//!
//! # Architecture: Draft → Pipeline → Post
//!
//! ```text
//! 1. Draft     fields + selections + location fix   (editable state)
//! 2. Pipeline  resolve → transform → persist         (scratch_dir/*.jpg)
//! 3. Post      front matter + <img> lines            (yyyy-MM-dd-Title.markdown)
//! ```
//!
//! The draft owns the editable state and talks to the outside world through
//! small traits: an [`assets::AssetSource`] turns handles into pixels, an
//! [`assets::AssetPicker`] produces handles, a [`location::LocationProvider`]
//! answers fix requests, and an [`export::ShareExporter`] delivers files.
//! Each has a filesystem implementation used by the CLI and an in-memory one
//! used by the tests.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`draft`] | The editable draft: commands, snapshots, finalize, reset |
//! | [`pipeline`] | Validation and the parallel resolve/transform/persist step |
//! | [`post`] | The finished post and its markdown rendering |
//! | [`imaging`] | Pure-Rust decode, orient, resize and JPEG encode |
//! | [`assets`] | Asset handles, sources and pickers |
//! | [`location`] | Coordinates and asynchronous location fixes |
//! | [`export`] | "Save Body" / "Save Photos" delivery |
//! | [`naming`] | File names for images and posts, mile parsing |
//! | [`tag`] | The closed set of region tags |
//! | [`config`] | `journal.toml` loading, validation and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Completion Order, Not Selection Order
//!
//! Photos load in parallel on the rayon pool and are appended to the post as
//! each one finishes. The rendered `<img>` lines follow that order. File names
//! still carry the selection index, so `Title2.jpg` is always the third photo
//! picked even if it lands first in the document.
//!
//! ## Generations for Location Fixes
//!
//! A location request can take longer than a draft lives. Each request is
//! tagged with the draft's generation, and [`draft::PostDraft::reset`] bumps
//! it, so a late fix from a discarded draft never lands on a fresh one.

pub mod assets;
pub mod config;
pub mod draft;
pub mod export;
pub mod imaging;
pub mod location;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod post;
pub mod tag;

#[cfg(test)]
pub(crate) mod test_helpers;
