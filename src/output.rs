//! CLI output formatting for the compose flow.
//!
//! # Output Format
//!
//! ## Draft
//!
//! ```text
//! Draft 2026-10-19 14:03
//!     Location: 37.5, -106.25
//!     Altitude: 8202 feet
//!     Header: selected
//!     Photos: 3
//! ```
//!
//! ## Finalize
//!
//! ```text
//! Header → /tmp/trail-journal/Trail-Day-1Header.jpg
//!     002 → /tmp/trail-journal/Trail Day 12.jpg
//!     000 (lost.jpg) dropped: cannot decode
//! ```
//!
//! ## Review
//!
//! ```text
//! Previews
//!     H 640x480
//!     0 320x480
//!
//! ---
//! layout: post
//! ...
//! ```
//!
//! # Architecture
//!
//! Each screen has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure: no I/O, no side effects.

use crate::draft::DraftSnapshot;
use crate::export::ShareOutcome;
use crate::location::Coordinate;
use crate::pipeline::FinalizeEvent;
use crate::post::{FinishedPost, preview_label};
use crate::tag::Tag;
use image::GenericImageView;
use std::path::Path;

/// Format a 0-based photo index as 3-digit zero-padded.
fn format_index(index: usize) -> String {
    format!("{:0>3}", index)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn file_name_or_path(handle: &str) -> String {
    Path::new(handle)
        .file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| handle.to_string())
}

/// `latitude, longitude` as shown on the draft screen.
pub fn format_coordinate(coordinate: &Coordinate) -> String {
    format!("{}, {}", coordinate.latitude, coordinate.longitude)
}

/// Altitude as shown on the draft screen, in whole feet.
pub fn format_altitude(coordinate: &Coordinate) -> String {
    format!("{} feet", coordinate.altitude_feet())
}

// ============================================================================
// Draft
// ============================================================================

/// Format the draft header: date, location, and what has been selected.
pub fn format_draft(snapshot: &DraftSnapshot) -> Vec<String> {
    let mut lines = vec![format!("Draft {}", snapshot.date.format("%Y-%m-%d %H:%M"))];
    let pad = indent(1);

    match &snapshot.location {
        Some(coordinate) => {
            lines.push(format!("{pad}Location: {}", format_coordinate(coordinate)));
            lines.push(format!("{pad}Altitude: {}", format_altitude(coordinate)));
        }
        None => lines.push(format!("{pad}Location: unknown")),
    }

    if !snapshot.title.trim().is_empty() {
        lines.push(format!("{pad}Title: {}", snapshot.title.trim()));
    }
    if let Some(tag) = snapshot.tag {
        lines.push(format!("{pad}Tag: {}", tag));
    }
    lines.push(format!(
        "{pad}Header: {}",
        if snapshot.has_header { "selected" } else { "none" }
    ));
    lines.push(format!("{pad}Photos: {}", snapshot.photo_count));

    if let Some(error) = &snapshot.error {
        lines.push(format!("{pad}Error: {}", error));
    }
    lines
}

pub fn print_draft(snapshot: &DraftSnapshot) {
    for line in format_draft(snapshot) {
        println!("{}", line);
    }
}

// ============================================================================
// Finalize progress
// ============================================================================

/// Format a single finalize progress event as display lines.
pub fn format_finalize_event(event: &FinalizeEvent) -> Vec<String> {
    match event {
        FinalizeEvent::HeaderPersisted { path } => {
            vec![format!("Header \u{2192} {}", path.display())]
        }
        FinalizeEvent::PhotoPersisted { index, path } => {
            vec![format!(
                "{}{} \u{2192} {}",
                indent(1),
                format_index(*index),
                path.display()
            )]
        }
        FinalizeEvent::PhotoDropped {
            index,
            handle,
            reason,
        } => vec![format!(
            "{}{} ({}) dropped: {}",
            indent(1),
            format_index(*index),
            file_name_or_path(handle),
            reason
        )],
        FinalizeEvent::PhotoSkipped { index, handle } => vec![format!(
            "{}{} ({}) skipped: unsupported",
            indent(1),
            format_index(*index),
            file_name_or_path(handle)
        )],
    }
}

// ============================================================================
// Review
// ============================================================================

/// Format the review screen: labelled previews, then the markdown body.
pub fn format_review(post: &FinishedPost) -> Vec<String> {
    let mut lines = vec!["Previews".to_string()];
    for (i, preview) in post.previews().iter().enumerate() {
        let (w, h) = preview.dimensions();
        lines.push(format!("{}{} {}x{}", indent(1), preview_label(i), w, h));
    }
    lines.push(String::new());
    lines.extend(post.render_body().lines().map(str::to_string));
    lines
}

pub fn print_review(post: &FinishedPost) {
    for line in format_review(post) {
        println!("{}", line);
    }
}

// ============================================================================
// Export
// ============================================================================

/// Format a completed share: `what` followed by each delivered file.
pub fn format_export(what: &str, outcome: &ShareOutcome) -> Vec<String> {
    let mut lines = vec![format!("{} ({} files)", what, outcome.delivered.len())];
    for path in &outcome.delivered {
        lines.push(format!("{}{}", indent(1), path.display()));
    }
    lines
}

pub fn print_export(what: &str, outcome: &ShareOutcome) {
    for line in format_export(what, outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Tags
// ============================================================================

/// One line per tag: display name, then the stable key in parens.
pub fn format_tags() -> Vec<String> {
    Tag::ALL
        .iter()
        .map(|tag| format!("{} ({:?})", tag.display_name(), tag))
        .collect()
}

pub fn print_tags() {
    for line in format_tags() {
        println!("{}", line);
    }
}
