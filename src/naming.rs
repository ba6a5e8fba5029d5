//! File naming for post assets and the markdown document.
//!
//! Every name is derived from the post title, so the blog's `/img/` folder
//! and `_posts/` folder line up with what the front matter references:
//!
//! | Asset | Name | Example (`Trail Day 1`) |
//! |---|---|---|
//! | Header image | hyphenated title + `Header.jpg` | `Trail-Day-1Header.jpg` |
//! | Photo *n* | raw title + selection index + `.jpg` | `Trail Day 12.jpg` |
//! | Post | `yyyy-MM-dd-` + hyphenated title + `.markdown` | `2026-10-19-Trail-Day-1.markdown` |
//!
//! Photo names keep the title's spaces. The static-site generator already
//! serves them under that name, so it stays.
//!
//! Path separators in the title become hyphens, so every name is a single
//! path component and stays inside the directory it is joined onto.

use chrono::NaiveDate;

/// Replace every space with a hyphen. No other normalization happens.
pub fn hyphenate(title: &str) -> String {
    title.replace(' ', "-")
}

/// The title as one path component: `/` and `\\` become `-`.
///
/// A bare `.` or `..` cannot survive either, since every name built on the
/// stem appends a suffix.
pub fn file_stem(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}

/// `Trail Day 1` → `Trail-Day-1Header.jpg`
pub fn header_file_name(title: &str) -> String {
    format!("{}Header.jpg", hyphenate(&file_stem(title)))
}

/// `Trail Day 1`, index 2 → `Trail Day 12.jpg`
///
/// The index is the photo's position in the original selection, not the
/// order its load finished in.
pub fn photo_file_name(title: &str, index: usize) -> String {
    format!("{}{}.jpg", file_stem(title), index)
}

/// `2026-10-19`, `Trail Day 1` → `2026-10-19-Trail-Day-1.markdown`
pub fn post_file_name(date: NaiveDate, title: &str) -> String {
    format!(
        "{}-{}.markdown",
        date.format("%Y-%m-%d"),
        hyphenate(&file_stem(title))
    )
}

/// Parse the free-text mile field.
///
/// Only a plain integer counts (an optional sign is fine). Anything else,
/// including decimals and surrounding whitespace, means "no mile".
pub fn parse_mile(text: &str) -> Option<i64> {
    text.parse().ok()
}
