//! The finished post: an immutable snapshot ready for export.
//!
//! A [`FinishedPost`] is built once, by a successful finalize, and never
//! changes afterwards. It renders itself to the front-matter markdown the
//! blog's static-site generator consumes:
//!
//! ```text
//! ---
//! layout: post
//! title: Trail Day 1
//! author: Randall
//! date: 2022-04-20 18:30:00
//! background: /img/Trail-Day-1Header.jpg
//! mile: 5
//! tag: Colorado
//! ---
//! <img src="/img/Trail Day 10.jpg" class="img-fluid">
//! ```
//!
//! Optional lines (`subtitle`, `mile`, and the `latitude`/`longitude`/
//! `altitude` trio) are left out entirely when the value is absent.

use crate::location::Coordinate;
use crate::naming::{header_file_name, post_file_name};
use crate::tag::Tag;
use chrono::{Local, NaiveDate, NaiveDateTime};
use image::DynamicImage;
use serde::Serialize;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Site path every asset is served from.
const IMAGE_ROOT: &str = "/img/";

/// Text fields copied from the draft, already trimmed.
#[derive(Debug, Clone, PartialEq)]
pub struct PostFields {
    pub title: String,
    pub subtitle: Option<String>,
    pub author: String,
    pub mile: Option<i64>,
    pub tag: Tag,
    pub location: Option<Coordinate>,
}

#[derive(Debug, Clone)]
pub struct FinishedPost {
    id: Uuid,
    title: String,
    subtitle: Option<String>,
    author: String,
    /// Captured when the post was built.
    date: NaiveDateTime,
    mile: Option<i64>,
    tag: Tag,
    location: Option<Coordinate>,
    /// Persisted, transformed header image.
    header_image: PathBuf,
    /// Persisted photos, in the order their loads completed.
    photo_paths: Vec<PathBuf>,
    /// Header first, then every resolved photo in completion order.
    previews: Vec<DynamicImage>,
}

impl FinishedPost {
    pub fn new(
        fields: PostFields,
        header_image: PathBuf,
        photo_paths: Vec<PathBuf>,
        previews: Vec<DynamicImage>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            subtitle: fields.subtitle,
            author: fields.author,
            date: Local::now().naive_local(),
            mile: fields.mile,
            tag: fields.tag,
            location: fields.location,
            header_image,
            photo_paths,
            previews,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = date;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn subtitle(&self) -> Option<&str> {
        self.subtitle.as_deref()
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    pub fn mile(&self) -> Option<i64> {
        self.mile
    }

    pub fn tag(&self) -> Tag {
        self.tag
    }

    pub fn location(&self) -> Option<Coordinate> {
        self.location
    }

    pub fn header_image(&self) -> &Path {
        &self.header_image
    }

    pub fn photo_paths(&self) -> &[PathBuf] {
        &self.photo_paths
    }

    pub fn previews(&self) -> &[DynamicImage] {
        &self.previews
    }

    /// Render the markdown document: front matter, then one `<img>` per photo.
    pub fn render_body(&self) -> String {
        let mut body = String::from("---\n");
        body.push_str("layout: post\n");
        let _ = writeln!(body, "title: {}", self.title);
        if let Some(subtitle) = &self.subtitle {
            let _ = writeln!(body, "subtitle: {}", subtitle);
        }
        let _ = writeln!(body, "author: {}", self.author);
        let _ = writeln!(body, "date: {}", self.date.format("%Y-%m-%d %H:%M:%S"));
        let _ = writeln!(
            body,
            "background: {}{}",
            IMAGE_ROOT,
            header_file_name(&self.title)
        );
        if let Some(mile) = self.mile {
            let _ = writeln!(body, "mile: {}", mile);
        }
        let _ = writeln!(body, "tag: {}", self.tag);
        if let Some(location) = &self.location {
            // Debug formatting keeps the decimal point on whole degrees (`39.0`)
            let _ = writeln!(body, "latitude: {:?}", location.latitude);
            let _ = writeln!(body, "longitude: {:?}", location.longitude);
            let _ = writeln!(body, "altitude: {}", location.altitude_feet());
        }
        body.push_str("---\n");

        for photo in &self.photo_paths {
            let _ = writeln!(
                body,
                "<img src=\"{}{}\" class=\"img-fluid\">",
                IMAGE_ROOT,
                file_name_of(photo)
            );
        }

        body
    }

    /// Post file name for `date`: `yyyy-MM-dd-<Title>.markdown`.
    pub fn post_file_name_on(&self, date: NaiveDate) -> String {
        post_file_name(date, &self.title)
    }

    /// Write the rendered body into `dir`, named for `date`.
    pub fn write_post_file_on(&self, dir: &Path, date: NaiveDate) -> io::Result<PathBuf> {
        let path = dir.join(self.post_file_name_on(date));
        std::fs::write(&path, self.render_body())?;
        Ok(path)
    }

    /// Write the rendered body into `dir`, named for *today*.
    ///
    /// The name uses the current date, not [`date`](Self::date): exporting a
    /// post after midnight gives the next day's file name.
    pub fn write_post_file(&self, dir: &Path) -> io::Result<PathBuf> {
        self.write_post_file_on(dir, Local::now().date_naive())
    }

    /// Every image file to publish: header first, then the photos.
    pub fn asset_paths(&self) -> Vec<PathBuf> {
        std::iter::once(self.header_image.clone())
            .chain(self.photo_paths.iter().cloned())
            .collect()
    }

    /// Serializable summary of the post.
    pub fn manifest(&self) -> PostManifest {
        PostManifest {
            id: self.id,
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            author: self.author.clone(),
            date: self.date.format("%Y-%m-%d %H:%M:%S").to_string(),
            mile: self.mile,
            tag: self.tag.display_name(),
            location: self.location,
            header_image: self.header_image.clone(),
            photos: self.photo_paths.clone(),
        }
    }
}

/// Carousel label for preview `index`: `H` for the header, then `0`, `1`, ...
pub fn preview_label(index: usize) -> String {
    match index {
        0 => "H".to_string(),
        n => (n - 1).to_string(),
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// JSON-friendly view of a [`FinishedPost`] (no pixel data).
#[derive(Debug, Clone, Serialize)]
pub struct PostManifest {
    pub id: Uuid,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub author: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mile: Option<i64>,
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    pub header_image: PathBuf,
    pub photos: Vec<PathBuf>,
}
