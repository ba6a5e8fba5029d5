//! Region tags attached to every finished post.
//!
//! The set is closed: the blog's tag pages are generated per region, so a
//! post can only land in one of these buckets. The display name is what ends
//! up in the `tag:` front-matter line, which is why "New Mexico" keeps its
//! space.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    NewMexico,
    Colorado,
    Wyoming,
    Montana,
    Other,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown tag '{0}' (expected one of: New Mexico, Colorado, Wyoming, Montana, Other)")]
pub struct UnknownTag(pub String);

impl Tag {
    /// All tags, in selector order.
    pub const ALL: [Tag; 5] = [
        Tag::NewMexico,
        Tag::Colorado,
        Tag::Wyoming,
        Tag::Montana,
        Tag::Other,
    ];

    /// Name written to front matter and shown in the selector.
    pub fn display_name(self) -> &'static str {
        match self {
            Tag::NewMexico => "New Mexico",
            Tag::Colorado => "Colorado",
            Tag::Wyoming => "Wyoming",
            Tag::Montana => "Montana",
            Tag::Other => "Other",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Accepts the display name or the dashed/squashed forms typed on a command
/// line (`new-mexico`, `newmexico`), case-insensitively.
impl FromStr for Tag {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        Tag::ALL
            .into_iter()
            .find(|tag| {
                tag.display_name()
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .flat_map(char::to_lowercase)
                    .eq(key.chars())
            })
            .ok_or_else(|| UnknownTag(s.to_string()))
    }
}
