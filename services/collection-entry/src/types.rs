use serde::{Deserialize, Serialize};

/// Directory name of an entry, derived from artist and title
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Slug(pub String);

impl Slug {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Slug {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a record was read from, decides link fields and side policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Source {
    Bandcamp,
    Discogs
}

/// Canonical album data shared by both importers. Built once by an
/// extractor and only read afterwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub source: Source,
    pub artist: String,
    pub title: String,
    pub release_year: i32,
    pub description: String,
    pub cover_url: String,
    pub genres: Vec<String>,
    pub tracklist: Vec<String>,    // "<position>. <title>"
    pub label: String,
    pub catalog_number: String,
    pub credits_text: String,      // newline separated
    pub source_url: String,
    pub youtube_url: String
}

/// One physical side of a release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Side {
    pub side: String,
    pub tracks: Vec<String>
}

impl Side {
    pub fn new(side: impl Into<String>, tracks: Vec<String>) -> Self {
        Self { side: side.into(), tracks }
    }
}

pub type EntrySides = Vec<Side>;
