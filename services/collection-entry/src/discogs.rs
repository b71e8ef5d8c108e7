//!
//! src/discogs.rs  Andrew Belles  Oct 16th, 2026
//!
//! Typed view of a Discogs /releases/{id} response and the mapping into
//! an AlbumRecord. Every field defaults, a sparse release still maps
//!

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer};

use crate::normalize::{truncate_chars, MAX_CREDIT_LINES, MAX_GENRES};
use crate::types::{AlbumRecord, Source};

pub const MAX_NOTES_CHARS: usize = 500;
const MAX_FROM_EACH: usize = 3;

static DISAMBIGUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+\(\d+\)$").unwrap());

/// Discogs sends explicit nulls for some string fields, read them as empty
fn null_as_empty<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(d).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Release {
    pub id: u64,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    pub year: Option<i64>,
    pub artists: Vec<Artist>,
    pub labels: Vec<Label>,
    pub genres: Vec<String>,
    pub styles: Vec<String>,
    pub tracklist: Vec<Track>,
    pub notes: Option<String>,
    pub extraartists: Vec<Credit>,
    pub images: Vec<Image>,
    pub videos: Vec<Video>
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Artist {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Label {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub catno: String
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Track {
    #[serde(deserialize_with = "null_as_empty")]
    pub position: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Credit {
    #[serde(deserialize_with = "null_as_empty")]
    pub name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub role: String
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Image {
    #[serde(deserialize_with = "null_as_empty")]
    pub uri: String
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Video {
    #[serde(deserialize_with = "null_as_empty")]
    pub uri: String
}

/// Builds the record for a release, `url` is the page the user passed in
pub fn extract(release: &Release, url: &str, current_year: i32) -> AlbumRecord {
    let (label, catalog_number) = release.labels.first()
        .map(|l| (l.name.trim().to_string(), l.catno.trim().to_string()))
        .unwrap_or_default();

    AlbumRecord {
        source: Source::Discogs,
        artist: release.artists.first()
            .map(|a| strip_disambiguation(&a.name))
            .unwrap_or_default(),
        title: release.title.trim().to_string(),
        release_year: release_year(release.year, current_year),
        description: release.notes.as_deref()
            .map(|n| truncate_chars(n.trim(), MAX_NOTES_CHARS))
            .unwrap_or_default(),
        cover_url: release.images.first()
            .map(|i| i.uri.clone())
            .unwrap_or_default(),
        genres: merge_genres(&release.genres, &release.styles),
        tracklist: tracklist(&release.tracklist),
        label,
        catalog_number,
        credits_text: credits(&release.extraartists),
        source_url: url.to_string(),
        youtube_url: first_youtube(&release.videos).unwrap_or_default()
    }
}

fn release_year(year: Option<i64>, current_year: i32) -> i32 {
    year.filter(|y| (1000..=9999).contains(y))
        .and_then(|y| i32::try_from(y).ok())
        .unwrap_or(current_year)
}

/// "Fugazi (2)" -> "Fugazi"
pub fn strip_disambiguation(name: &str) -> String {
    DISAMBIGUATION.replace(name.trim(), "").into_owned()
}

/// First three genres, then styles from the first three that are not
/// already present, never more than MAX_GENRES in total
pub fn merge_genres(genres: &[String], styles: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = genres.iter().take(MAX_FROM_EACH).cloned().collect();
    for style in styles.iter().take(MAX_FROM_EACH) {
        if merged.len() >= MAX_GENRES {
            break;
        }
        if !merged.contains(style) {
            merged.push(style.clone());
        }
    }
    merged
}

/// "<position>. <title>", entries missing either half are skipped
pub fn tracklist(tracks: &[Track]) -> Vec<String> {
    tracks.iter()
        .filter_map(|t| {
            let position = t.position.trim();
            let title = t.title.trim();
            (!position.is_empty() && !title.is_empty())
                .then(|| format!("{position}. {title}"))
        })
        .collect()
}

/// "name - role" per credit, or just the name when the role is missing
pub fn credits(credits: &[Credit]) -> String {
    credits.iter()
        .take(MAX_CREDIT_LINES)
        .filter_map(|c| {
            let name = c.name.trim();
            let role = c.role.trim();
            match (name.is_empty(), role.is_empty()) {
                (true, _) => None,
                (false, true) => Some(name.to_string()),
                (false, false) => Some(format!("{name} - {role}")),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// First video hosted on YouTube wins
pub fn first_youtube(videos: &[Video]) -> Option<String> {
    videos.iter()
        .map(|v| v.uri.trim())
        .find(|uri| {
            let lower = uri.to_ascii_lowercase();
            lower.contains("youtube.com") || lower.contains("youtu.be")
        })
        .map(str::to_string)
}
