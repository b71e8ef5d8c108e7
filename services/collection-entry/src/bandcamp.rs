//!
//! src/bandcamp.rs  Andrew Belles  Oct 16th, 2026
//!
//! Pulls album fields out of a Bandcamp album page. Every field has an
//! ordered chain of extractors (linked data first, then page markup), the
//! first one that yields something wins and an exhausted chain leaves the
//! field at its default. Nothing in here fails
//!

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node, Selector};
use serde_json::Value;

use crate::normalize::MAX_GENRES;
use crate::types::{AlbumRecord, Source};

static TRALBUM_VAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)var TralbumData = (\{.*?\});").unwrap());

static NULL: Value = Value::Null;

/// Parsed page plus the two json blobs Bandcamp embeds in it. Either blob
/// is Value::Null when absent or malformed
pub struct BandcampPage {
    html: Html,
    linked_data: Value,
    tralbum: Value
}

impl BandcampPage {
    pub fn parse(body: &str) -> Self {
        let html = Html::parse_document(body);
        let linked_data = select_first(&html, r#"script[type="application/ld+json"]"#)
            .and_then(|el| serde_json::from_str(&el.text().collect::<String>()).ok())
            .unwrap_or(Value::Null);
        let tralbum = tralbum_from_var(&html)
            .or_else(|| tralbum_from_attr(&html))
            .unwrap_or(Value::Null);

        Self { html, linked_data, tralbum }
    }

    /// Linked data lookup by key path, strings only
    fn ld_str(&self, path: &[&str]) -> Option<String> {
        let mut curr = &self.linked_data;
        for key in path {
            curr = first_item(curr).get(*key)?;
        }
        first_item(curr).as_str().and_then(non_empty)
    }

    fn meta_property(&self, property: &str) -> Option<String> {
        let css = format!(r#"meta[property="{property}"]"#);
        select_first(&self.html, &css)
            .and_then(|el| el.value().attr("content"))
            .and_then(non_empty)
    }
}

type Extractor<T> = fn(&BandcampPage) -> Option<T>;

/// Tries each extractor in order, first non-empty result wins
fn first_of<T>(page: &BandcampPage, chain: &[Extractor<T>]) -> Option<T> {
    chain.iter().find_map(|extract| extract(page))
}

const ARTIST: &[Extractor<String>] = &[
    |p| p.ld_str(&["byArtist", "name"]),
    |p| p.meta_property("og:site_name"),
];

const TITLE: &[Extractor<String>] = &[
    |p| p.ld_str(&["name"]),
    |p| p.meta_property("og:title").and_then(|t| strip_title_suffix(&t)),
];

const RELEASE_YEAR: &[Extractor<i32>] = &[
    |p| p.ld_str(&["datePublished"]).and_then(|d| parse_release_year(&d)),
];

const DESCRIPTION: &[Extractor<String>] = &[
    |p| p.ld_str(&["description"]),
    |p| select_first(&p.html, "div.tralbumData.tralbum-about")
        .and_then(|el| non_empty(&stripped_text(el))),
];

const COVER_URL: &[Extractor<String>] = &[
    |p| p.ld_str(&["image"]),
    |p| p.meta_property("og:image"),
];

const GENRES: &[Extractor<Vec<String>>] = &[
    |p| keywords(&p.linked_data),
    |p| {
        let tags: Vec<String> = select_all(&p.html, "div.tralbum-tags a.tag")
            .into_iter()
            .filter_map(|el| non_empty(&stripped_text(el)))
            .collect();
        (!tags.is_empty()).then_some(tags)
    },
];

const TRACKLIST: &[Extractor<Vec<String>>] = &[
    |p| tracks_from_tralbum(&p.tralbum),
    |p| tracks_from_table(&p.html),
];

const LABEL: &[Extractor<String>] = &[
    |p| select_first(&p.html, "span.label").and_then(|el| non_empty(&stripped_text(el))),
];

const CREDITS: &[Extractor<String>] = &[
    |p| select_first(&p.html, "div.tralbumData.tralbum-credits")
        .map(text_with_breaks)
        .filter(|t| !t.trim().is_empty()),
];

/// Builds the record for one album page, `url` is kept as the source link
pub fn extract(page: &BandcampPage, url: &str, current_year: i32) -> AlbumRecord {
    let mut genres = first_of(page, GENRES).unwrap_or_default();
    genres.truncate(MAX_GENRES);

    AlbumRecord {
        source: Source::Bandcamp,
        artist: first_of(page, ARTIST).unwrap_or_default(),
        title: first_of(page, TITLE).unwrap_or_default(),
        release_year: first_of(page, RELEASE_YEAR).unwrap_or(current_year),
        description: first_of(page, DESCRIPTION).unwrap_or_default(),
        cover_url: first_of(page, COVER_URL).unwrap_or_default(),
        genres,
        tracklist: first_of(page, TRACKLIST).unwrap_or_default(),
        label: first_of(page, LABEL).unwrap_or_default(),
        catalog_number: String::new(),
        credits_text: first_of(page, CREDITS).unwrap_or_default(),
        source_url: url.to_string(),
        youtube_url: String::new()
    }
}

/// Parses and extracts in one step. `Html` is not `Send`, so callers in
/// async code use this instead of holding a BandcampPage across an await
pub fn extract_album(body: &str, url: &str, current_year: i32) -> AlbumRecord {
    extract(&BandcampPage::parse(body), url, current_year)
}

/// "Instrument | Fugazi" -> "Instrument"
fn strip_title_suffix(title: &str) -> Option<String> {
    title.split(" | ").next().and_then(non_empty)
}

/// Year of a publish date. Accepts RFC 3339, naive ISO date-times and
/// dates, and the "08 Jun 1999 00:00:00 GMT" form Bandcamp emits
pub fn parse_release_year(raw: &str) -> Option<i32> {
    let raw = raw.trim();
    let year = DateTime::parse_from_rfc3339(raw).map(|d| d.year())
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|d| d.year()))
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.year()))
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%d %b %Y %H:%M:%S GMT").map(|d| d.year()))
        .ok()?;
    (1000..=9999).contains(&year).then_some(year)
}

fn keywords(ld: &Value) -> Option<Vec<String>> {
    let genres: Vec<String> = match ld.get("keywords")? {
        Value::String(s) => s.split(',').filter_map(non_empty).collect(),
        Value::Array(items) => items.iter()
            .filter_map(Value::as_str)
            .filter_map(non_empty)
            .collect(),
        _ => Vec::new(),
    };
    (!genres.is_empty()).then_some(genres)
}

fn tracks_from_tralbum(tralbum: &Value) -> Option<Vec<String>> {
    let info = tralbum.get("trackinfo")?.as_array()?;
    let tracks: Vec<String> = info.iter()
        .enumerate()
        .filter_map(|(idx, track)| {
            let title = track.get("title")?.as_str().and_then(non_empty)?;
            let position = match track.get("track_num") {
                Some(Value::Number(n)) => n.to_string(),
                Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
                _ => (idx + 1).to_string(),
            };
            Some(format!("{position}. {title}"))
        })
        .collect();
    (!tracks.is_empty()).then_some(tracks)
}

fn tracks_from_table(html: &Html) -> Option<Vec<String>> {
    let row_sel = Selector::parse("tr.track_row_view").ok()?;
    let num_sel = Selector::parse("div.track_number").ok()?;
    let title_sel = Selector::parse("span.track-title").ok()?;

    let table = select_first(html, "table#track_table")?;
    let tracks: Vec<String> = table.select(&row_sel)
        .filter_map(|row| {
            let num = row.select(&num_sel).next()?;
            let title = row.select(&title_sel).next()?;
            let num = stripped_text(num);
            Some(format!("{}. {}", num.trim_end_matches('.'), stripped_text(title)))
        })
        .collect();
    (!tracks.is_empty()).then_some(tracks)
}

fn tralbum_from_var(html: &Html) -> Option<Value> {
    select_all(html, "script")
        .into_iter()
        .map(|el| el.text().collect::<String>())
        .filter(|src| src.contains("var TralbumData"))
        .find_map(|src| {
            let blob = TRALBUM_VAR.captures(&src)?.get(1)?.as_str().to_string();
            serde_json::from_str(&blob).ok()
        })
}

fn tralbum_from_attr(html: &Html) -> Option<Value> {
    select_first(html, "script[data-tralbum]")
        .and_then(|el| el.value().attr("data-tralbum"))
        .and_then(|raw| serde_json::from_str(raw).ok())
}

/// Text of an element with <br> turned into newlines, whitespace kept
fn text_with_breaks(el: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in el.descendants() {
        match node.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(e) if e.name() == "br" => out.push('\n'),
            _ => {}
        }
    }
    out
}

/// Trimmed text pieces of an element joined by single spaces
fn stripped_text(el: ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn select_first<'a>(html: &'a Html, css: &str) -> Option<ElementRef<'a>> {
    let sel = Selector::parse(css).ok()?;
    html.select(&sel).next()
}

fn select_all<'a>(html: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(sel) => html.select(&sel).collect(),
        Err(_) => Vec::new(),
    }
}

/// Linked data fields may hold one value or a list of them
fn first_item(v: &Value) -> &Value {
    match v {
        Value::Array(items) => items.first().unwrap_or(&NULL),
        other => other,
    }
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}
