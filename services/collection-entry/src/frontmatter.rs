//!
//! src/frontmatter.rs  Andrew Belles  Oct 16th, 2026
//!
//! Renders the index.md of a collection entry: TOML front matter between
//! `+++` fences followed by the description as body text
//!

use std::fmt::Write;

use chrono::NaiveDate;

use crate::normalize::{
    cap_genres, credit_lines, escape_toml_string, truncate_chars, MAX_DESCRIPTION_CHARS
};
use crate::types::{AlbumRecord, EntrySides, Source};

pub const PLACEHOLDER_BODY: &str = "Album description.";

fn quoted(s: &str) -> String {
    format!("\"{}\"", escape_toml_string(s))
}

/// Multi-line string array, one element per line
fn block_array(items: &[String]) -> String {
    let joined = items.iter()
        .map(|s| quoted(s))
        .collect::<Vec<_>>()
        .join(",\n  ");
    format!("[\n  {joined}\n]")
}

pub fn render(record: &AlbumRecord, sides: &EntrySides, date: NaiveDate) -> String {
    let mut out = String::new();
    // writes into a String cannot fail
    let _ = write_front_matter(&mut out, record, sides, date);

    if record.description.is_empty() {
        out.push_str(PLACEHOLDER_BODY);
    } else {
        out.push_str(&record.description);
    }
    out
}

fn write_front_matter(
    out: &mut String,
    record: &AlbumRecord,
    sides: &EntrySides,
    date: NaiveDate
) -> std::fmt::Result {
    let genres = cap_genres(&record.genres)
        .iter()
        .map(|g| quoted(g))
        .collect::<Vec<_>>()
        .join(", ");

    writeln!(out, "+++")?;
    writeln!(out, "title = {}", quoted(&record.title))?;
    writeln!(out, "date = {}", date.format("%Y-%m-%d"))?;
    writeln!(out, "draft = false")?;
    writeln!(out, "description = {}",
        quoted(&truncate_chars(&record.description, MAX_DESCRIPTION_CHARS)))?;

    writeln!(out)?;
    writeln!(out, "[album]")?;
    writeln!(out, "artist = {}", quoted(&record.artist))?;
    writeln!(out, "releaseYear = {}", record.release_year)?;
    writeln!(out, "label = {}", quoted(&record.label))?;
    writeln!(out, "catalogNumber = {}", quoted(&record.catalog_number))?;
    writeln!(out, "genres = [{genres}]")?;

    let bandcamp = match record.source {
        Source::Bandcamp => record.source_url.as_str(),
        Source::Discogs => "",
    };
    writeln!(out)?;
    writeln!(out, "[album.links]")?;
    writeln!(out, "spotify = \"\"")?;
    writeln!(out, "bandcamp = {}", quoted(bandcamp))?;
    writeln!(out, "appleMusic = \"\"")?;
    if record.source == Source::Discogs {
        writeln!(out, "discogs = {}", quoted(&record.source_url))?;
    }
    if !record.youtube_url.is_empty() {
        writeln!(out, "youtube = {}", quoted(&record.youtube_url))?;
    }

    for side in sides {
        writeln!(out)?;
        writeln!(out, "[[album.tracklist]]")?;
        writeln!(out, "side = {}", quoted(&side.side))?;
        writeln!(out, "tracks = {}", block_array(&side.tracks))?;
    }

    let people = credit_lines(&record.credits_text);
    if !people.is_empty() {
        writeln!(out)?;
        writeln!(out, "[[album.credits]]")?;
        writeln!(out, "section = \"Credits\"")?;
        writeln!(out, "people = {}", block_array(&people))?;
    }

    writeln!(out, "+++")?;
    writeln!(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::SideSplit;
    use crate::types::Side;

    fn record(source: Source) -> AlbumRecord {
        AlbumRecord {
            source,
            artist: "Fugazi".to_string(),
            title: "Instrument \"Soundtrack\"".to_string(),
            release_year: 1999,
            description: "A film by Jem Cohen.\nWith \\backslashes\\.".to_string(),
            cover_url: String::new(),
            genres: (0..7).map(|i| format!("g{i}")).collect(),
            tracklist: vec!["A1. Pink Frosty".to_string(), "B1. Afterthought".to_string()],
            label: "Dischord".to_string(),
            catalog_number: "DIS 120".to_string(),
            credits_text: "Jem Cohen - Director\n\n  Don Zientara  \n".to_string(),
            source_url: "https://fugazi.bandcamp.com/album/instrument".to_string(),
            youtube_url: String::new()
        }
    }

    fn front_matter(rendered: &str) -> toml::Table {
        let inner = rendered
            .strip_prefix("+++\n")
            .and_then(|r| r.split_once("+++\n"))
            .map(|(fm, _)| fm)
            .unwrap();
        toml::from_str(inner).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    #[test]
    fn renders_parseable_front_matter() {
        let rec = record(Source::Bandcamp);
        let sides = SideSplit::Numeric.split(&rec.tracklist);
        let out = render(&rec, &sides, date());
        let fm = front_matter(&out);

        assert_eq!(fm["title"].as_str(), Some("Instrument \"Soundtrack\""));
        assert_eq!(fm["draft"].as_bool(), Some(false));
        assert_eq!(fm["date"].as_datetime().map(|d| d.to_string()).as_deref(), Some("2026-10-16"));

        let album = fm["album"].as_table().unwrap();
        assert_eq!(album["artist"].as_str(), Some("Fugazi"));
        assert_eq!(album["releaseYear"].as_integer(), Some(1999));
        assert_eq!(album["catalogNumber"].as_str(), Some("DIS 120"));
        assert_eq!(album["genres"].as_array().unwrap().len(), 5);

        let links = album["links"].as_table().unwrap();
        assert_eq!(links["bandcamp"].as_str(), Some(rec.source_url.as_str()));
        assert!(links.get("discogs").is_none());
        assert!(links.get("youtube").is_none());

        let tracklist = album["tracklist"].as_array().unwrap();
        assert_eq!(tracklist.len(), 1);
        assert_eq!(tracklist[0]["side"].as_str(), Some("Side A"));
        assert_eq!(tracklist[0]["tracks"].as_array().unwrap().len(), 2);

        let credits = album["credits"].as_array().unwrap();
        let people: Vec<&str> = credits[0]["people"].as_array().unwrap()
            .iter()
            .filter_map(|p| p.as_str())
            .collect();
        assert_eq!(people, vec!["Jem Cohen - Director", "Don Zientara"]);
    }

    #[test]
    fn description_round_trips_and_body_follows() {
        let rec = record(Source::Bandcamp);
        let out = render(&rec, &Vec::new(), date());
        let fm = front_matter(&out);
        assert_eq!(fm["description"].as_str(), Some(rec.description.as_str()));
        assert!(out.ends_with("+++\n\nA film by Jem Cohen.\nWith \\backslashes\\."));
    }

    #[test]
    fn long_description_is_cut_in_front_matter_only() {
        let mut rec = record(Source::Bandcamp);
        rec.description = "d".repeat(450);
        let out = render(&rec, &Vec::new(), date());
        let fm = front_matter(&out);
        assert_eq!(fm["description"].as_str().map(|d| d.len()), Some(200));
        assert!(out.ends_with(&"d".repeat(450)));
    }

    #[test]
    fn empty_description_uses_placeholder() {
        let mut rec = record(Source::Bandcamp);
        rec.description.clear();
        rec.credits_text.clear();
        let out = render(&rec, &Vec::new(), date());
        assert!(out.ends_with(&format!("+++\n\n{PLACEHOLDER_BODY}")));
        assert!(!out.contains("[[album.credits]]"));
    }

    #[test]
    fn discogs_links_carry_source_and_youtube() {
        let mut rec = record(Source::Discogs);
        rec.source_url = "https://www.discogs.com/release/1".to_string();
        rec.youtube_url = "https://youtu.be/abc".to_string();
        let sides = vec![
            Side::new("Side A", vec!["A1. Pink Frosty".to_string()]),
            Side::new("Side B", vec!["B1. Afterthought".to_string()]),
        ];
        let fm = front_matter(&render(&rec, &sides, date()));
        let links = fm["album"]["links"].as_table().unwrap();
        assert_eq!(links["bandcamp"].as_str(), Some(""));
        assert_eq!(links["discogs"].as_str(), Some("https://www.discogs.com/release/1"));
        assert_eq!(links["youtube"].as_str(), Some("https://youtu.be/abc"));
        assert_eq!(fm["album"]["tracklist"].as_array().unwrap().len(), 2);
    }
}
