//!
//! src/normalize.rs  Andrew Belles  Oct 16th, 2026
//!
//! Reshapes an extracted AlbumRecord into what the entry needs: slug,
//! tracklist sides, escaped strings and the truncation limits
//!

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{EntrySides, Side, Slug, Source};

pub const MAX_GENRES: usize = 5;
pub const MAX_CREDIT_LINES: usize = 20;
pub const MAX_DESCRIPTION_CHARS: usize = 200;
pub const SPLIT_THRESHOLD: usize = 10;
pub const FALLBACK_SLUG: &str = "untitled";

static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").unwrap());
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").unwrap());

/// Lower-cases, drops everything outside word chars/whitespace/hyphen and
/// joins the remaining words with single hyphens
pub fn slugify_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let cleaned = NON_SLUG.replace_all(&lowered, "");
    let joined = SEPARATORS.replace_all(&cleaned, "-");
    joined.trim_matches('-').to_string()
}

/// Entry slug for an album. Falls back to FALLBACK_SLUG so an album with
/// no recoverable artist or title never writes into the content root
pub fn slugify(artist: &str, title: &str) -> Slug {
    let slug = slugify_text(&format!("{artist}-{title}"));
    if slug.is_empty() {
        Slug(FALLBACK_SLUG.to_string())
    } else {
        Slug(slug)
    }
}

/// Escapes a value for a double-quoted TOML string. Backslashes go first so
/// the escapes added for quotes and control chars are not escaped again
pub fn escape_toml_string(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"");

    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Truncates on char boundaries, never splitting a code point
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

pub fn cap_genres(genres: &[String]) -> Vec<String> {
    genres.iter().take(MAX_GENRES).cloned().collect()
}

/// Non-empty trimmed lines of a credits block, at most MAX_CREDIT_LINES
pub fn credit_lines(credits_text: &str) -> Vec<String> {
    credits_text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(MAX_CREDIT_LINES)
        .map(str::to_string)
        .collect()
}

/// Leading vinyl side letter of a rendered track ("B2. Title" -> 'B')
pub fn side_letter(track: &str) -> Option<char> {
    let c = track.chars().next()?.to_ascii_uppercase();
    matches!(c, 'A'..='D').then_some(c)
}

///
/// Policy for grouping a tracklist into sides
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideSplit {
    /// Halve long tracklists into "Side A" / "Side B"
    Numeric,
    /// Follow the side letters already present in track positions
    LetterGrouped
}

impl SideSplit {
    /// Bandcamp positions are plain numbers. Discogs positions carry side
    /// letters for vinyl and plain numbers for most other formats
    pub fn for_source(source: Source, tracks: &[String]) -> SideSplit {
        match source {
            Source::Bandcamp => SideSplit::Numeric,
            Source::Discogs if tracks.iter().any(|t| side_letter(t).is_some()) =>
                SideSplit::LetterGrouped,
            Source::Discogs => SideSplit::Numeric,
        }
    }

    pub fn split(self, tracks: &[String]) -> EntrySides {
        match self {
            SideSplit::Numeric => numeric_split(tracks),
            SideSplit::LetterGrouped => letter_grouped_split(tracks),
        }
    }
}

pub fn numeric_split(tracks: &[String]) -> EntrySides {
    if tracks.is_empty() {
        return Vec::new();
    }
    if tracks.len() > SPLIT_THRESHOLD {
        let mid = tracks.len() / 2;
        vec![
            Side::new("Side A", tracks[..mid].to_vec()),
            Side::new("Side B", tracks[mid..].to_vec()),
        ]
    } else {
        vec![Side::new("Side A", tracks.to_vec())]
    }
}

/// Opens a new side whenever the leading letter changes. Tracks without a
/// letter join the open side, or open "Side A" if none is open yet
pub fn letter_grouped_split(tracks: &[String]) -> EntrySides {
    if !tracks.iter().any(|t| side_letter(t).is_some()) {
        return numeric_split(tracks);
    }

    let mut sides: EntrySides = Vec::new();
    let mut open: Option<Side> = None;

    for track in tracks {
        let name = match side_letter(track) {
            Some(letter) => format!("Side {letter}"),
            None => open.as_ref()
                .map(|s| s.side.clone())
                .unwrap_or_else(|| "Side A".to_string()),
        };

        match open.as_mut() {
            Some(side) if side.side == name => side.tracks.push(track.clone()),
            _ => {
                if let Some(done) = open.take() {
                    sides.push(done);
                }
                open = Some(Side::new(name, vec![track.clone()]));
            }
        }
    }

    if let Some(done) = open {
        sides.push(done);
    }
    sides
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tracks(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("{i}. Track {i}")).collect()
    }

    fn owned(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn slug_joins_artist_and_title() {
        assert_eq!(slugify("Fugazi", "Instrument").as_str(), "fugazi-instrument");
        assert_eq!(slugify("X", "Y").as_str(), "x-y");
    }

    #[test]
    fn slug_drops_punctuation_and_collapses_separators() {
        assert_eq!(
            slugify("Godspeed You! Black Emperor", "F♯ A♯ ∞").as_str(),
            "godspeed-you-black-emperor-f-a"
        );
        assert_eq!(slugify_text("  --Hello,   World--  "), "hello-world");
        assert_eq!(slugify_text("!!!"), "");
        assert_eq!(slugify("", "").as_str(), FALLBACK_SLUG);
    }

    #[test]
    fn slug_ignores_case_and_punctuation_differences() {
        assert_eq!(slugify("The Band", "Stage Fright"), slugify("the band!", "STAGE FRIGHT?"));
    }

    #[test]
    fn escape_handles_backslash_before_quote() {
        assert_eq!(escape_toml_string(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(escape_toml_string(r"C:\dir"), r"C:\\dir");
        assert_eq!(escape_toml_string(r#"\""#), r#"\\\""#);
        assert_eq!(escape_toml_string(""), "");
    }

    #[test]
    fn escape_handles_control_characters() {
        assert_eq!(escape_toml_string("a\nb\tc"), "a\\nb\\tc");
        assert_eq!(escape_toml_string("\u{7}"), "\\u0007");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars(&"x".repeat(600), 500).len(), 500);
    }

    #[test]
    fn genres_are_capped_at_five() {
        let genres: Vec<String> = (0..8).map(|i| format!("genre {i}")).collect();
        let capped = cap_genres(&genres);
        assert_eq!(capped.len(), 5);
        assert_eq!(capped[4], "genre 4");
    }

    #[test]
    fn credit_lines_are_trimmed_filtered_and_capped() {
        let text = "  Guy Picciotto - Vocals \n\n\t\nIan MacKaye - Guitar\n";
        assert_eq!(
            credit_lines(text),
            owned(&["Guy Picciotto - Vocals", "Ian MacKaye - Guitar"])
        );

        let many: String = (0..30).map(|i| format!("person {i}\n")).collect();
        assert_eq!(credit_lines(&many).len(), MAX_CREDIT_LINES);
    }

    #[test]
    fn numeric_split_halves_long_tracklists() {
        let sides = numeric_split(&tracks(12));
        assert_eq!(sides.len(), 2);
        assert_eq!(sides[0].side, "Side A");
        assert_eq!(sides[0].tracks.len(), 6);
        assert_eq!(sides[1].side, "Side B");
        assert_eq!(sides[1].tracks.len(), 6);

        let sides = numeric_split(&tracks(11));
        assert_eq!(sides[0].tracks.len(), 5);
        assert_eq!(sides[1].tracks.len(), 6);
    }

    #[test]
    fn numeric_split_keeps_ten_tracks_on_one_side() {
        let sides = numeric_split(&tracks(10));
        assert_eq!(sides.len(), 1);
        assert_eq!(sides[0].side, "Side A");
        assert_eq!(sides[0].tracks.len(), 10);
    }

    #[test]
    fn numeric_split_of_nothing_is_empty() {
        assert!(numeric_split(&[]).is_empty());
    }

    #[test]
    fn letter_split_groups_by_side() {
        let sides = letter_grouped_split(&owned(&["A1. Intro", "A2. Verse", "B1. Bridge"]));
        assert_eq!(sides, vec![
            Side::new("Side A", owned(&["A1. Intro", "A2. Verse"])),
            Side::new("Side B", owned(&["B1. Bridge"])),
        ]);
    }

    #[test]
    fn letter_split_attaches_unlettered_tracks_to_open_side() {
        let sides = letter_grouped_split(&owned(&[
            "1. Hidden", "A1. Intro", "3. Interlude", "c1. Lower", "D1. End",
        ]));
        assert_eq!(sides, vec![
            Side::new("Side A", owned(&["1. Hidden", "A1. Intro", "3. Interlude"])),
            Side::new("Side C", owned(&["c1. Lower"])),
            Side::new("Side D", owned(&["D1. End"])),
        ]);
    }

    #[test]
    fn letter_split_falls_back_to_numeric() {
        let input = tracks(12);
        assert_eq!(letter_grouped_split(&input), numeric_split(&input));
    }

    #[test]
    fn policy_follows_source() {
        let lettered = owned(&["A1. Intro", "B1. Outro"]);
        assert_eq!(SideSplit::for_source(Source::Bandcamp, &lettered), SideSplit::Numeric);
        assert_eq!(SideSplit::for_source(Source::Discogs, &lettered), SideSplit::LetterGrouped);
        assert_eq!(SideSplit::for_source(Source::Discogs, &tracks(4)), SideSplit::Numeric);
    }

    proptest! {
        #[test]
        fn slug_is_idempotent(s in any::<String>()) {
            let once = slugify_text(&s);
            prop_assert_eq!(slugify_text(&once), once);
        }

        #[test]
        fn escaped_strings_round_trip_through_toml(s in any::<String>()) {
            let doc = format!("value = \"{}\"\n", escape_toml_string(&s));
            let parsed: toml::Table = toml::from_str(&doc).unwrap();
            prop_assert_eq!(parsed["value"].as_str(), Some(s.as_str()));
        }

        #[test]
        fn numeric_split_preserves_order(n in 0usize..40) {
            let input = tracks(n);
            let flat: Vec<String> = numeric_split(&input)
                .into_iter()
                .flat_map(|s| s.tracks)
                .collect();
            prop_assert_eq!(flat, input);
        }
    }
}
