//!
//! src/importer.rs  Andrew Belles  Oct 16th, 2026
//!
//! Drives one import: fetch the source, extract the record, normalize it
//! and write the entry. Cover downloads are best effort, every other
//! failure ends the run
//!

use std::{path::PathBuf, sync::Arc};

use chrono::{Datelike, Local, NaiveDate};
use tracing::{debug, instrument};
use url::Url;

use crate::bandcamp;
use crate::discogs;
use crate::errors::EntryError;
use crate::fetch::{AssetClient, BandcampClient, DiscogsClient};
use crate::frontmatter;
use crate::normalize::{slugify, SideSplit};
use crate::report::Reporter;
use crate::sink::EntrySink;
use crate::types::{AlbumRecord, Slug};

/// What a finished import left on disk
#[derive(Debug, Clone)]
pub struct Entry {
    pub slug: Slug,
    pub dir: PathBuf,
    pub index: PathBuf,
    pub cover: Option<PathBuf>
}

pub struct Importer {
    sink: EntrySink,
    assets: Option<AssetClient>,
    reporter: Arc<dyn Reporter>,
    today: NaiveDate
}

impl Importer {
    pub fn new(sink: EntrySink, assets: AssetClient, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            sink,
            assets: Some(assets),
            reporter,
            today: Local::now().date_naive()
        }
    }

    /// Never touches the network for covers, the date is pinned
    pub fn offline(sink: EntrySink, reporter: Arc<dyn Reporter>, today: NaiveDate) -> Self {
        Self { sink, assets: None, reporter, today }
    }

    pub fn current_year(&self) -> i32 {
        self.today.year()
    }

    #[instrument(skip_all, fields(url = %url))]
    pub async fn import_bandcamp(&self, client: &BandcampClient, url: &Url) ->
        Result<Entry, EntryError> {

        self.reporter.info(&format!("Fetching {url}..."));
        let body = client.fetch_album_page(url).await?;
        debug!(bytes = body.len(), "bandcamp.page");

        let record = bandcamp::extract_album(&body, url.as_str(), self.current_year());
        self.write_entry(&record).await
    }

    #[instrument(skip_all, fields(release_id = release_id, url = %url))]
    pub async fn import_discogs(
        &self,
        client: &DiscogsClient,
        release_id: u64,
        url: &Url,
        youtube: Option<&str>
    ) -> Result<Entry, EntryError> {

        self.reporter.info(&format!("Fetching release {release_id} from Discogs API..."));
        if client.cfg.authenticated() {
            self.reporter.info(&format!(
                "Using authenticated API ({} requests/min)", client.cfg.rate_limit()
            ));
        } else {
            self.reporter.info(&format!(
                "Using unauthenticated API ({} requests/min limit)", client.cfg.rate_limit()
            ));
        }

        let release = client.fetch_release(release_id).await?;
        debug!(tracks = release.tracklist.len(), "discogs.release");

        let record = discogs::extract(&release, url.as_str(), self.current_year());
        let record = self.with_youtube(record, youtube);
        self.write_entry(&record).await
    }

    /// An explicit --youtube wins over the link found in the release
    fn with_youtube(&self, record: AlbumRecord, youtube: Option<&str>) -> AlbumRecord {
        match youtube.map(str::trim).filter(|y| !y.is_empty()) {
            Some(y) => AlbumRecord { youtube_url: y.to_string(), ..record },
            None => {
                if !record.youtube_url.is_empty() {
                    self.reporter.info(&format!(
                        "Found YouTube link in Discogs metadata: {}", record.youtube_url
                    ));
                }
                record
            }
        }
    }

    /// Normalizes the record and writes cover and index.md under its slug
    pub async fn write_entry(&self, record: &AlbumRecord) -> Result<Entry, EntryError> {
        let slug = slugify(&record.artist, &record.title);
        let dir = self.sink.entry_dir(&slug)?;
        self.reporter.info(&format!("Creating entry in {}...", dir.display()));

        let cover = self.save_cover(&dir, &record.cover_url).await;

        let sides = SideSplit::for_source(record.source, &record.tracklist)
            .split(&record.tracklist);
        let contents = frontmatter::render(record, &sides, self.today);
        let index = self.sink.write_index(&dir, &contents)?;

        self.reporter.info(&format!("Created {}", index.display()));
        self.reporter.info("Entry created successfully!");
        self.reporter.info(&format!("Location: {}", dir.display()));
        self.reporter.info(&format!(
            "To view: hugo server -D, then visit http://localhost:1313/collection/{slug}"
        ));

        Ok( Entry { slug, dir, index, cover } )
    }

    /// Failures are reported as warnings and never abort the entry
    async fn save_cover(&self, dir: &std::path::Path, cover_url: &str) -> Option<PathBuf> {
        if cover_url.is_empty() {
            return None;
        }
        let Some(assets) = &self.assets else {
            debug!(cover_url, "cover.skip.offline");
            return None;
        };

        self.reporter.info("Downloading cover image...");
        let saved = match assets.fetch_bytes(cover_url).await {
            Ok(bytes) => self.sink.write_cover(dir, cover_url, &bytes),
            Err(e) => Err(e),
        };

        match saved {
            Ok(path) => {
                self.reporter.info(&format!("Cover image saved to {}", path.display()));
                Some(path)
            }
            Err(e) => {
                self.reporter.warn(&format!("Failed to download cover image: {e}"));
                None
            }
        }
    }
}
