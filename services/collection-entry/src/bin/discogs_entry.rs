//!
//! src/bin/discogs_entry.rs  Andrew Belles  Oct 16th, 2026
//!
//! Fetches a Discogs release via the api and creates a Hugo collection
//! entry. A YouTube link found in the release videos is used unless
//! --youtube overrides it
//!
//! Without DISCOGS_TOKEN the api allows 25 requests/min, with it 60.
//! Get a token at https://www.discogs.com/settings/developers
//!

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use tracing_error::{InstrumentResult, TracedError};

use collection_entry::config::{self, AppConfig, DEFAULT_CONTENT_DIR};
use collection_entry::errors::{print_failure, EntryError};
use collection_entry::fetch::{AssetClient, DiscogsClient};
use collection_entry::importer::{Entry, Importer};
use collection_entry::logging;
use collection_entry::report::{Reporter, TracingReporter};
use collection_entry::sink::EntrySink;

/// Create Hugo collection entry from Discogs release page
#[derive(Parser, Debug)]
#[command(name = "discogs-entry", version, about, long_about = None)]
struct Args {
    /// Discogs release URL
    url: String,

    /// YouTube URL for the album
    #[arg(long)]
    youtube: Option<String>,

    /// Path to Hugo content/collection directory
    #[arg(long, env = "COLLECTION_CONTENT_DIR", default_value = DEFAULT_CONTENT_DIR)]
    content_dir: PathBuf
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let cfgs = match config::load_config() {
        Ok(cfgs) => cfgs,
        Err(e) => {
            print_failure(&e);
            return ExitCode::FAILURE;
        }
    };
    let _logger = match logging::init_logging(&cfgs.logging) {
        Ok(guard) => guard,
        Err(e) => {
            print_failure(&e);
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        service="discogs-entry",
        version=%env!("CARGO_PKG_VERSION"),
        authenticated=cfgs.discogs.authenticated(),
        "starting"
    );

    match run(&args, &cfgs).await {
        Ok(entry) => {
            tracing::debug!(slug = %entry.slug, "discogs-entry.done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "discogs-entry.failed");
            print_failure(&e);
            ExitCode::FAILURE
        }
    }
}

#[tracing::instrument(skip_all, fields(url = %args.url))]
async fn run(args: &Args, cfgs: &AppConfig) -> Result<Entry, TracedError<EntryError>> {
    let reporter = Arc::new(TracingReporter);
    if !cfgs.discogs.authenticated() {
        reporter.info("No DISCOGS_TOKEN found - using unauthenticated API (rate limited)");
        reporter.info(
            "For higher rate limits, get a token at: https://www.discogs.com/settings/developers"
        );
        reporter.info("Then run: export DISCOGS_TOKEN=your_token_here");
    }

    // validated before any request goes out
    let (url, release_id) = config::parse_discogs_url(&args.url).in_current_span()?;

    let client = DiscogsClient::new(&cfgs.http, &cfgs.discogs).in_current_span()?;
    let assets = AssetClient::new(&cfgs.http).in_current_span()?;
    let importer = Importer::new(EntrySink::new(&args.content_dir), assets, reporter);

    importer
        .import_discogs(&client, release_id, &url, args.youtube.as_deref())
        .await
        .in_current_span()
}
