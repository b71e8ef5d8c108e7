//!
//! src/bin/bandcamp_entry.rs  Andrew Belles  Oct 16th, 2026
//!
//! Scrapes a Bandcamp album page and creates a Hugo collection entry
//!
//! Example:
//!     bandcamp-entry https://fugazi.bandcamp.com/album/instrument
//!

use std::{path::PathBuf, process::ExitCode, sync::Arc};

use clap::Parser;
use tracing_error::{InstrumentResult, TracedError};

use collection_entry::config::{self, AppConfig, DEFAULT_CONTENT_DIR};
use collection_entry::errors::{print_failure, EntryError};
use collection_entry::fetch::{AssetClient, BandcampClient};
use collection_entry::importer::{Entry, Importer};
use collection_entry::logging;
use collection_entry::report::TracingReporter;
use collection_entry::sink::EntrySink;

/// Create Hugo collection entry from Bandcamp album page
#[derive(Parser, Debug)]
#[command(name = "bandcamp-entry", version, about, long_about = None)]
struct Args {
    /// Bandcamp album URL
    url: String,

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
        service="bandcamp-entry",
        version=%env!("CARGO_PKG_VERSION"),
        "starting"
    );

    match run(&args, &cfgs).await {
        Ok(entry) => {
            tracing::debug!(slug = %entry.slug, "bandcamp-entry.done");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "bandcamp-entry.failed");
            print_failure(&e);
            ExitCode::FAILURE
        }
    }
}

#[tracing::instrument(skip_all, fields(url = %args.url))]
async fn run(args: &Args, cfgs: &AppConfig) -> Result<Entry, TracedError<EntryError>> {
    // validated before any request goes out
    let url = config::parse_bandcamp_url(&args.url).in_current_span()?;

    let client = BandcampClient::new(&cfgs.http).in_current_span()?;
    let assets = AssetClient::new(&cfgs.http).in_current_span()?;
    let importer = Importer::new(
        EntrySink::new(&args.content_dir),
        assets,
        Arc::new(TracingReporter)
    );

    importer.import_bandcamp(&client, &url).await.in_current_span()
}
