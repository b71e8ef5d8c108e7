//!
//! src/lib.rs  Andrew Belles  Oct 16th, 2026
//!
//! Collection entry importers. Each binary runs one linear pipeline:
//! source reader -> field extractor -> normalizer -> entry writer
//!

pub mod config;
pub mod errors;
pub mod logging;

pub mod fetch;
pub mod types;
pub mod bandcamp;
pub mod discogs;
pub mod normalize;
pub mod frontmatter;
pub mod sink;
pub mod report;
pub mod importer;

pub use errors::EntryError;
