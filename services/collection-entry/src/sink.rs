use std::{fs, io::Write, path::{Path, PathBuf}};

use crate::errors::EntryError;
use crate::types::Slug;

pub const INDEX_FILE: &str = "index.md";

/// Cover file extension, sniffed from the image url
pub fn cover_extension(url: &str) -> &'static str {
    if url.contains(".png") { "png" } else { "jpg" }
}

/// Writes collection entries under a content root, one directory per slug
pub struct EntrySink {
    root: PathBuf
}

impl EntrySink {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }

    /// Creates `<root>/<slug>`, an existing directory is reused
    pub fn entry_dir(&self, slug: &Slug) -> Result<PathBuf, EntryError> {
        let dir = self.root.join(Self::sanitize_key(slug.as_str()));
        fs::create_dir_all(&dir).map_err(|e| EntryError::Io(
            std::io::Error::new(e.kind(), format!("create dir {}: {e}", dir.display()))
        ))?;
        Ok(dir)
    }

    /// Replaces index.md atomically, a killed run leaves the old file intact
    pub fn write_index(&self, dir: &Path, contents: &str) -> Result<PathBuf, EntryError> {
        let path = dir.join(INDEX_FILE);
        Self::persist(dir, &path, contents.as_bytes())?;
        Ok(path)
    }

    pub fn write_cover(&self, dir: &Path, cover_url: &str, bytes: &[u8]) ->
        Result<PathBuf, EntryError> {

        let path = dir.join(format!("cover.{}", cover_extension(cover_url)));
        Self::persist(dir, &path, bytes)?;
        Ok(path)
    }

    fn persist(dir: &Path, path: &Path, bytes: &[u8]) -> Result<(), EntryError> {
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(bytes)?;
        temp.flush()?;

        temp.persist(path).map_err(|e| EntryError::Io(
            std::io::Error::new(e.error.kind(), format!("persist {}: {}", path.display(), e.error))
        ))?;
        Ok(())
    }

    /// Slugs are already path safe, this only guards against separators
    /// and dot segments sneaking in
    fn sanitize_key(key: &str) -> String {
        let cleaned: String = key.chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        match cleaned.as_str() {
            "" | "." | ".." => "_".to_string(),
            _ => cleaned,
        }
    }
}
