//!
//! src/errors.rs  Andrew Belles  Oct 16th, 2026
//!
//! Defines enums and methods of error conversion
//! for errors the entry importers use. Only fatal conditions live here,
//! missing album fields never become an error
//!

use thiserror::Error;
use tracing_error::ExtractSpanTrace;

#[derive(Error, Debug)]
pub enum EntryError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("config error: {0}")]
    Config(String),
    #[error("http error: {0}")]
    Http(String),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error)
}

impl From<reqwest::Error> for EntryError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(s) if s == reqwest::StatusCode::NOT_FOUND =>
                EntryError::NotFound(e.to_string()),
            _ => EntryError::Http(e.to_string())
        }
    }
}

impl From<serde_json::Error> for EntryError {
    fn from(e: serde_json::Error) -> Self { EntryError::Parse(e.to_string()) }
}

impl From<url::ParseError> for EntryError {
    fn from(e: url::ParseError) -> Self { EntryError::InvalidUrl(e.to_string()) }
}

/// Prints an error chain to stderr, including any span trace captured by
/// tracing-error along the way
pub fn print_failure(error: &(dyn std::error::Error + 'static)) {
    eprintln!("Error: {error}");

    let mut current = Some(error);
    let mut depth = 0;
    while let Some(err) = current {
        if let Some(trace) = err.span_trace() {
            eprintln!("\nSpan trace:\n{trace}");
        } else if depth > 0 {
            eprintln!("{depth:>4}: {err}");
        }
        current = err.source();
        depth += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let e: EntryError = std::io::Error::new(
            std::io::ErrorKind::PermissionDenied, "denied"
        ).into();
        assert!(matches!(e, EntryError::Io(_)));
        assert_eq!(e.to_string(), "io error: denied");
    }

    #[test]
    fn url_errors_are_invalid_input() {
        let e: EntryError = url::Url::parse("not a url").unwrap_err().into();
        assert!(matches!(e, EntryError::InvalidUrl(_)));
    }
}
