use regex::Regex;
use once_cell::sync::Lazy;
use url::Url;
use std::time;
use crate::errors::EntryError;

/// Constants for HTTP Config
pub const HTTP_TIMEOUT: u64 = 15000;
pub const HTTP_CONNECT_TIMEOUT: u64 = 5000;
pub const HTTP_MAX_REDIRECTS: u8 = 8;

pub const DISCOGS_BASE_URL: &str = "https://api.discogs.com/";
pub const DISCOGS_AUTH_RATE: u32 = 60;
pub const DISCOGS_ANON_RATE: u32 = 25;

pub const DEFAULT_CONTENT_DIR: &str = "content/collection";

static RELEASE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"/release/(\d+)").unwrap());

/// Wrapper over env::var that treats blank values as unset
fn env_opt(s: &str) -> Option<String> {
    match std::env::var(s) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

/// Ensures that url is https
fn ensure_https(url: &Url) -> Result<(), String> {
    if url.scheme() == "https" {
        Ok(())
    } else {
        Err(format!("URL must be https: {url}"))
    }
}

fn ensure_host(url: &Url, expected_host: &str) -> Result<(), String> {
    match url.host_str() {
        Some(h) if h.eq_ignore_ascii_case(expected_host) => Ok(()),
        Some(h) => Err(
            format!("Unexpected host for {url} (got {h}, expected {expected_host})")
        ),
        None => Err(format!("URL missing host: {url}"))
    }
}

/// Host must be `domain` itself or one of its subdomains
fn ensure_domain(url: &Url, domain: &str) -> Result<(), String> {
    let host = url.host_str()
        .ok_or_else(|| format!("URL missing host: {url}"))?
        .to_ascii_lowercase();
    if host == domain || host.ends_with(&format!(".{domain}")) {
        Ok(())
    } else {
        Err(format!("URL must be a {domain} page (got {host})"))
    }
}

fn ensure_web_scheme(url: &Url) -> Result<(), String> {
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme {other}: {url}"))
    }
}

/// Validates a Bandcamp album url before any request is made
pub fn parse_bandcamp_url(raw: &str) -> Result<Url, EntryError> {
    let url = Url::parse(raw.trim())?;
    ensure_web_scheme(&url).map_err(EntryError::InvalidUrl)?;
    ensure_domain(&url, "bandcamp.com").map_err(EntryError::InvalidUrl)?;
    Ok(url)
}

/// Validates a Discogs release url and pulls out the numeric release id
pub fn parse_discogs_url(raw: &str) -> Result<(Url, u64), EntryError> {
    let url = Url::parse(raw.trim())?;
    ensure_web_scheme(&url).map_err(EntryError::InvalidUrl)?;
    ensure_domain(&url, "discogs.com").map_err(EntryError::InvalidUrl)?;

    let id = RELEASE_ID.captures(url.path())
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u64>().ok())
        .ok_or_else(|| EntryError::InvalidUrl(
            format!("could not extract release id from {url}")
        ))?;
    Ok( (url, id) )
}

///
/// Configuration for Http timeouts, identity, etc.
///
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub timeout: time::Duration,
    pub connect_timeout: time::Duration,
    pub max_redirects: u8,
    pub user_agent: String
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: time::Duration::from_millis(HTTP_TIMEOUT),
            connect_timeout: time::Duration::from_millis(HTTP_CONNECT_TIMEOUT),
            max_redirects: HTTP_MAX_REDIRECTS,
            user_agent: format!("collection-entry/{}", env!("CARGO_PKG_VERSION"))
        }
    }
}

fn build_http() -> HttpConfig {
    let mut http = HttpConfig::default();
    if let Some(agent) = env_opt("COLLECTION_USER_AGENT") {
        http.user_agent = agent;
    }
    http
}

///
/// Configuration for the discogs api. The token is optional, without it
/// the api still answers but at a lower rate limit
///
#[derive(Debug, Clone)]
pub struct DiscogsConfig {
    pub base_url: Url,
    pub token: Option<String>
}

impl DiscogsConfig {
    pub fn authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Requests per minute the api grants in the current mode
    pub fn rate_limit(&self) -> u32 {
        if self.authenticated() { DISCOGS_AUTH_RATE } else { DISCOGS_ANON_RATE }
    }
}

fn build_discogs() -> Result<DiscogsConfig, EntryError> {
    let base_url = env_opt("DISCOGS_BASE_URL")
        .unwrap_or_else(|| DISCOGS_BASE_URL.to_string());

    let mut base_url = Url::parse(&base_url)
        .map_err(|e| EntryError::Config(
            format!("DISCOGS_BASE_URL invalid {e}")
        ))?;

    ensure_https(&base_url).map_err(EntryError::Config)?;
    ensure_host(&base_url, "api.discogs.com").map_err(EntryError::Config)?;

    // ensure trailing slash
    if !base_url.path().ends_with('/') {
        let mut path = base_url.path().to_string();
        path.push('/');
        base_url.set_path(&path);
    }

    let token = env_opt("DISCOGS_TOKEN");
    Ok( DiscogsConfig { base_url, token } )
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json
}

impl LogFormat {
    pub fn parse(s: &str) -> Option<LogFormat> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Some(LogFormat::Pretty),
            "json"   => Some(LogFormat::Json),
            _ => None
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_file_line: bool,
    pub include_target: bool
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "info,collection_entry=debug,reqwest=warn,html5ever=error"
                .to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
            include_file_line: false,
            include_target: false
        }
    }
}

fn build_logging() -> LoggingConfig {
    let mut logging = LoggingConfig::default();
    if let Some(format) = env_opt("LOG_FORMAT").as_deref().and_then(LogFormat::parse) {
        logging.format = format;
    }
    if logging.format == LogFormat::Json {
        logging.with_ansi = false;
        logging.include_target = true;
        logging.include_file_line = true;
    }
    logging
}

///
/// AppConfig which holds everything the importers need at program start
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub discogs: DiscogsConfig,
    pub logging: LoggingConfig
}

///
/// Return all environment variables to caller at program start.
///
pub fn load_config() -> Result<AppConfig, EntryError> {
    dotenvy::dotenv().ok();

    let http    = build_http();
    let discogs = build_discogs()?;
    let logging = build_logging();

    Ok( AppConfig { http, discogs, logging } )
}
