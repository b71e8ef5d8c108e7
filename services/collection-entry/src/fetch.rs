//!
//! src/fetch.rs  Andrew Belles  Oct 16th, 2026
//!
//! Defines the http clients for the two sources and the single-shot
//! request helpers. There are no retries, a failed fetch ends the run
//!

use reqwest::{Client, header, redirect, RequestBuilder};
use url::Url;

use crate::config::{DiscogsConfig, HttpConfig};
use crate::discogs::Release;
use crate::errors::EntryError;

/// Client building functionality
fn client_helper(http: &HttpConfig) -> reqwest::ClientBuilder {
    Client::builder()
        .timeout(http.timeout)
        .connect_timeout(http.connect_timeout)
        .redirect(redirect::Policy::limited(http.max_redirects as usize))
}

fn client_with_headers_and_agent(
    http: &HttpConfig,
    headers: header::HeaderMap,
    user_agent: &str
) -> Result<Client, EntryError> {
    client_helper(http)
        .default_headers(headers)
        .user_agent(user_agent)
        .build()
        .map_err(|e| EntryError::Http(format!("build client: {e}")))
}

/// Sends once and fails on any non-success status
async fn send(request: RequestBuilder) -> Result<reqwest::Response, EntryError> {
    let response = request.send().await?;
    Ok(response.error_for_status()?)
}

#[derive(Clone, Debug)]
pub struct BandcampClient {
    pub http: Client
}

impl BandcampClient {
    pub fn new(http_config: &HttpConfig) -> Result<Self, EntryError> {
        let mut h = header::HeaderMap::new();
        h.insert(header::ACCEPT, header::HeaderValue::from_static("text/html"));
        let http = client_with_headers_and_agent(http_config, h, &http_config.user_agent)?;
        Ok( Self { http } )
    }

    /// GET {album url}
    pub fn album_page(&self, url: &Url) -> RequestBuilder {
        self.http.get(url.clone())
    }

    pub async fn fetch_album_page(&self, url: &Url) -> Result<String, EntryError> {
        let response = send(self.album_page(url)).await?;
        Ok(response.text().await?)
    }
}

#[derive(Clone, Debug)]
pub struct DiscogsClient {
    pub http: Client,
    pub cfg: DiscogsConfig
}

/// Accept header always, Authorization only when a token is configured
fn discogs_headers(dg_cfg: &DiscogsConfig) -> Result<header::HeaderMap, EntryError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/vnd.discogs.v2.discogs+json")
    );
    if let Some(token) = &dg_cfg.token {
        let mut auth = header::HeaderValue::from_str(&format!("Discogs token={token}"))
            .map_err(|e| EntryError::Config(format!("invalid DISCOGS_TOKEN: {e}")))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
    }
    Ok(headers)
}

impl DiscogsClient {
    pub fn new(http_cfg: &HttpConfig, dg_cfg: &DiscogsConfig) -> Result<Self, EntryError> {
        let headers = discogs_headers(dg_cfg)?;
        let http = client_with_headers_and_agent(http_cfg, headers, &http_cfg.user_agent)?;

        Ok( Self { http, cfg: dg_cfg.clone() } )
    }

    /// GET /releases/{id}
    pub fn release(&self, release_id: u64) -> Result<RequestBuilder, EntryError> {
        let url = self.cfg.base_url.join(&format!("releases/{release_id}"))?;
        Ok(self.http.get(url))
    }

    pub async fn fetch_release(&self, release_id: u64) -> Result<Release, EntryError> {
        let response = send(self.release(release_id)?).await?;
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

/// Plain client for cover images, shares timeouts and agent with the rest
#[derive(Clone, Debug)]
pub struct AssetClient {
    pub http: Client
}

impl AssetClient {
    pub fn new(http_config: &HttpConfig) -> Result<Self, EntryError> {
        let http = client_with_headers_and_agent(
            http_config, header::HeaderMap::new(), &http_config.user_agent
        )?;
        Ok( Self { http } )
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, EntryError> {
        let url = Url::parse(url)?;
        let response = send(self.http.get(url)).await?;
        Ok(response.bytes().await?.to_vec())
    }
}
