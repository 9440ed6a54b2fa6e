//! Genius API client
//!
//! Used only to resolve a song to its page URL; the lyrics themselves are
//! scraped from the page HTML.
//! API Documentation: https://docs.genius.com

use super::credentials::GeniusCredentials;
use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::{debug, trace};

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchResponse {
    response: SearchBody,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SearchBody {
    hits: Vec<Hit>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Hit {
    result: SearchHit,
}

/// A song page candidate from the search endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    pub url: String,
    pub title: String,
}

#[derive(Debug)]
pub struct GeniusClient {
    http: reqwest::Client,
    base_url: String,
    credentials: GeniusCredentials,
    token: OnceCell<String>,
}

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.36";

/// Browser-looking client; song pages reject obvious bots.
pub fn http_client(timeout: std::time::Duration) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .context("build reqwest client")
}

/// Raw HTML of a song page.
pub async fn fetch_page(http: &reqwest::Client, url: &str) -> anyhow::Result<String> {
    debug!(%url, "Fetching lyrics page");
    http.get(url)
        .send()
        .await
        .with_context(|| format!("fetch {url}"))?
        .error_for_status()
        .with_context(|| format!("lyrics page status {url}"))?
        .text()
        .await
        .context("read lyrics page body")
}

impl GeniusClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.genius.com";

    pub fn new(credentials: GeniusCredentials, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            credentials,
            token: OnceCell::new(),
        }
    }

    /// Point the client at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    async fn access_token(&self) -> anyhow::Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                match &self.credentials {
                    GeniusCredentials::Token(t) => Ok(t.clone()),
                    GeniusCredentials::Client { id, secret } => self.exchange(id, secret).await,
                }
            })
            .await?;
        Ok(token.as_str())
    }

    /// Client-credentials grant.
    async fn exchange(&self, client_id: &str, client_secret: &str) -> anyhow::Result<String> {
        debug!("Authenticating with Genius API");
        let response = self
            .http
            .post(format!("{}/oauth/token", self.base_url))
            .basic_auth(client_id, Some(client_secret))
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .send()
            .await
            .context("send genius auth request")?;

        if !response.status().is_success() {
            anyhow::bail!(
                "Failed to authenticate with Genius API ({}). Check your credentials, network connection and try again.",
                response.status()
            );
        }

        let body: TokenResponse = response.json().await.context("parse genius auth json")?;
        Ok(body.access_token)
    }

    /// Ranked song page candidates for a free-text query.
    pub async fn search(&self, query: &str) -> anyhow::Result<Vec<SearchHit>> {
        let token = self.access_token().await?;
        let url = self.search_url(query);
        debug!(%url, "Searching Genius");

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .context("send genius search request")?;

        if !response.status().is_success() {
            anyhow::bail!("Genius search error: {}", response.status());
        }

        let body: serde_json::Value = response.json().await.context("parse genius search json")?;
        let hits = parse_hits(body)?;
        trace!(?hits, "search results");
        Ok(hits)
    }

    fn search_url(&self, query: &str) -> String {
        format!("{}/search?q={}", self.base_url, urlencoding::encode(query))
    }
}

fn parse_hits(body: serde_json::Value) -> anyhow::Result<Vec<SearchHit>> {
    let parsed: SearchResponse = serde_json::from_value(body).context("decode genius search")?;
    Ok(parsed
        .response
        .hits
        .into_iter()
        .map(|h| h.result)
        .filter(|r| !r.url.is_empty())
        .collect())
}

/// Query for a title/artist pair, without version suffixes like
/// "- Remastered" or "(Live)".
pub fn search_query(title: &str, artist: Option<&str>) -> String {
    let title = title
        .split('-')
        .next()
        .unwrap_or_default()
        .split('(')
        .next()
        .unwrap_or_default()
        .trim();
    match artist.map(str::trim).filter(|a| !a.is_empty()) {
        Some(artist) => format!("{title} {artist}"),
        None => title.to_string(),
    }
}
