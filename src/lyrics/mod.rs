//! Lyrics lookup and extraction
//!
//! This module provides:
//! - Genius API client for resolving a song to its lyrics page
//! - the block locator and line classifier that turn page HTML into lyrics
//! - tolerant title matching between data sources

pub mod credentials;
pub mod extract;
pub mod genius;
pub mod scan;
pub mod title_match;

pub use extract::Extractor;
pub use genius::{GeniusClient, SearchHit};

use crate::storage::Storage;
use tracing::{debug, info};

/// Lyrics resolved for a song.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundLyrics {
    pub url: String,
    pub title: String,
    /// Empty when the page had no usable lyrics block.
    pub text: String,
}

/// First hit whose title matches the requested one.
pub fn pick_hit<'a>(hits: &'a [SearchHit], title: &str) -> Option<&'a SearchHit> {
    hits.iter()
        .find(|hit| title_match::titles_match(title, &hit.title))
}

/// Search Genius for a song and scrape its lyrics.
///
/// `Ok(None)` means no search hit matched the title.
pub async fn fetch_lyrics(
    client: &GeniusClient,
    extractor: &Extractor,
    cache: Option<&Storage>,
    title: &str,
    artist: Option<&str>,
) -> anyhow::Result<Option<FoundLyrics>> {
    let query = genius::search_query(title, artist);
    let hits = client.search(&query).await?;

    let Some(hit) = pick_hit(&hits, title) else {
        info!(%query, candidates = hits.len(), "no Genius hit matched the title");
        return Ok(None);
    };

    if let Some(cached) = cache.map(|c| c.get_lyrics(&hit.url)).transpose()?.flatten() {
        debug!(url = %hit.url, "lyrics cache hit");
        return Ok(Some(FoundLyrics {
            url: hit.url.clone(),
            title: hit.title.clone(),
            text: cached,
        }));
    }

    let text = fetch_from_url(client.http(), extractor, &hit.url).await?;
    if let Some(cache) = cache
        && !text.is_empty()
    {
        cache.cache_lyrics(&hit.url, &text, crate::storage::now_unix())?;
    }

    Ok(Some(FoundLyrics {
        url: hit.url.clone(),
        title: hit.title.clone(),
        text,
    }))
}

/// Scrape lyrics from a known page URL.
pub async fn fetch_from_url(
    http: &reqwest::Client,
    extractor: &Extractor,
    url: &str,
) -> anyhow::Result<String> {
    let html = genius::fetch_page(http, url).await?;
    Ok(extractor.extract(&html))
}
