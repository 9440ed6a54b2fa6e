use crate::config::Config;
use crate::listen;
use crate::lyrics::{self, credentials, genius, Extractor, GeniusClient};
use crate::song::{deezer::DeezerClient, Song};
use crate::storage::{self, HistoryEntry, Storage};
use crate::tui::{self, CoverArt};
use anyhow::Context;
use time::{macros::format_description, OffsetDateTime};
use tracing::{debug, warn};

pub struct App {
    cfg: Config,
    storage: Storage,
    deezer: DeezerClient,
    http: reqwest::Client,
    extractor: Extractor,
}

impl App {
    pub fn new(cfg: Config) -> anyhow::Result<Self> {
        let storage = Storage::open(&cfg.paths.history_db())?;
        let timeout = cfg.lyrics.request_timeout();
        let deezer = DeezerClient::new(timeout)?;
        let http = genius::http_client(timeout)?;
        let extractor = Extractor::new(cfg.lyrics.container_class_prefix.clone());

        Ok(Self {
            cfg,
            storage,
            deezer,
            http,
            extractor,
        })
    }

    fn genius(&self) -> anyhow::Result<GeniusClient> {
        let path = self.cfg.lyrics.credentials_path()?;
        let creds = credentials::load(&path)?;
        Ok(GeniusClient::new(creds, self.http.clone()))
    }

    /// Identify what's playing, show it, then its lyrics.
    pub async fn listen(&self, no_lyrics: bool, pager: bool) -> anyhow::Result<()> {
        let mut song = listen::identify(&self.cfg.listen).await?;

        match self.deezer.enrich(&mut song).await {
            Ok(found) => debug!(found, "deezer enrichment"),
            Err(e) => warn!(error = %e, "deezer enrichment failed"),
        }

        let cover = self.cover(&song).await;
        tui::print_card(&song, cover.as_ref())?;

        let mut lyrics_url = None;
        if self.cfg.lyrics.enabled && !no_lyrics {
            match self.find_lyrics(&song.title, song.primary_artist()).await {
                Ok(Some(found)) if !found.text.is_empty() => {
                    self.show_lyrics(&found.title, &found.text, pager)?;
                    lyrics_url = Some(found.url);
                }
                Ok(_) => println!("Lyrics unavailable."),
                Err(e) => eprintln!("{e:#}"),
            }
        }

        self.storage
            .add_to_history(&song, lyrics_url.as_deref(), storage::now_unix())?;
        Ok(())
    }

    /// Search lyrics by title without listening.
    pub async fn lyrics(&self, title: &str, artist: Option<&str>, pager: bool) -> anyhow::Result<()> {
        match self.find_lyrics(title, artist).await? {
            Some(found) if !found.text.is_empty() => {
                println!("{}\n", found.url);
                self.show_lyrics(&found.title, &found.text, pager)
            }
            _ => anyhow::bail!("Unable to fetch lyrics for '{title}'."),
        }
    }

    /// Extract lyrics from one song page.
    pub async fn url(&self, url: &str) -> anyhow::Result<()> {
        let text = lyrics::fetch_from_url(&self.http, &self.extractor, url).await?;
        if text.is_empty() {
            anyhow::bail!("No lyrics found at {url}");
        }
        println!("{text}");
        Ok(())
    }

    pub fn history(&self, limit: usize) -> anyhow::Result<()> {
        let entries = self.storage.get_history(limit)?;
        if entries.is_empty() {
            println!("No songs identified yet.");
            return Ok(());
        }
        for (i, entry) in entries.iter().enumerate() {
            println!("{:02}. {}", i + 1, history_line(entry));
        }
        Ok(())
    }

    pub fn clear_history(&self) -> anyhow::Result<()> {
        let removed = self.storage.clear_history()?;
        println!("Cleared {removed} history entries.");
        Ok(())
    }

    async fn find_lyrics(
        &self,
        title: &str,
        artist: Option<&str>,
    ) -> anyhow::Result<Option<lyrics::FoundLyrics>> {
        let genius = self.genius()?;
        lyrics::fetch_lyrics(&genius, &self.extractor, Some(&self.storage), title, artist).await
    }

    fn show_lyrics(&self, title: &str, text: &str, pager: bool) -> anyhow::Result<()> {
        if pager || self.cfg.display.pager {
            tui::pager::run(title, text)
        } else {
            println!("{text}");
            Ok(())
        }
    }

    async fn cover(&self, song: &Song) -> Option<CoverArt> {
        let url = song.cover_url.as_deref()?;
        let rows = (self.cfg.display.cover_width / 2).max(1);
        match self.download(url).await {
            Ok(bytes) => tui::cover::render(&bytes, rows)
                .inspect_err(|e| warn!(error = %e, "cover art unreadable"))
                .ok(),
            Err(e) => {
                warn!(error = %e, "cover art download failed");
                None
            }
        }
    }

    async fn download(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await
            .with_context(|| format!("fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("cover status {url}"))?
            .bytes()
            .await
            .context("read cover body")?;
        Ok(bytes.to_vec())
    }
}

fn history_line(entry: &HistoryEntry) -> String {
    let when = OffsetDateTime::from_unix_timestamp(entry.identified_at)
        .ok()
        .and_then(|t| {
            t.format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
                .ok()
        })
        .unwrap_or_default();
    let mut line = format!(
        "{}  {} - {}",
        when,
        entry.song.title,
        entry.song.artists_display()
    );
    if let Some(url) = &entry.lyrics_url {
        line.push_str(&format!("  ({url})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_line() {
        let entry = HistoryEntry {
            song: Song {
                title: "Hello".into(),
                artists: vec!["Adele".into()],
                ..Song::default()
            },
            lyrics_url: Some("https://genius.com/Adele-hello-lyrics".into()),
            identified_at: 1_700_000_000,
        };
        assert_eq!(
            history_line(&entry),
            "2023-11-14 22:13  Hello - Adele  (https://genius.com/Adele-hello-lyrics)"
        );
    }

    #[test]
    fn test_history_line_without_lyrics() {
        let entry = HistoryEntry {
            song: Song {
                title: "Hello".into(),
                ..Song::default()
            },
            lyrics_url: None,
            identified_at: 0,
        };
        assert_eq!(history_line(&entry), "1970-01-01 00:00  Hello - Unknown");
    }
}
