//! Deezer API client
//!
//! Fills in what the recognizer doesn't know (duration, BPM, gain, rank,
//! full contributor list) and usually has a better cover.
//! API Documentation: https://developers.deezer.com/api

use super::models::Song;
use anyhow::Context;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeezerTrack {
    pub title: Option<String>,
    pub duration: Option<u32>,
    pub link: Option<String>,
    pub bpm: Option<f64>,
    pub gain: Option<f64>,
    pub explicit_lyrics: Option<bool>,
    pub rank: Option<u64>,
    pub contributors: Vec<Named>,
    pub artist: Option<Named>,
    pub album: Option<DeezerAlbum>,
    /// Present instead of the track when the lookup failed.
    pub error: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Named {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeezerAlbum {
    pub title: Option<String>,
    pub cover: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DeezerSearch {
    data: Vec<DeezerTrack>,
    total: u64,
}

#[derive(Debug, Clone)]
pub struct DeezerClient {
    client: reqwest::Client,
    base_url: String,
}

impl DeezerClient {
    const DEFAULT_BASE_URL: &'static str = "https://api.deezer.com";

    pub fn new(timeout: std::time::Duration) -> anyhow::Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .context("build reqwest client")?,
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Point the client at another API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn isrc_url(&self, isrc: &str) -> String {
        format!("{}/track/isrc:{}", self.base_url, urlencoding::encode(isrc))
    }

    fn search_url(&self, artist: &str, title: &str) -> String {
        let query = format!("artist:\"{artist}\" track:\"{title}\"");
        format!("{}/search?q={}", self.base_url, urlencoding::encode(&query))
    }

    pub async fn track_by_isrc(&self, isrc: &str) -> anyhow::Result<Option<DeezerTrack>> {
        let track: DeezerTrack = self.get_json(&self.isrc_url(isrc)).await?;
        if track.error.is_some() {
            debug!(isrc, "Deezer has no track for ISRC");
            return Ok(None);
        }
        Ok(Some(track))
    }

    pub async fn search(&self, artist: &str, title: &str) -> anyhow::Result<Option<DeezerTrack>> {
        let results: DeezerSearch = self.get_json(&self.search_url(artist, title)).await?;
        if results.total == 0 {
            debug!(artist, title, "Deezer search returned nothing");
            return Ok(None);
        }
        Ok(pick_search_hit(results.data, artist))
    }

    /// Merge Deezer data into `song`. Returns whether anything was found.
    pub async fn enrich(&self, song: &mut Song) -> anyhow::Result<bool> {
        let mut track = match song.isrc.as_deref() {
            Some(isrc) => self.track_by_isrc(isrc).await?,
            None => None,
        };
        if track.is_none()
            && let Some(artist) = song.primary_artist()
        {
            track = self.search(artist, &song.title).await?;
        }

        match track {
            Some(track) => {
                apply(song, &track);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> anyhow::Result<T> {
        debug!(%url, "Deezer request");
        self.client
            .get(url)
            .send()
            .await
            .context("send deezer request")?
            .error_for_status()
            .context("deezer http status")?
            .json()
            .await
            .context("parse deezer json")
    }
}

/// The hit credited to `artist`, if any.
fn pick_search_hit(hits: Vec<DeezerTrack>, artist: &str) -> Option<DeezerTrack> {
    let artist = artist.trim();
    hits.into_iter().find(|t| {
        t.artist
            .as_ref()
            .is_some_and(|a| a.name.contains(artist))
    })
}

/// Deezer's values win wherever it has one.
pub fn apply(song: &mut Song, track: &DeezerTrack) {
    if !track.contributors.is_empty() {
        song.artists = track.contributors.iter().map(|c| c.name.clone()).collect();
    } else if let Some(artist) = &track.artist {
        song.artists = vec![artist.name.clone()];
    }
    if let Some(album) = &track.album {
        if album.cover.is_some() {
            song.cover_url = album.cover.clone();
        }
        if album.title.is_some() {
            song.album = album.title.clone();
        }
    }
    if track.duration.is_some() {
        song.duration_seconds = track.duration;
    }
    if track.link.is_some() {
        song.link = track.link.clone();
    }
    song.bpm = track.bpm.filter(|v| *v != 0.0);
    song.gain = track.gain.filter(|v| *v != 0.0);
    if let Some(explicit) = track.explicit_lyrics {
        song.explicit = explicit;
    }
    song.popularity = track.rank.filter(|r| *r > 0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_urls_use_base_url() {
        let client = DeezerClient::new(std::time::Duration::from_secs(1))
            .unwrap()
            .with_base_url("http://localhost:9000/");
        assert_eq!(
            client.isrc_url("GBBKS1500214"),
            "http://localhost:9000/track/isrc:GBBKS1500214"
        );
        assert_eq!(
            client.search_url("Adele", "Hello"),
            "http://localhost:9000/search?q=artist%3A%22Adele%22%20track%3A%22Hello%22"
        );
    }

    fn track(v: serde_json::Value) -> DeezerTrack {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_apply_overrides() {
        let mut song = Song {
            title: "Under Pressure".into(),
            artists: vec!["Queen".into()],
            album: Some("Shazam Album".into()),
            link: Some("https://shazam".into()),
            explicit: true,
            ..Song::default()
        };
        let t = track(json!({
            "id": 1,
            "title": "Under Pressure",
            "duration": 248,
            "link": "https://www.deezer.com/track/1",
            "bpm": 0,
            "gain": -9.2,
            "explicit_lyrics": false,
            "rank": 812345,
            "contributors": [{"name": "Queen"}, {"name": "David Bowie"}],
            "artist": {"name": "Queen"},
            "album": {"title": "Hot Space", "cover": "https://cdn/cover.jpg"}
        }));
        apply(&mut song, &t);
        assert_eq!(song.artists, vec!["Queen", "David Bowie"]);
        assert_eq!(song.album.as_deref(), Some("Hot Space"));
        assert_eq!(song.cover_url.as_deref(), Some("https://cdn/cover.jpg"));
        assert_eq!(song.duration_display().as_deref(), Some("4:08"));
        assert_eq!(song.link.as_deref(), Some("https://www.deezer.com/track/1"));
        assert_eq!(song.bpm, None);
        assert_eq!(song.gain, Some(-9.2));
        assert!(!song.explicit);
        assert_eq!(song.popularity, Some(812345));
    }

    #[test]
    fn test_apply_falls_back_to_artist() {
        let mut song = Song::default();
        apply(&mut song, &track(json!({"artist": {"name": "Solo"}})));
        assert_eq!(song.artists, vec!["Solo"]);
    }

    #[test]
    fn test_error_payload_decodes() {
        let t = track(json!({"error": {"type": "DataException", "message": "no data", "code": 800}}));
        assert!(t.error.is_some());
    }

    #[test]
    fn test_pick_search_hit_by_artist() {
        let hits = vec![
            track(json!({"title": "Hello", "artist": {"name": "Lionel Richie"}})),
            track(json!({"title": "Hello", "artist": {"name": "Adele"}})),
        ];
        let hit = pick_search_hit(hits.clone(), "Adele").unwrap();
        assert_eq!(hit.artist.unwrap().name, "Adele");
        assert!(pick_search_hit(hits, "Nobody").is_none());
    }
}
