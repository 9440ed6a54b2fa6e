//! Shazam recognition response
//!
//! The recognizer prints Shazam's `discovery/v5` JSON. Only the fields shown
//! on the card are decoded; everything is optional because the payload
//! varies between tracks.

use super::models::Song;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecognizeResponse {
    pub matches: Vec<serde_json::Value>,
    pub track: Option<ShazamTrack>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShazamTrack {
    pub title: Option<String>,
    /// Artist credit line, e.g. "Queen & David Bowie".
    pub subtitle: Option<String>,
    pub url: Option<String>,
    pub isrc: Option<String>,
    pub images: Images,
    pub hub: Hub,
    pub genres: Genres,
    pub sections: Vec<Section>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Images {
    pub coverart: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Hub {
    /// Sent as a bool or as the string "True".
    pub explicit: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Genres {
    pub primary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Section {
    pub metadata: Vec<MetadataItem>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MetadataItem {
    pub title: Option<String>,
    pub text: Option<String>,
}

impl RecognizeResponse {
    pub fn is_match(&self) -> bool {
        !self.matches.is_empty() && self.track.is_some()
    }

    pub fn into_song(self) -> Option<Song> {
        if !self.is_match() {
            return None;
        }
        self.track.map(ShazamTrack::into_song)
    }
}

impl ShazamTrack {
    /// Album, label and release date rows, looked up by title and falling
    /// back to their usual position.
    fn metadata(&self, title: &str, position: usize) -> Option<String> {
        let items = &self.sections.first()?.metadata;
        items
            .iter()
            .find(|m| m.title.as_deref() == Some(title))
            .or_else(|| items.get(position))
            .and_then(|m| m.text.clone())
            .filter(|t| !t.trim().is_empty())
    }

    fn explicit(&self) -> bool {
        match &self.hub.explicit {
            Some(serde_json::Value::Bool(b)) => *b,
            Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }

    pub fn into_song(self) -> Song {
        Song {
            album: self.metadata("Album", 0),
            label: self.metadata("Label", 1),
            release_date: self.metadata("Released", 2),
            explicit: self.explicit(),
            artists: self.subtitle.as_deref().map(split_artists).unwrap_or_default(),
            title: self.title.unwrap_or_else(|| "Unknown".to_string()),
            cover_url: self.images.coverart,
            genre: self.genres.primary,
            link: self.url,
            isrc: self.isrc,
            ..Song::default()
        }
    }
}

/// "A & B feat. C" -> ["A", "B", "C"]
pub fn split_artists(credit: &str) -> Vec<String> {
    credit
        .replace(" feat. ", ",")
        .replace(" ft. ", ",")
        .replace(" & ", ",")
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(String::from)
        .collect()
}
