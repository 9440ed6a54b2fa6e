use serde::{Deserialize, Serialize};

/// Everything known about an identified song.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Song {
    pub title: String,
    pub artists: Vec<String>,
    pub album: Option<String>,
    pub label: Option<String>,
    pub genre: Option<String>,
    pub release_date: Option<String>,
    pub duration_seconds: Option<u32>,
    /// Deezer rank.
    pub popularity: Option<u64>,
    pub explicit: bool,
    pub isrc: Option<String>,
    pub bpm: Option<f64>,
    pub gain: Option<f64>,
    pub link: Option<String>,
    pub cover_url: Option<String>,
}

impl Song {
    pub fn primary_artist(&self) -> Option<&str> {
        self.artists.first().map(String::as_str)
    }

    pub fn artists_display(&self) -> String {
        if self.artists.is_empty() {
            "Unknown".to_string()
        } else {
            self.artists.join(", ")
        }
    }

    /// `m:ss`
    pub fn duration_display(&self) -> Option<String> {
        self.duration_seconds
            .map(|d| format!("{}:{:02}", d / 60, d % 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_display() {
        let mut song = Song::default();
        assert_eq!(song.duration_display(), None);
        song.duration_seconds = Some(245);
        assert_eq!(song.duration_display().as_deref(), Some("4:05"));
        song.duration_seconds = Some(59);
        assert_eq!(song.duration_display().as_deref(), Some("0:59"));
    }

    #[test]
    fn test_artists() {
        let mut song = Song::default();
        assert_eq!(song.artists_display(), "Unknown");
        assert_eq!(song.primary_artist(), None);
        song.artists = vec!["Queen".into(), "David Bowie".into()];
        assert_eq!(song.artists_display(), "Queen, David Bowie");
        assert_eq!(song.primary_artist(), Some("Queen"));
    }
}
