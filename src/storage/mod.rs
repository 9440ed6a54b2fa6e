use crate::song::Song;
use anyhow::Context;
use rusqlite::{params, Connection};
use std::path::Path;

/// One identification from the history table.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub song: Song,
    pub lyrics_url: Option<String>,
    pub identified_at: i64,
}

pub struct Storage {
    conn: Connection,
}

pub fn now_unix() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or_default()
}

impl Storage {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let conn = Connection::open(path).with_context(|| format!("open {}", path.display()))?;
        let s = Self { conn };
        s.init_schema()?;
        Ok(s)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let s = Self {
            conn: Connection::open_in_memory().context("open in-memory db")?,
        };
        s.init_schema()?;
        Ok(s)
    }

    fn init_schema(&self) -> anyhow::Result<()> {
        self.conn
            .execute_batch(
                r#"
CREATE TABLE IF NOT EXISTS history (
  id INTEGER PRIMARY KEY AUTOINCREMENT,
  title TEXT NOT NULL,
  artists_json TEXT NOT NULL,
  album TEXT,
  isrc TEXT,
  link TEXT,
  lyrics_url TEXT,
  song_json TEXT NOT NULL,
  identified_at INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_history_identified_at ON history(identified_at DESC);

CREATE TABLE IF NOT EXISTS lyrics_cache (
  url TEXT PRIMARY KEY,
  lyrics TEXT NOT NULL,
  fetched_at INTEGER NOT NULL
);
"#,
            )
            .context("init schema")?;
        Ok(())
    }

    /// Record an identification.
    pub fn add_to_history(
        &self,
        song: &Song,
        lyrics_url: Option<&str>,
        identified_at: i64,
    ) -> anyhow::Result<()> {
        let artists_json = serde_json::to_string(&song.artists).context("encode artists")?;
        let song_json = serde_json::to_string(song).context("encode song")?;
        self.conn
            .execute(
                r#"
INSERT INTO history(title, artists_json, album, isrc, link, lyrics_url, song_json, identified_at)
VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#,
                params![
                    song.title,
                    artists_json,
                    song.album,
                    song.isrc,
                    song.link,
                    lyrics_url,
                    song_json,
                    identified_at
                ],
            )
            .context("add to history")?;
        Ok(())
    }

    /// Most recent first, one row per song (by ISRC, else title).
    pub fn get_history(&self, limit: usize) -> anyhow::Result<Vec<HistoryEntry>> {
        let mut stmt = self
            .conn
            .prepare(
                r#"
SELECT song_json, lyrics_url, MAX(identified_at) AS last_identified
FROM history
GROUP BY COALESCE(isrc, title)
ORDER BY last_identified DESC
LIMIT ?1
"#,
            )
            .context("prepare history")?;

        let entries = stmt
            .query_map(params![limit as i64], |row| {
                let song_json: String = row.get(0)?;
                let lyrics_url: Option<String> = row.get(1)?;
                let identified_at: i64 = row.get(2)?;
                Ok((song_json, lyrics_url, identified_at))
            })
            .context("query history")?
            .filter_map(|r| r.ok())
            .filter_map(|(song_json, lyrics_url, identified_at)| {
                let song = serde_json::from_str(&song_json).ok()?;
                Some(HistoryEntry {
                    song,
                    lyrics_url,
                    identified_at,
                })
            })
            .collect();

        Ok(entries)
    }

    /// Number of rows removed.
    pub fn clear_history(&self) -> anyhow::Result<usize> {
        self.conn
            .execute("DELETE FROM history", [])
            .context("clear history")
    }

    pub fn cache_lyrics(&self, url: &str, lyrics: &str, now_unix: i64) -> anyhow::Result<()> {
        self.conn
            .execute(
                r#"
INSERT INTO lyrics_cache(url, lyrics, fetched_at)
VALUES(?1, ?2, ?3)
ON CONFLICT(url) DO UPDATE SET
  lyrics=excluded.lyrics,
  fetched_at=excluded.fetched_at
"#,
                params![url, lyrics, now_unix],
            )
            .context("cache lyrics")?;
        Ok(())
    }

    pub fn get_lyrics(&self, url: &str) -> anyhow::Result<Option<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT lyrics FROM lyrics_cache WHERE url=?1")
            .context("prepare lyrics cache")?;
        let mut rows = stmt.query(params![url]).context("query lyrics cache")?;
        if let Some(row) = rows.next().context("read lyrics cache row")? {
            Ok(Some(row.get(0)?))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(title: &str, isrc: Option<&str>) -> Song {
        Song {
            title: title.to_string(),
            artists: vec!["Artist".to_string()],
            isrc: isrc.map(String::from),
            duration_seconds: Some(180),
            ..Song::default()
        }
    }

    #[test]
    fn test_history_most_recent_first_and_unique() {
        let s = Storage::open_in_memory().unwrap();
        s.add_to_history(&song("One", Some("ISRC1")), None, 100).unwrap();
        s.add_to_history(&song("Two", None), Some("https://genius.com/two"), 200)
            .unwrap();
        s.add_to_history(&song("One", Some("ISRC1")), Some("https://genius.com/one"), 300)
            .unwrap();

        let history = s.get_history(10).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].song.title, "One");
        assert_eq!(history[0].identified_at, 300);
        assert_eq!(history[0].lyrics_url.as_deref(), Some("https://genius.com/one"));
        assert_eq!(history[0].song.duration_seconds, Some(180));
        assert_eq!(history[1].song.title, "Two");

        assert_eq!(s.get_history(1).unwrap().len(), 1);
    }

    #[test]
    fn test_clear_history() {
        let s = Storage::open_in_memory().unwrap();
        s.add_to_history(&song("One", None), None, 1).unwrap();
        s.add_to_history(&song("Two", None), None, 2).unwrap();
        assert_eq!(s.clear_history().unwrap(), 2);
        assert!(s.get_history(10).unwrap().is_empty());
    }

    #[test]
    fn test_lyrics_cache_upsert() {
        let s = Storage::open_in_memory().unwrap();
        assert_eq!(s.get_lyrics("u").unwrap(), None);
        s.cache_lyrics("u", "first", 1).unwrap();
        s.cache_lyrics("u", "second", 2).unwrap();
        assert_eq!(s.get_lyrics("u").unwrap().as_deref(), Some("second"));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b").join("history.sqlite3");
        let s = Storage::open(&path).unwrap();
        s.add_to_history(&song("One", None), None, 1).unwrap();
        drop(s);

        let reopened = Storage::open(&path).unwrap();
        assert_eq!(reopened.get_history(5).unwrap().len(), 1);
    }
}
