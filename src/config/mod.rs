use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: ListenConfig,
    pub lyrics: LyricsConfig,
    pub display: DisplayConfig,
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListenConfig {
    /// Give up after roughly this many seconds of listening.
    pub timeout_secs: u32,
    /// Length of the first samples; later attempts listen longer.
    pub sample_secs: u32,
    /// Amplification applied to the raw samples.
    pub gain: i32,
    /// Recorder argv writing raw s16le mono 44.1 kHz PCM to stdout.
    /// `{seconds}` is replaced with the sample length.
    pub recorder: Vec<String>,
    /// Recognizer argv; the WAV path is appended. Must print Shazam JSON.
    pub recognizer: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LyricsConfig {
    pub enabled: bool,
    /// Genius credential file (defaults to `~/genius.api`).
    pub credentials: Option<PathBuf>,
    /// Class prefix of the lyrics containers on a song page.
    pub container_class_prefix: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Cover art width in columns; it is half as many rows tall.
    pub cover_width: u16,
    /// Open lyrics in a scrollable full-screen view.
    pub pager: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 20,
            sample_secs: 2,
            gain: 2,
            recorder: [
                "arecord", "-q", "-t", "raw", "-f", "S16_LE", "-r", "44100", "-c", "1", "-d",
                "{seconds}",
            ]
            .map(String::from)
            .to_vec(),
            recognizer: ["songrec", "audio-file-to-recognized-song"]
                .map(String::from)
                .to_vec(),
        }
    }
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            credentials: None,
            container_class_prefix: crate::lyrics::extract::DEFAULT_CONTAINER_PREFIX.to_string(),
            request_timeout_secs: 15,
        }
    }
}

impl LyricsConfig {
    pub fn credentials_path(&self) -> anyhow::Result<PathBuf> {
        match &self.credentials {
            Some(p) => Ok(p.clone()),
            None => crate::lyrics::credentials::default_path(),
        }
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            cover_width: 20,
            pager: false,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let proj = ProjectDirs::from("dev", "sngfetch", "sngfetch");
        let data_dir = proj
            .as_ref()
            .map(|p| p.data_dir().to_path_buf())
            .unwrap_or_else(|| std::env::temp_dir().join("sngfetch"));
        Self { data_dir }
    }
}

impl PathsConfig {
    pub fn history_db(&self) -> PathBuf {
        self.data_dir.join("history.sqlite3")
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    let proj =
        ProjectDirs::from("dev", "sngfetch", "sngfetch").context("ProjectDirs unavailable")?;
    Ok(proj.config_dir().join("config.toml"))
}

fn write_private(path: &Path, raw: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
    }
    fs::write(path, raw).with_context(|| format!("write {}", path.display()))?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    Ok(())
}

pub fn load(override_path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match override_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if !path.exists() {
        let cfg = Config::default();
        let raw = toml::to_string_pretty(&cfg).context("serialize default config")?;
        write_private(&path, &raw)?;
        return Ok(cfg);
    }

    let raw = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let cfg = toml::from_str::<Config>(&raw).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
