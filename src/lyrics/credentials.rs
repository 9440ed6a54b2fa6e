use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

const CLIENT_ID_KEY: &str = "Client-ID:";
const CLIENT_SECRET_KEY: &str = "Client-Secret:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeniusCredentials {
    /// A ready-to-use API access token.
    Token(String),
    /// API client pair, exchanged for a token on first use.
    Client { id: String, secret: String },
}

/// `~/genius.api`
pub fn default_path() -> anyhow::Result<PathBuf> {
    let base = directories::BaseDirs::new().context("BaseDirs unavailable")?;
    Ok(base.home_dir().join("genius.api"))
}

/// Parse the credential file body. `None` when nothing usable is in it.
pub fn parse(raw: &str) -> Option<GeniusCredentials> {
    let mut id = None;
    let mut secret = None;
    let mut plain = Vec::new();

    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(v) = line.strip_prefix(CLIENT_ID_KEY) {
            id = Some(v.trim().to_string());
        } else if let Some(v) = line.strip_prefix(CLIENT_SECRET_KEY) {
            secret = Some(v.trim().to_string());
        } else {
            plain.push(line);
        }
    }

    match (id, secret) {
        (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
            Some(GeniusCredentials::Client { id, secret })
        }
        (None, None) if plain.len() == 1 => Some(GeniusCredentials::Token(plain[0].to_string())),
        _ => None,
    }
}

/// Read credentials, creating a template file if there is none yet.
pub fn load(path: &Path) -> anyhow::Result<GeniusCredentials> {
    if !path.exists() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create dir {}", parent.display()))?;
        }
        fs::write(path, format!("{CLIENT_ID_KEY}\n{CLIENT_SECRET_KEY}\n"))
            .with_context(|| format!("write {}", path.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
        }
        anyhow::bail!(
            "Missing Genius API credentials: fill in {} (client id and secret, or a single access token line)",
            path.display()
        );
    }

    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse(&raw).with_context(|| format!("Missing Genius API credentials in the file {}", path.display()))
}
