use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_TABLE: &str = "game_ideas";
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Env vars consulted when `--url` / `--key` are not given. The second name
/// lets an existing Next.js `.env.local` be reused as-is.
const URL_FALLBACK_ENV: &str = "NEXT_PUBLIC_SUPABASE_URL";
const KEY_FALLBACK_ENV: &str = "NEXT_PUBLIC_SUPABASE_ANON_KEY";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing Supabase URL; pass --url or set SUPABASE_URL")]
    MissingUrl,

    #[error("missing Supabase anon key; pass --key or set SUPABASE_ANON_KEY")]
    MissingKey,

    #[error("invalid Supabase URL: {0}")]
    InvalidUrl(String),

    #[error("could not open log file: {0}")]
    LogFile(#[from] std::io::Error),
}

/// Connection settings for the ideas table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub url: String,
    pub anon_key: String,
    pub table: String,
    pub timeout: Duration,
}

impl StoreConfig {
    /// Build from CLI values, falling back to the `NEXT_PUBLIC_*` variables.
    pub fn resolve(
        url: Option<String>,
        anon_key: Option<String>,
        table: String,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let url = url.or_else(|| std::env::var(URL_FALLBACK_ENV).ok());
        let anon_key = anon_key.or_else(|| std::env::var(KEY_FALLBACK_ENV).ok());
        Self::new(url, anon_key, table, timeout_secs)
    }

    pub fn new(
        url: Option<String>,
        anon_key: Option<String>,
        table: String,
        timeout_secs: u64,
    ) -> Result<Self, ConfigError> {
        let url = url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .ok_or(ConfigError::MissingUrl)?;
        let parsed =
            reqwest::Url::parse(&url).map_err(|e| ConfigError::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "{url}: scheme must be http or https"
            )));
        }

        let anon_key = anon_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingKey)?;

        let table = if table.trim().is_empty() {
            DEFAULT_TABLE.to_string()
        } else {
            table.trim().to_string()
        };

        Ok(Self {
            url,
            anon_key,
            table,
            timeout: Duration::from_secs(timeout_secs.max(1)),
        })
    }
}

/// Default location of the TUI log file.
pub fn default_log_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "idea-board", "idea-board")
        .map(|dirs| dirs.cache_dir().join("idea-board.log"))
}

/// Load `.env.local` then `.env` from the working directory. Missing files are fine.
pub fn load_dotenv(dir: &Path) {
    for name in [".env.local", ".env"] {
        let path = dir.join(name);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                eprintln!("Warning: could not read {}: {e}", path.display());
            }
        }
    }
}
