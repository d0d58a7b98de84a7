//! Runtime configuration.
//!
//! Everything is read from `STUDYSYNC_*` environment variables. `main` loads
//! a `.env` file first, so local overrides can live there.

use std::env;
use std::net::SocketAddr;
use url::Url;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_BACKEND_PORT: u16 = 5000;
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;
pub const DEFAULT_MAX_UPLOAD_MB: usize = 10;
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid socket address: {value}")]
    InvalidAddr { var: &'static str, value: String },
    #[error("{var} is not a valid number: {value}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: SocketAddr,
    /// Fixed backend base URL. When unset the backend host follows the
    /// host the page was served from.
    pub backend_url: Option<Url>,
    pub backend_port: u16,
    pub session_ttl_minutes: i64,
    /// Live sessions kept at once. The least recently seen goes first.
    pub max_sessions: usize,
    pub max_upload_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            backend_url: None,
            backend_port: DEFAULT_BACKEND_PORT,
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
            max_sessions: DEFAULT_MAX_SESSIONS,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_MB * 1024 * 1024,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_raw = get("STUDYSYNC_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidAddr {
                var: "STUDYSYNC_BIND",
                value: bind_raw.clone(),
            })?;

        let backend_url = match get("STUDYSYNC_BACKEND_URL") {
            Some(raw) => Some(Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
                var: "STUDYSYNC_BACKEND_URL",
                source,
            })?),
            None => None,
        };

        let backend_port = parse_number(get("STUDYSYNC_BACKEND_PORT"), "STUDYSYNC_BACKEND_PORT")?
            .unwrap_or(DEFAULT_BACKEND_PORT);
        let session_ttl_minutes = parse_number(
            get("STUDYSYNC_SESSION_TTL_MINUTES"),
            "STUDYSYNC_SESSION_TTL_MINUTES",
        )?
        .unwrap_or(DEFAULT_SESSION_TTL_MINUTES);
        let max_sessions = parse_number(get("STUDYSYNC_MAX_SESSIONS"), "STUDYSYNC_MAX_SESSIONS")?
            .unwrap_or(DEFAULT_MAX_SESSIONS);
        let max_upload_mb: usize = parse_number(get("STUDYSYNC_MAX_UPLOAD_MB"), "STUDYSYNC_MAX_UPLOAD_MB")?
            .unwrap_or(DEFAULT_MAX_UPLOAD_MB);

        Ok(Self {
            bind,
            backend_url,
            backend_port,
            session_ttl_minutes,
            max_sessions,
            max_upload_bytes: max_upload_mb.saturating_mul(1024 * 1024),
        })
    }
}

fn parse_number<T: std::str::FromStr>(
    raw: Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber { var, value }),
        None => Ok(None),
    }
}
