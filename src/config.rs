//! Runtime configuration read from the environment.
//!
//! Unset variables fall back to logged defaults; a variable that is set but
//! does not parse is an error rather than a silent default.

use anyhow::{Context, Result, bail};
use std::{env, fmt::Display, path::PathBuf, str::FromStr, time::Duration};
use tracing::info;

pub const API_BASE_URL_VAR: &str = "PREP_API_BASE_URL";
pub const STATE_DIR_VAR: &str = "PREP_STATE_DIR";
pub const HTTP_TIMEOUT_VAR: &str = "PREP_HTTP_TIMEOUT_SECS";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const STATE_DIR_NAME: &str = ".interview-catalog";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub api_base_url: String,
    /// Directory holding the persisted `auth_token`.
    pub state_dir: PathBuf,
    pub http_timeout: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url: String =
            try_load(&lookup, API_BASE_URL_VAR, DEFAULT_API_BASE_URL.to_string())?;
        let api_base_url = normalize_base_url(&api_base_url)?;

        let state_dir = match lookup(STATE_DIR_VAR).filter(|v| !v.trim().is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => {
                let dir = default_state_dir(lookup("HOME"));
                info!("{STATE_DIR_VAR} not set, using default: {}", dir.display());
                dir
            }
        };

        let timeout_secs: u64 = try_load(&lookup, HTTP_TIMEOUT_VAR, DEFAULT_HTTP_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            bail!("{HTTP_TIMEOUT_VAR} must be at least 1 second");
        }

        Ok(Self {
            api_base_url,
            state_dir,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Apply command-line overrides on top of the environment.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<&str>,
        state_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(url) = api_base_url {
            self.api_base_url = normalize_base_url(url)?;
        }
        if let Some(dir) = state_dir {
            self.state_dir = dir;
        }
        Ok(self)
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key).filter(|v| !v.trim().is_empty()) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid {key} value {raw:?}")),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        bail!("API base URL must start with http:// or https://, got {raw:?}");
    }
    Ok(trimmed.to_string())
}

fn default_state_dir(home: Option<String>) -> PathBuf {
    match home.filter(|h| !h.is_empty()) {
        Some(home) => PathBuf::from(home).join(STATE_DIR_NAME),
        None => env::temp_dir().join(STATE_DIR_NAME),
    }
}
