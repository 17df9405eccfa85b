use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TIME_ZONE: &str = "UTC";
pub const DEFAULT_SESSION_PATH: &str = ".barbershop-session.json";
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

pub const ENV_API_BASE_URL: &str = "BARBERSHOP_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "BARBERSHOP_TIMEOUT_SECS";
pub const ENV_TIME_ZONE: &str = "BARBERSHOP_TIMEZONE";
pub const ENV_SESSION_PATH: &str = "BARBERSHOP_SESSION_PATH";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("invalid time zone: {0}")]
    InvalidTimeZone(String),
    #[error("invalid request timeout: {0}")]
    InvalidTimeout(String),
}

/// Optional overrides read from `config.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    pub api_base_url: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub time_zone: Option<String>,
    pub session_path: Option<PathBuf>,
}

impl FileConfig {
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub time_zone: Tz,
    pub session_path: PathBuf,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            time_zone: Tz::UTC,
            session_path: PathBuf::from(DEFAULT_SESSION_PATH),
        }
    }
}

impl RuntimeConfig {
    /// Loads `.env`, then the given config file (or `config.json` when it
    /// exists), then the process environment. Later sources win.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match config_path {
            Some(path) => Some(FileConfig::read(path)?),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Some(FileConfig::read(default_path)?)
                } else {
                    None
                }
            }
        };

        Self::from_sources(file, |key| env::var(key).ok())
    }

    pub fn from_sources(
        file: Option<FileConfig>,
        env_lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let file = file.unwrap_or_default();
        let non_empty = |key: &str| env_lookup(key).filter(|v| !v.trim().is_empty());

        let api_base_url = non_empty(ENV_API_BASE_URL)
            .or(file.api_base_url)
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        let timeout_secs = match non_empty(ENV_TIMEOUT_SECS) {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|_| ConfigError::InvalidTimeout(raw.clone()))?,
            None => file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout("0".into()));
        }

        let time_zone_name = non_empty(ENV_TIME_ZONE)
            .or(file.time_zone)
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let time_zone: Tz = time_zone_name
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidTimeZone(time_zone_name.clone()))?;

        let session_path = non_empty(ENV_SESSION_PATH)
            .map(PathBuf::from)
            .or(file.session_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_PATH));

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
            time_zone,
            session_path,
        })
    }
}
