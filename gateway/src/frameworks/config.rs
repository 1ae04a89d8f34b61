use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::domain::Coordinate;
use crate::use_cases::nearby_feed::{DEFAULT_FEED_LIMIT, DEFAULT_RADIUS_METERS};

// Runtime configuration. Precedence: defaults < TOML file (`GATEWAY_CONFIG`) < env.

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SESSION_FILE: &str = ".lostfound/session.json";
pub const DEFAULT_LOCATE_TIMEOUT_MS: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub locate_timeout_ms: u64,
    pub nearby_radius_m: f64,
    pub feed_limit: usize,
    pub device_location: Option<Coordinate>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
            locate_timeout_ms: DEFAULT_LOCATE_TIMEOUT_MS,
            nearby_radius_m: DEFAULT_RADIUS_METERS,
            feed_limit: DEFAULT_FEED_LIMIT,
            device_location: None,
        }
    }
}

impl GatewayConfig {
    pub fn locate_timeout(&self) -> Duration {
        Duration::from_millis(self.locate_timeout_ms)
    }

    // Load from the process environment (and the file it points at).
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_sources(|key| std::env::var(key).ok())
    }

    pub fn from_sources<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match env("GATEWAY_CONFIG") {
            Some(path) => Self::from_file(PathBuf::from(path))?,
            None => Self::default(),
        };
        config.apply_env(&env);
        Ok(config)
    }

    pub fn from_toml(raw: &str, path: PathBuf) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|source| ConfigError::Parse { path, source })
    }

    fn from_file(path: PathBuf) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_toml(&raw, path)
    }

    fn apply_env<F>(&mut self, env: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = env("REPORTS_API_URL") {
            self.api_base_url = url;
        }
        if let Some(path) = env("SESSION_FILE") {
            self.session_file = PathBuf::from(path);
        }
        override_parsed(env, "LOCATE_TIMEOUT_MS", &mut self.locate_timeout_ms);
        override_parsed(env, "NEARBY_RADIUS_M", &mut self.nearby_radius_m);
        override_parsed(env, "FEED_LIMIT", &mut self.feed_limit);

        let latitude = env("DEVICE_LATITUDE").and_then(|v| v.parse::<f64>().ok());
        let longitude = env("DEVICE_LONGITUDE").and_then(|v| v.parse::<f64>().ok());
        match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => {
                self.device_location = Some(Coordinate::new(latitude, longitude));
            }
            (None, None) => {}
            _ => tracing::warn!("DEVICE_LATITUDE and DEVICE_LONGITUDE must both be valid; ignoring."),
        }
    }
}

fn override_parsed<F, T>(env: &F, key: &str, slot: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    let Some(raw) = env(key) else {
        return;
    };
    match raw.parse() {
        Ok(value) => *slot = value,
        Err(_) => tracing::warn!(key, value = %raw, "unparseable config value; keeping current."),
    }
}
