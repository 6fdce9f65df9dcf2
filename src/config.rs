use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use url::Url;

use crate::constants::{DEFAULT_CONFIG_PATH, RESERVED_OUTBOUND_PARAMS};
use crate::domain::LowValueMarker;
use crate::error::{RelayError, Result};

/// Process-wide settings, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub relay: RelaySettings,
    pub masking: MaskingConfig,
    pub low_value_marker: MarkerConfig,
    pub log: LogConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelaySettings {
    /// Tracker postback endpoint every derived event is sent to.
    pub postback_base: String,
    /// Payouts strictly below this are low-value.
    pub value_threshold: f64,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            postback_base: String::new(),
            value_threshold: 1.0,
            timeout_seconds: 6,
            user_agent: "RT-Proxy-OG/1.0".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskingConfig {
    pub enabled: bool,
    pub keep_left: usize,
    pub keep_right: usize,
    pub mask_char: char,
}

impl Default for MaskingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            keep_left: 3,
            keep_right: 2,
            mask_char: '*',
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub key: String,
    pub value: String,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            key: "sub11".to_string(),
            value: "low_value".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    pub dir: PathBuf,
    pub file: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from("logs"),
            file: "redtrack-postback-proxy.log".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            path: "/postback".to_string(),
        }
    }
}

impl RelayConfig {
    /// Load configuration from `path`, or from `POSTBACK_RELAY_CONFIG` /
    /// `config.toml` when no path is given. A missing default file falls back
    /// to built-in defaults; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv::dotenv().ok();

        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var("POSTBACK_RELAY_CONFIG").ok().map(PathBuf::from));

        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RelayError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(base) = std::env::var("POSTBACK_BASE_URL") {
            self.relay.postback_base = base;
        }
        env_parse("POSTBACK_VALUE_THRESHOLD", &mut self.relay.value_threshold)?;
        env_parse("POSTBACK_TIMEOUT_SECONDS", &mut self.relay.timeout_seconds)?;
        env_bool("POSTBACK_LOG_ENABLED", &mut self.log.enabled)?;
        if let Ok(dir) = std::env::var("POSTBACK_LOG_DIR") {
            self.log.dir = PathBuf::from(dir);
        }
        env_bool("POSTBACK_MASK_ENABLED", &mut self.masking.enabled)?;
        env_parse("PORT", &mut self.server.port)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let base = self.postback_url()?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(RelayError::Config(format!(
                "relay.postback_base must be an http(s) URL, got scheme '{}'",
                base.scheme()
            )));
        }
        if !self.relay.value_threshold.is_finite() {
            return Err(RelayError::Config("relay.value_threshold must be finite".to_string()));
        }
        if self.relay.timeout_seconds == 0 {
            return Err(RelayError::Config("relay.timeout_seconds must be positive".to_string()));
        }
        let key = self.low_value_marker.key.as_str();
        if RESERVED_OUTBOUND_PARAMS.contains(&key) {
            return Err(RelayError::Config(format!(
                "low_value_marker.key '{}' collides with an outbound parameter",
                key
            )));
        }
        if !self.server.path.starts_with('/') || self.server.path == "/health" {
            return Err(RelayError::Config(format!(
                "server.path must start with '/' and not be /health, got '{}'",
                self.server.path
            )));
        }
        Ok(())
    }

    pub fn postback_url(&self) -> Result<Url> {
        if self.relay.postback_base.trim().is_empty() {
            return Err(RelayError::Config(
                "relay.postback_base is required (or set POSTBACK_BASE_URL)".to_string(),
            ));
        }
        Ok(Url::parse(self.relay.postback_base.trim())?)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.relay.timeout_seconds)
    }

    /// The marker pair, if both halves are configured.
    pub fn low_value_marker(&self) -> Option<LowValueMarker> {
        let MarkerConfig { key, value } = &self.low_value_marker;
        if key.is_empty() || value.is_empty() {
            return None;
        }
        Some(LowValueMarker {
            key: key.clone(),
            value: value.clone(),
        })
    }

    pub fn log_path(&self) -> PathBuf {
        self.log.dir.join(&self.log.file)
    }
}

fn env_parse<T: FromStr>(key: &str, target: &mut T) -> Result<()>
where
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| RelayError::Config(format!("Invalid {}='{}': {}", key, raw, e)))?;
    }
    Ok(())
}

fn env_bool(key: &str, target: &mut bool) -> Result<()> {
    if let Ok(raw) = std::env::var(key) {
        *target = match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => return Err(RelayError::Config(format!("Invalid {}='{}': expected a boolean", key, raw))),
        };
    }
    Ok(())
}
