//! On-disk configuration. Every field has a default so a missing
//! `config.toml` simply means "run with defaults".

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use serde::Deserialize;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".lyrics-search";
/// Configuration file stored inside the data directory.
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub connectivity: ConnectivityConfig,
    pub features: FeaturesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the lyrics.ovh compatible API, without a trailing slash.
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.lyrics.ovh/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConnectivityConfig {
    /// `host:port` that must accept a TCP connection for the network to count
    /// as reachable.
    pub probe_address: String,
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_address: "api.lyrics.ovh:443".to_string(),
            interval_ms: 2_000,
            timeout_ms: 1_500,
        }
    }
}

impl ConnectivityConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeaturesConfig {
    /// Record successful searches and list them under the form.
    pub previous_searches: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive, overridden by `LYRICS_SEARCH_LOG`.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load `~/.lyrics-search/config.toml`, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&data_dir()?.join(CONFIG_FILE_NAME))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw)
                .with_context(|| format!("invalid configuration in {}", path.display())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => {
                Err(err).with_context(|| format!("failed to read {}", path.display()))
            }
        }
    }

    pub fn parse(raw: &str) -> Result<Self> {
        toml::from_str(raw).context("failed to parse configuration")
    }
}

/// Resolve the application data directory inside the user's home, creating it
/// if needed.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    let dir = base_dirs.home_dir().join(DATA_DIR_NAME);
    fs::create_dir_all(&dir).context("failed to create data directory")?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = Config::parse("").unwrap();
        assert_eq!(config, Config::default());
        assert!(!config.features.previous_searches);
        assert_eq!(config.lookup.base_url, "https://api.lyrics.ovh/v1");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = Config::parse(
            r#"
            [features]
            previous_searches = true

            [connectivity]
            interval_ms = 500
            "#,
        )
        .unwrap();
        assert!(config.features.previous_searches);
        assert_eq!(config.connectivity.interval(), Duration::from_millis(500));
        assert_eq!(config.connectivity.probe_address, "api.lyrics.ovh:443");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::parse("[lookup]\ntimeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join("lyrics-search-missing-config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.lookup.timeout(), Duration::from_secs(10));
    }
}
