//! Client and config-file handling.
//!
//! `ClientConfig` is the typed configuration the client consumes;
//! `ConfigFile` loads it from an INI file in the user's home directory
//! and falls back to defaults when the file is absent.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use ini::Ini;
use thiserror::Error;

/// Default request timeout for the HTTP transport.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default service base URL.
const DEFAULT_BASE_URL: &str = "https://chartdb-cloud.appspot.com/v1";

/// Config file name inside the chartdb home directory.
const CONFIG_FILE: &str = "config.ini";

/// Errors while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },
}

/// Everything the chart client needs to talk to the remote service.
///
/// The three endpoint URLs are derived from one base URL; the
/// basic-auth credential is pre-computed once so request construction
/// stays allocation-light.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// CRUD endpoint for full chart records.
    pub chart_url: String,

    /// Listing endpoint for the metadata-only header projection.
    pub chart_header_url: String,

    /// Privileged curation endpoint.
    pub curation_url: String,

    /// Pre-computed `Basic ...` credential attached to every request.
    pub basic_auth: String,

    /// Directory holding the header cache file.
    pub cache_dir: PathBuf,

    /// Transport timeout in seconds.
    pub timeout_secs: u64,
}

impl ClientConfig {
    /// Build a config from a service base URL, credentials, and a
    /// cache directory.
    pub fn new(
        base_url: &str,
        user: &str,
        secret: &str,
        cache_dir: impl Into<PathBuf>,
    ) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            chart_url: format!("{}/chart", base),
            chart_header_url: format!("{}/chartheader", base),
            curation_url: format!("{}/chartcuration", base),
            basic_auth: basic_auth(user, secret),
            cache_dir: cache_dir.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set the transport timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Pre-compute the basic-auth header value for a credential pair.
fn basic_auth(user: &str, secret: &str) -> String {
    format!(
        "Basic {}",
        STANDARD.encode(format!("{}:{}", user, secret))
    )
}

/// On-disk configuration, loaded from `~/.chartdb/config.ini`.
///
/// ```ini
/// [service]
/// url = https://chartdb-cloud.appspot.com/v1
/// user = someuser
/// secret = somesecret
///
/// [cache]
/// directory = /home/user/.chartdb/cache
/// ```
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub service: ServiceConfig,
    pub cache: CacheConfig,
}

/// `[service]` section.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: String,
    pub user: String,
    pub secret: String,
    pub timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user: String::new(),
            secret: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[cache]` section.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub directory: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            directory: chartdb_home().join("cache"),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

impl ConfigFile {
    /// Load from the default location, falling back to defaults for
    /// any missing section or key.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut config = Self::default();

        if let Some(section) = ini.section(Some("service")) {
            if let Some(url) = section.get("url") {
                config.service.base_url = url.to_string();
            }
            if let Some(user) = section.get("user") {
                config.service.user = user.to_string();
            }
            if let Some(secret) = section.get("secret") {
                config.service.secret = secret.to_string();
            }
            if let Some(timeout) = section.get("timeout_secs") {
                if let Ok(secs) = timeout.parse() {
                    config.service.timeout_secs = secs;
                }
            }
        }

        if let Some(section) = ini.section(Some("cache")) {
            if let Some(dir) = section.get("directory") {
                config.cache.directory = PathBuf::from(dir);
            }
        }

        Ok(config)
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        chartdb_home().join(CONFIG_FILE)
    }

    /// Translate the file contents into a [`ClientConfig`].
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(
            &self.service.base_url,
            &self.service.user,
            &self.service.secret,
            self.cache.directory.clone(),
        )
        .with_timeout_secs(self.service.timeout_secs)
    }
}

/// The chartdb home directory, `~/.chartdb`.
fn chartdb_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".chartdb")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_client_config_derives_endpoint_urls() {
        let config = ClientConfig::new("https://svc.example.org/v1/", "u", "s", "/tmp/cache");
        assert_eq!(config.chart_url, "https://svc.example.org/v1/chart");
        assert_eq!(
            config.chart_header_url,
            "https://svc.example.org/v1/chartheader"
        );
        assert_eq!(
            config.curation_url,
            "https://svc.example.org/v1/chartcuration"
        );
    }

    #[test]
    fn test_basic_auth_is_precomputed() {
        let config = ClientConfig::new("https://svc.example.org", "user", "pass", "/tmp");
        // "user:pass" in base64
        assert_eq!(config.basic_auth, "Basic dXNlcjpwYXNz");
    }

    #[test]
    fn test_client_config_timeout_builder() {
        let config =
            ClientConfig::new("https://svc.example.org", "u", "s", "/tmp").with_timeout_secs(5);
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_config_file_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.service.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.cache.directory.ends_with("cache"));
    }

    #[test]
    fn test_load_from_ini_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(
            &path,
            "[service]\n\
             url = https://svc.example.org/v2\n\
             user = alice\n\
             secret = hunter2\n\
             timeout_secs = 10\n\
             \n\
             [cache]\n\
             directory = /var/cache/chartdb\n",
        )
        .unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.service.base_url, "https://svc.example.org/v2");
        assert_eq!(config.service.user, "alice");
        assert_eq!(config.service.timeout_secs, 10);
        assert_eq!(config.cache.directory, PathBuf::from("/var/cache/chartdb"));

        let client = config.client_config();
        assert_eq!(client.chart_url, "https://svc.example.org/v2/chart");
        assert_eq!(client.timeout_secs, 10);
    }

    #[test]
    fn test_load_from_partial_file_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[service]\nuser = bob\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.service.user, "bob");
        assert_eq!(config.service.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_load_from_unreadable_file_is_error() {
        let temp = TempDir::new().unwrap();
        let result = ConfigFile::load_from(&temp.path().join("missing.ini"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
