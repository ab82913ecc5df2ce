use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::error::ConfigError;
use crate::paginate::DEFAULT_PAGE_SIZE;
use crate::session::RacePolicy;

/// Environment variable that overrides the configured backend URL
pub const BACKEND_URL_ENV: &str = "SCRAPE_BACKEND_URL";

/// Configuration for the scrape client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the scraping backend
    #[serde(default = "default_backend_url")]
    pub backend_url: String,

    /// Rows shown per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Which response wins when scrapes overlap
    #[serde(default)]
    pub race_policy: RacePolicy,

    /// Timeout applied to every backend request
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory exports are written to
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
}

/// Default value for backend_url
fn default_backend_url() -> String {
    "http://localhost:8081/".to_string()
}

/// Default value for page_size
fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// Default value for request_timeout_secs
fn default_request_timeout_secs() -> u64 {
    120
}

/// Default value for export_dir
fn default_export_dir() -> String {
    ".".to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            page_size: default_page_size(),
            race_policy: RacePolicy::default(),
            request_timeout_secs: default_request_timeout_secs(),
            export_dir: default_export_dir(),
        }
    }
}

impl ClientConfig {
    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Override the backend URL with the environment variable, if set
    pub fn apply_env(self) -> Self {
        self.with_backend_override(std::env::var(BACKEND_URL_ENV).ok())
    }

    /// Replace the backend URL unless the override is missing or empty
    pub fn with_backend_override(mut self, backend_url: Option<String>) -> Self {
        if let Some(url) = backend_url.filter(|u| !u.trim().is_empty()) {
            ::log::debug!("Backend URL overridden to {}", url);
            self.backend_url = url;
        }
        self
    }

    /// Parsed backend URL, always ending in `/` so endpoint paths join under it
    pub fn base_url(&self) -> Result<Url, ConfigError> {
        let mut raw = self.backend_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).map_err(|source| ConfigError::InvalidUrl {
            url: self.backend_url.clone(),
            source,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.race_policy, RacePolicy::LatestWins);
        assert_eq!(config.request_timeout(), Duration::from_secs(120));
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8081/");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ClientConfig::from_json(
            r#"{"backend_url": "https://scraper.internal:8443", "race_policy": "last_resolved_wins"}"#,
        )
        .unwrap();
        assert_eq!(config.backend_url, "https://scraper.internal:8443");
        assert_eq!(config.race_policy, RacePolicy::LastResolvedWins);
        assert_eq!(config.page_size, 25);
        assert_eq!(config.export_dir, ".");
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://scraper.internal:8443/"
        );
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            ClientConfig::from_json("{ not json"),
            Err(ConfigError::Json(_))
        ));
        assert!(matches!(
            ClientConfig::from_json(r#"{"race_policy": "random"}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("scrape-rows-config-{}.json", std::process::id()));
        std::fs::write(&path, r#"{"page_size": 10, "request_timeout_secs": 5}"#).unwrap();

        let config = ClientConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.page_size, 10);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));

        assert!(matches!(
            ClientConfig::from_file(&path),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_backend_override() {
        let config = ClientConfig::default();
        assert_eq!(
            config.clone().with_backend_override(None).backend_url,
            "http://localhost:8081/"
        );
        assert_eq!(
            config.clone().with_backend_override(Some("  ".into())).backend_url,
            "http://localhost:8081/"
        );
        assert_eq!(
            config
                .with_backend_override(Some("http://10.0.0.2:8081".into()))
                .backend_url,
            "http://10.0.0.2:8081"
        );
    }
}
