//! Client configuration
//!
//! Configuration is an explicit value handed to each provider at construction;
//! there is no process-wide client.
//!
//! ```rust
//! use lotto_stats::ClientConfig;
//! use std::time::Duration;
//!
//! let config = ClientConfig::from_yaml_str("base_url: https://stats.example.com/api\ntimeout_secs: 10\n")
//!     .unwrap()
//!     .with_page_size(50)
//!     .unwrap();
//! assert_eq!(config.timeout, Duration::from_secs(10));
//! assert_eq!(config.page_size, 50);
//! ```

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::{LottoError, Result};

/// Environment variable overriding the service base URL.
pub const BASE_URL_ENV: &str = "LOTTO_STATS_BASE_URL";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PAGE_SIZE: u32 = 20;

/// Connection settings for the statistics service.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service root; game slugs are appended below it
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
    /// Draws requested per page of latest results
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// On-disk configuration shape.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    base_url: String,
    #[serde(default)]
    timeout_secs: Option<u64>,
    #[serde(default)]
    page_size: Option<u32>,
}

impl ClientConfig {
    /// Configuration pointing at `base_url` with default timeout and page size.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self { base_url: parse_base_url(base_url)?, ..Self::default() })
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    /// Replace the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the page size; zero is rejected.
    pub fn with_page_size(mut self, page_size: u32) -> Result<Self> {
        if page_size == 0 {
            return Err(LottoError::configuration("page size must be at least 1"));
        }
        self.page_size = page_size;
        Ok(self)
    }

    /// Apply [`BASE_URL_ENV`] if it is set.
    pub fn with_env_overrides(self) -> Result<Self> {
        match std::env::var(BASE_URL_ENV) {
            Ok(value) if !value.trim().is_empty() => {
                debug!("Using base URL from {}", BASE_URL_ENV);
                self.with_base_url(value.trim())
            }
            _ => Ok(self),
        }
    }

    /// Parse configuration from YAML text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let file: ConfigFile = serde_yaml_ng::from_str(yaml)
            .map_err(|e| LottoError::configuration(format!("invalid configuration: {}", e)))?;

        let mut config = Self::new(&file.base_url)?;
        if let Some(secs) = file.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(page_size) = file.page_size {
            config = config.with_page_size(page_size)?;
        }
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path).map_err(|e| {
            LottoError::configuration(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml_str(&yaml)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(LottoError::configuration(format!(
            "base URL must be an http(s) URL, got {}",
            raw
        )));
    }
    Ok(url)
}
