//! Gateway configuration with validation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Root URL of the shop (e.g. `https://shop.example.com`)
    pub base_url: String,
    /// REST API version segment
    pub api_version: String,
    /// API key/secret pair attached to every request
    pub credentials: ApiCredentials,
    /// Timeout configuration
    pub timeouts: TimeoutConfig,
    /// User agent for outbound requests
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://your-wordpress-site.com".to_string(),
            api_version: "wc/v3".to_string(),
            credentials: ApiCredentials::default(),
            timeouts: TimeoutConfig::default(),
            user_agent: format!("storefront-gateway/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let parsed = url::Url::parse(&self.base_url)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", self.base_url, e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        if self.api_version.trim_matches('/').is_empty() {
            return Err(ConfigError::Invalid("api_version cannot be empty".into()));
        }

        if self.credentials.key.is_empty() || self.credentials.secret.is_empty() {
            return Err(ConfigError::MissingCredentials);
        }

        let timeouts = [
            ("connect", self.timeouts.connect),
            ("read", self.timeouts.read),
            ("total", self.timeouts.total),
        ];
        for (name, value) in timeouts {
            if value.is_zero() {
                return Err(ConfigError::InvalidTimeout(format!(
                    "{} timeout cannot be 0",
                    name
                )));
            }
        }
        if self.timeouts.total < self.timeouts.read {
            return Err(ConfigError::InvalidTimeout(format!(
                "total timeout ({:?}) is shorter than read timeout ({:?})",
                self.timeouts.total, self.timeouts.read
            )));
        }

        Ok(())
    }

    /// API root: `{base_url}/wp-json/{api_version}`
    pub fn api_root(&self) -> String {
        format!(
            "{}/wp-json/{}",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

/// Consumer key and secret of the commerce API.
#[derive(Clone, Default, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct ApiCredentials {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub secret: String,
}

impl ApiCredentials {
    pub fn new(key: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("key", &"[REDACTED]")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Timeout configuration
///
/// Writes are bounded by `total`; the HTTP client has no separate write phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment
    #[serde(with = "humantime_serde")]
    pub connect: Duration,
    /// Idle time between reads of the response
    #[serde(with = "humantime_serde")]
    pub read: Duration,
    /// Whole request lifecycle, never shorter than `read`
    #[serde(with = "humantime_serde")]
    pub total: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            read: Duration::from_secs(20),
            total: Duration::from_secs(30),
        }
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// Base URL does not parse or uses an unsupported scheme
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    /// API key or secret missing
    #[error("api key and secret must both be set")]
    MissingCredentials,
    /// Invalid timeout value
    #[error("invalid timeout: {0}")]
    InvalidTimeout(String),
    /// General configuration error
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Humantime serde module for Duration serialization
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if duration.subsec_millis() == 0 {
            serializer.serialize_str(&format!("{}s", duration.as_secs()))
        } else {
            serializer.serialize_str(&format!("{}ms", duration.as_millis()))
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_duration(&s).map_err(serde::de::Error::custom)
    }

    pub fn parse_duration(s: &str) -> Result<Duration, &'static str> {
        let s = s.trim();
        if let Some(ms) = s.strip_suffix("ms") {
            ms.trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| "invalid milliseconds")
        } else if let Some(secs) = s.strip_suffix('s') {
            secs.trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid seconds")
        } else if let Some(mins) = s.strip_suffix('m') {
            mins.trim()
                .parse::<u64>()
                .ok()
                .and_then(|m| m.checked_mul(60))
                .map(Duration::from_secs)
                .ok_or("invalid minutes")
        } else {
            // Try parsing as plain seconds
            s.parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| "invalid duration format")
        }
    }
}

pub use humantime_serde::parse_duration;
