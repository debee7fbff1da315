//! Authenticator configuration with validation.

use serde::{Deserialize, Serialize};

/// Default maximum payload age (one hour).
pub const DEFAULT_MAX_AGE_SECS: u64 = 3600;

/// Session authenticator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Maximum accepted age of `auth_date`, in seconds
    pub max_age_secs: u64,
    /// How far `auth_date` may lie in the future before the payload is rejected.
    ///
    /// `None` tolerates any future date and only logs a warning.
    pub max_future_skew_secs: Option<u64>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            max_age_secs: DEFAULT_MAX_AGE_SECS,
            max_future_skew_secs: None,
        }
    }
}

impl AuthConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_age_secs == 0 {
            return Err(ConfigError::InvalidMaxAge(
                "max_age_secs cannot be 0".into(),
            ));
        }
        Ok(())
    }

    /// Same configuration with a different age window.
    pub fn with_max_age(mut self, max_age_secs: u64) -> Self {
        self.max_age_secs = max_age_secs;
        self
    }

    /// Same configuration with a bounded future-skew tolerance.
    pub fn with_max_future_skew(mut self, skew_secs: u64) -> Self {
        self.max_future_skew_secs = Some(skew_secs);
        self
    }
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Invalid age window
    #[error("invalid max age: {0}")]
    InvalidMaxAge(String),
    /// Signing secret is missing
    #[error("signing secret is empty")]
    EmptySecret,
}
