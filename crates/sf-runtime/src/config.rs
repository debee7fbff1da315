//! Storefront configuration.
//!
//! Built from environment variables. Unset variables fall back to
//! placeholder defaults, which [`StorefrontConfig::validate_for_production`]
//! rejects.

use sf_01_session_auth::{AuthConfig, SigningSecret};
use sf_02_commerce_gateway::{ApiCredentials, GatewayConfig};

pub const ENV_COMMERCE_URL: &str = "WOOCOMMERCE_URL";
pub const ENV_COMMERCE_KEY: &str = "WOOCOMMERCE_KEY";
pub const ENV_COMMERCE_SECRET: &str = "WOOCOMMERCE_SECRET";
pub const ENV_COMMERCE_API_VERSION: &str = "WOOCOMMERCE_API_VERSION";
pub const ENV_BOT_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_LOGGING_LEVEL: &str = "LOGGING_LEVEL";
pub const ENV_SESSION_MAX_AGE: &str = "SESSION_MAX_AGE_SECS";
pub const ENV_SESSION_MAX_FUTURE_SKEW: &str = "SESSION_MAX_FUTURE_SKEW_SECS";

const PLACEHOLDER_URL: &str = "https://your-wordpress-site.com";
const PLACEHOLDER_KEY: &str = "ck_dummykey";
const PLACEHOLDER_SECRET: &str = "cs_dummysecret";
const PLACEHOLDER_BOT_TOKEN: &str = "YOUR_BOT_TOKEN";

/// Process configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    pub gateway: GatewayConfig,
    pub auth: AuthConfig,
    /// Bot token; the session signing secret
    pub bot_token: SigningSecret,
    /// Fallback filter directive when `RUST_LOG` is unset
    pub logging_level: String,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig {
                base_url: PLACEHOLDER_URL.to_string(),
                credentials: ApiCredentials::new(PLACEHOLDER_KEY, PLACEHOLDER_SECRET),
                ..GatewayConfig::default()
            },
            auth: AuthConfig::default(),
            bot_token: SigningSecret::new(PLACEHOLDER_BOT_TOKEN),
            logging_level: "info".to_string(),
        }
    }
}

impl StorefrontConfig {
    /// Load from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(url) = var(ENV_COMMERCE_URL) {
            config.gateway.base_url = url;
        }
        if let Some(version) = var(ENV_COMMERCE_API_VERSION) {
            config.gateway.api_version = version;
        }
        if let Some(key) = var(ENV_COMMERCE_KEY) {
            config.gateway.credentials.key = key;
        }
        if let Some(secret) = var(ENV_COMMERCE_SECRET) {
            config.gateway.credentials.secret = secret;
        }
        if let Some(token) = var(ENV_BOT_TOKEN) {
            config.bot_token = SigningSecret::new(token);
        }
        if let Some(level) = var(ENV_LOGGING_LEVEL) {
            config.logging_level = level.to_lowercase();
        }
        if let Some(raw) = var(ENV_SESSION_MAX_AGE) {
            config.auth.max_age_secs = parse_secs(ENV_SESSION_MAX_AGE, &raw)?;
        }
        if let Some(raw) = var(ENV_SESSION_MAX_FUTURE_SKEW) {
            config.auth.max_future_skew_secs = Some(parse_secs(ENV_SESSION_MAX_FUTURE_SKEW, &raw)?);
        }

        Ok(config)
    }

    /// Structural validation of both subsystem configs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gateway.validate()?;
        self.auth
            .validate()
            .map_err(|e| ConfigError::Auth(e.to_string()))?;
        if self.bot_token.is_empty() {
            return Err(ConfigError::Auth("bot token is empty".to_string()));
        }
        Ok(())
    }

    /// Reject placeholder credentials and URLs.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(warning) = self.placeholder_warnings().into_iter().next() {
            return Err(ConfigError::Placeholder(warning));
        }
        Ok(())
    }

    /// Settings still at their placeholder values.
    pub fn placeholder_warnings(&self) -> Vec<&'static str> {
        let mut warnings = Vec::new();
        let credentials = &self.gateway.credentials;
        if credentials.key.contains("dummy") || credentials.secret.contains("dummy") {
            warnings.push("commerce API key and secret use placeholder values");
        }
        if self.bot_token.expose().contains(PLACEHOLDER_BOT_TOKEN) {
            warnings.push("bot token is not set");
        }
        if self.gateway.base_url.contains("your-wordpress-site.com") {
            warnings.push("commerce URL is not set");
        }
        warnings
    }
}

fn parse_secs(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: raw.to_string(),
    })
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a non-negative integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
    #[error(transparent)]
    Gateway(#[from] sf_02_commerce_gateway::ConfigError),
    #[error("session auth configuration: {0}")]
    Auth(String),
    #[error("refusing placeholder configuration: {0}")]
    Placeholder(&'static str),
}
