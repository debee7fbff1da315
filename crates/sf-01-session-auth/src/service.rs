//! # Session Authentication Service
//!
//! Application service that implements the `SessionAuthApi` trait.
//!
//! ## Validation Flow
//!
//! 1. Parse the payload into claims
//! 2. Detach `hash` (structural failure if absent)
//! 3. Read `auth_date` (structural failure if absent or non-integer)
//! 4. Classify freshness; a stale payload is still signature-checked
//! 5. Build the sorted data-check string and compare signatures in constant time

use tracing::{debug, error, info, warn};

use crate::domain::claims::{parse_payload, Claims};
use crate::domain::config::{AuthConfig, ConfigError};
use crate::domain::errors::StructuralError;
use crate::domain::signature::{
    compute_signature, data_check_string, derive_signing_key, signatures_match, SigningSecret,
};
use crate::domain::verdict::{Freshness, Rejection, Verdict};
use crate::ports::inbound::SessionAuthApi;
use crate::ports::outbound::{SystemTimeSource, TimeSource};

/// Session Authenticator.
///
/// Holds the shared secret and the age policy. Each call is independent; no
/// state is retained between validations.
pub struct SessionAuthenticator<T: TimeSource = SystemTimeSource> {
    secret: SigningSecret,
    config: AuthConfig,
    clock: T,
}

impl SessionAuthenticator<SystemTimeSource> {
    /// Create an authenticator using the system clock.
    pub fn new(secret: SigningSecret, config: AuthConfig) -> Result<Self, ConfigError> {
        Self::with_clock(secret, config, SystemTimeSource)
    }
}

impl<T: TimeSource> SessionAuthenticator<T> {
    /// Create an authenticator with an explicit time source.
    pub fn with_clock(
        secret: SigningSecret,
        config: AuthConfig,
        clock: T,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        Ok(Self {
            secret,
            config,
            clock,
        })
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }
}

impl<T: TimeSource> SessionAuthApi for SessionAuthenticator<T> {
    fn validate(&self, payload: &str) -> Verdict {
        self.validate_with_max_age(payload, self.config.max_age_secs)
    }

    fn validate_with_max_age(&self, payload: &str, max_age_secs: u64) -> Verdict {
        evaluate(
            payload,
            &self.secret,
            max_age_secs,
            self.config.max_future_skew_secs,
            self.clock.now(),
        )
    }
}

/// Validates a payload with the system clock and no future-skew bound.
pub fn validate_init_data(payload: &str, secret: &str, max_age_secs: u64) -> Verdict {
    evaluate(
        payload,
        &SigningSecret::new(secret),
        max_age_secs,
        None,
        SystemTimeSource.now(),
    )
}

fn evaluate(
    payload: &str,
    secret: &SigningSecret,
    max_age_secs: u64,
    max_future_skew_secs: Option<u64>,
    now: i64,
) -> Verdict {
    let mut claims = parse_payload(payload);

    let received_hash = match claims.remove("hash") {
        Some(value) => value.signed_text().to_string(),
        None => return malformed(StructuralError::MissingHash),
    };

    let auth_timestamp = match read_auth_date(&claims) {
        Ok(ts) => ts,
        Err(e) => return malformed(e),
    };

    let freshness = Freshness::classify(
        now.saturating_sub(auth_timestamp),
        max_age_secs,
        max_future_skew_secs,
    );
    match freshness {
        Freshness::Ahead {
            ahead_secs,
            tolerated,
        } => warn!(
            auth_date = auth_timestamp,
            now = now,
            ahead_secs = ahead_secs,
            tolerated = tolerated,
            "Session auth_date is in the future"
        ),
        Freshness::Stale { age_secs } => warn!(
            age_secs = age_secs,
            max_age_secs = max_age_secs,
            "Session payload is too old"
        ),
        Freshness::Fresh { age_secs } => {
            debug!(age_secs = age_secs, "Session payload age is valid")
        }
    }

    let signature_valid = match check_signature(&claims, secret, &received_hash) {
        Ok(valid) => valid,
        Err(e) => {
            error!(error = %e, "Unexpected error during session validation");
            return Verdict::Malformed { error: e };
        }
    };

    if !signature_valid {
        warn!("Session validation failed: hash mismatch");
    }

    if signature_valid && freshness.is_acceptable() {
        info!("Session validation successful");
        Verdict::Authentic { claims }
    } else {
        Verdict::Rejected {
            claims,
            rejection: Rejection {
                signature_valid,
                freshness,
            },
        }
    }
}

fn read_auth_date(claims: &Claims) -> Result<i64, StructuralError> {
    let raw = claims
        .get("auth_date")
        .map(|value| value.signed_text())
        .ok_or(StructuralError::MissingAuthDate)?;
    raw.trim()
        .parse::<i64>()
        .map_err(|_| StructuralError::InvalidAuthDate(raw.to_string()))
}

fn check_signature(
    claims: &Claims,
    secret: &SigningSecret,
    received_hash: &str,
) -> Result<bool, StructuralError> {
    let data_check = data_check_string(claims);
    debug!(fields = claims.len(), bytes = data_check.len(), "Built data-check string");
    let signing_key = derive_signing_key(secret)?;
    let computed = compute_signature(&signing_key, &data_check)?;
    Ok(signatures_match(&computed, received_hash))
}

fn malformed(error: StructuralError) -> Verdict {
    error!(error = %error, "Session authentication error");
    Verdict::Malformed { error }
}
