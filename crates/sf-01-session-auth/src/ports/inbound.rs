//! # Inbound Ports (Driving Ports / API)

use crate::domain::errors::IdentityError;
use crate::domain::verdict::{IdentityContext, Verdict};

/// Session authentication API.
///
/// Implementations must be thread-safe (`Send + Sync`) and must never panic
/// on attacker-controlled input.
pub trait SessionAuthApi: Send + Sync {
    /// Validate a payload against the configured age window.
    fn validate(&self, payload: &str) -> Verdict;

    /// Validate a payload against an explicit age window.
    fn validate_with_max_age(&self, payload: &str, max_age_secs: u64) -> Verdict;

    /// Validate a payload and resolve the acting user.
    fn authenticate(&self, payload: &str) -> Result<IdentityContext, IdentityError> {
        self.validate(payload).into_identity()
    }
}
