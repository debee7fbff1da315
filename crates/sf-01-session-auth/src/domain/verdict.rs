//! # Authenticity Verdicts
//!
//! Outcome of validating one payload. Structural failures carry no claims;
//! rejected payloads keep their claims so callers can explain the failure.

use crate::domain::claims::{Claims, SessionUser};
use crate::domain::errors::{IdentityError, StructuralError};

/// Age of a payload relative to the validation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Within the allowed window
    Fresh { age_secs: u64 },
    /// Older than the allowed window
    Stale { age_secs: u64 },
    /// `auth_date` is ahead of the local clock
    Ahead { ahead_secs: u64, tolerated: bool },
}

impl Freshness {
    /// Classifies an age against the window and optional future tolerance.
    pub fn classify(age_secs: i64, max_age_secs: u64, max_future_skew_secs: Option<u64>) -> Self {
        if age_secs < 0 {
            let ahead_secs = age_secs.unsigned_abs();
            let tolerated = max_future_skew_secs.map_or(true, |skew| ahead_secs <= skew);
            return Freshness::Ahead {
                ahead_secs,
                tolerated,
            };
        }
        let age_secs = age_secs.unsigned_abs();
        if age_secs > max_age_secs {
            Freshness::Stale { age_secs }
        } else {
            Freshness::Fresh { age_secs }
        }
    }

    /// Whether this freshness alone permits authentication.
    pub fn is_acceptable(&self) -> bool {
        match self {
            Freshness::Fresh { .. } => true,
            Freshness::Stale { .. } => false,
            Freshness::Ahead { tolerated, .. } => *tolerated,
        }
    }
}

/// Why a parsed payload was not accepted. Both axes are always reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejection {
    /// Whether the received hash matched
    pub signature_valid: bool,
    /// Age classification of `auth_date`
    pub freshness: Freshness,
}

impl Rejection {
    /// Signature matched but the payload is too old.
    pub fn is_expired(&self) -> bool {
        self.signature_valid && matches!(self.freshness, Freshness::Stale { .. })
    }

    /// Signature did not match.
    pub fn is_forged(&self) -> bool {
        !self.signature_valid
    }
}

/// Result of validating a signed session payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Signature valid and payload fresh
    Authentic { claims: Claims },
    /// Parsed, but forged and/or stale
    Rejected { claims: Claims, rejection: Rejection },
    /// Structurally invalid; no claims available
    Malformed { error: StructuralError },
}

impl Verdict {
    pub fn is_authentic(&self) -> bool {
        matches!(self, Verdict::Authentic { .. })
    }

    /// Claims, whenever parsing succeeded.
    pub fn claims(&self) -> Option<&Claims> {
        match self {
            Verdict::Authentic { claims } | Verdict::Rejected { claims, .. } => Some(claims),
            Verdict::Malformed { .. } => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Verdict::Rejected { rejection, .. } => Some(rejection),
            _ => None,
        }
    }

    /// The `(is_authentic, claims)` pair.
    pub fn into_parts(self) -> (bool, Option<Claims>) {
        match self {
            Verdict::Authentic { claims } => (true, Some(claims)),
            Verdict::Rejected { claims, .. } => (false, Some(claims)),
            Verdict::Malformed { .. } => (false, None),
        }
    }

    /// Resolves the acting identity from an authentic verdict.
    pub fn into_identity(self) -> Result<IdentityContext, IdentityError> {
        match self {
            Verdict::Authentic { claims } => {
                let user = claims.user().ok_or(IdentityError::MissingUser)?;
                Ok(IdentityContext { user, claims })
            }
            Verdict::Rejected { rejection, .. } => Err(identity_error(&rejection)),
            Verdict::Malformed { error } => Err(IdentityError::Malformed(error)),
        }
    }
}

fn identity_error(rejection: &Rejection) -> IdentityError {
    if !rejection.signature_valid {
        return IdentityError::InvalidSignature;
    }
    match rejection.freshness {
        Freshness::Stale { age_secs } => IdentityError::Expired { age_secs },
        Freshness::Ahead { ahead_secs, .. } => IdentityError::FutureDated { ahead_secs },
        // A fresh payload with a valid signature is never rejected
        Freshness::Fresh { .. } => IdentityError::InvalidSignature,
    }
}

/// Authenticated acting user plus every claim of the payload.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityContext {
    pub user: SessionUser,
    pub claims: Claims,
}

impl IdentityContext {
    pub fn user_id(&self) -> i64 {
        self.user.id
    }

    /// `start_param` deep-link argument, if the session has one.
    pub fn start_param(&self) -> Option<&str> {
        self.claims.text("start_param")
    }
}
