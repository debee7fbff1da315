//! # Authentication Errors
//!
//! Error types for session payload verification.

use thiserror::Error;

/// The payload cannot be verified at all. No claims are returned.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StructuralError {
    /// Empty payload or no `hash` field
    #[error("invalid payload structure or missing hash")]
    MissingHash,

    /// No `auth_date` field
    #[error("auth_date field is missing")]
    MissingAuthDate,

    /// `auth_date` is not an integer timestamp
    #[error("invalid auth_date format: {0}")]
    InvalidAuthDate(String),

    /// Unexpected failure inside the verifier
    #[error("internal verification error: {0}")]
    Internal(String),
}

/// Why a verdict could not be turned into an identity context.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// The payload was structurally invalid
    #[error("malformed session payload: {0}")]
    Malformed(StructuralError),

    /// Valid signature, but the payload is older than the allowed window
    #[error("session payload expired ({age_secs}s old)")]
    Expired { age_secs: u64 },

    /// Signature did not match
    #[error("session payload signature is invalid")]
    InvalidSignature,

    /// Valid signature, but `auth_date` lies too far in the future
    #[error("session payload is dated {ahead_secs}s in the future")]
    FutureDated { ahead_secs: u64 },

    /// Authentic payload without a usable `user.id`
    #[error("session payload carries no user identity")]
    MissingUser,
}
