//! # Session Authenticator (SF-01)
//!
//! Verifies signed session payloads issued by the host messaging platform
//! and extracts the identity claims they carry.
//!
//! ## Architecture
//!
//! This subsystem follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): Claim parsing, canonicalization, HMAC logic. No I/O.
//! - **Ports Layer** (`ports/`): Inbound API trait and the outbound clock
//! - **Service Layer** (`service.rs`): Wires domain logic to ports
//!
//! ## Signature Scheme
//!
//! ```text
//! signing_key    = HMAC-SHA256(key = "WebAppData", msg = secret)
//! data_check     = sorted("key=value" for every claim except hash).join("\n")
//! expected_hash  = hex(HMAC-SHA256(key = signing_key, msg = data_check))
//! ```
//!
//! ## Security Notes
//!
//! - Signatures are compared in constant time
//! - Attacker-controlled input never panics; it produces a [`Verdict`]
//! - The secret is zeroized on drop and never logged

pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use domain::claims::{parse_payload, ClaimValue, Claims, SessionUser, JSON_CLAIM_KEYS};
pub use domain::config::{AuthConfig, ConfigError, DEFAULT_MAX_AGE_SECS};
pub use domain::errors::{IdentityError, StructuralError};
pub use domain::signature::{
    compute_signature, data_check_string, derive_signing_key, sign_fields, signatures_match,
    SigningSecret, SIGNING_KEY_SALT,
};
pub use domain::verdict::{Freshness, IdentityContext, Rejection, Verdict};
pub use ports::inbound::SessionAuthApi;
pub use ports::outbound::{FixedTimeSource, SystemTimeSource, TimeSource};
pub use service::{validate_init_data, SessionAuthenticator};
