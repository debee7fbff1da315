//! # Payload Signatures
//!
//! Canonicalization and HMAC-SHA256 logic of the platform signing protocol.
//! The byte layout produced here must match the issuer exactly.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::claims::{ClaimValue, Claims};
use crate::domain::errors::StructuralError;

type HmacSha256 = Hmac<Sha256>;

/// Key used to derive the signing key from the shared secret.
pub const SIGNING_KEY_SALT: &str = "WebAppData";

/// Shared secret issued by the platform (bot token).
///
/// Zeroized on drop. `Debug` never prints the value.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(String);

impl SigningSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Raw secret bytes for key derivation.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SigningSecret([REDACTED])")
    }
}

/// Builds the data-check string: claims sorted by key, `key=value`, joined by `\n`.
///
/// The caller removes `hash` first. Sorting is explicit and bytewise, so the
/// result does not depend on the order fields arrived in.
pub fn data_check_string(claims: &Claims) -> String {
    let mut pairs: Vec<(&str, &str)> = claims
        .iter()
        .map(|(key, value)| (key, value.signed_text()))
        .collect();
    pairs.sort_unstable_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Derives the signing key: `HMAC-SHA256(key = "WebAppData", msg = secret)`.
pub fn derive_signing_key(secret: &SigningSecret) -> Result<[u8; 32], StructuralError> {
    let mut mac = HmacSha256::new_from_slice(SIGNING_KEY_SALT.as_bytes())
        .map_err(|e| StructuralError::Internal(format!("signing key derivation: {}", e)))?;
    mac.update(secret.expose().as_bytes());
    let mut key = [0u8; 32];
    key.copy_from_slice(&mac.finalize().into_bytes());
    Ok(key)
}

/// Computes the hex-encoded signature of a data-check string.
pub fn compute_signature(
    signing_key: &[u8],
    data_check: &str,
) -> Result<String, StructuralError> {
    let mut mac = HmacSha256::new_from_slice(signing_key)
        .map_err(|e| StructuralError::Internal(format!("signature computation: {}", e)))?;
    mac.update(data_check.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time comparison of a computed and a received signature.
pub fn signatures_match(computed: &str, received: &str) -> bool {
    computed.as_bytes().ct_eq(received.as_bytes()).into()
}

/// Encodes and signs a payload the way the platform issues it.
///
/// Fields are emitted in the given order followed by `hash`.
pub fn sign_fields(
    fields: &[(&str, &str)],
    secret: &SigningSecret,
) -> Result<String, StructuralError> {
    let mut claims = Claims::new();
    for (key, value) in fields {
        claims.insert(*key, ClaimValue::Text((*value).to_string()));
    }
    let key = derive_signing_key(secret)?;
    let hash = compute_signature(&key, &data_check_string(&claims))?;

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in fields {
        serializer.append_pair(key, value);
    }
    serializer.append_pair("hash", &hash);
    Ok(serializer.finish())
}
