//! # Session Claims
//!
//! Decoded contents of a signed session payload.
//!
//! A payload is a form-urlencoded list of `key=value` pairs. Values under the
//! reserved keys in [`JSON_CLAIM_KEYS`] are additionally decoded as JSON when
//! they look like an object. Every other value stays a plain string.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Claim keys whose values carry a JSON object.
pub const JSON_CLAIM_KEYS: [&str; 3] = ["user", "receiver", "chat"];

/// Characters of an undecodable value echoed into the warning log.
const LOG_PREVIEW_CHARS: usize = 100;

/// A single claim value.
///
/// JSON claims keep the exact decoded text next to the parsed object, because
/// the signature covers the transmitted text and not a re-serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum ClaimValue {
    /// Plain decoded string
    Text(String),
    /// JSON object claim (`user`, `receiver`, `chat`)
    Json {
        /// Decoded text as transmitted
        raw: String,
        /// Parsed object
        value: Value,
    },
}

impl ClaimValue {
    /// Text that participates in the data-check string.
    pub fn signed_text(&self) -> &str {
        match self {
            ClaimValue::Text(text) => text,
            ClaimValue::Json { raw, .. } => raw,
        }
    }

    /// Returns the string if this is a plain text claim.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ClaimValue::Text(text) => Some(text),
            ClaimValue::Json { .. } => None,
        }
    }

    /// Returns the parsed object if this is a JSON claim.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ClaimValue::Text(_) => None,
            ClaimValue::Json { value, .. } => Some(value),
        }
    }

    /// Whether the value was decoded as JSON.
    pub fn is_json(&self) -> bool {
        matches!(self, ClaimValue::Json { .. })
    }

    fn to_json(&self) -> Value {
        match self {
            ClaimValue::Text(text) => Value::String(text.clone()),
            ClaimValue::Json { value, .. } => value.clone(),
        }
    }
}

/// Decoded claims of one payload, in first-seen order.
///
/// A repeated key replaces the earlier value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Claims {
    entries: Vec<(String, ClaimValue)>,
    /// Key to position in `entries`
    index: HashMap<String, usize>,
}

impl Claims {
    /// Creates an empty claim set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a claim, replacing any previous value for the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: ClaimValue) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    /// Removes a claim and returns its value.
    pub fn remove(&mut self, key: &str) -> Option<ClaimValue> {
        let position = self.index.remove(key)?;
        let (_, value) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(value)
    }

    /// Looks up a claim.
    pub fn get(&self, key: &str) -> Option<&ClaimValue> {
        self.index
            .get(key)
            .map(|&position| &self.entries[position].1)
    }

    /// Looks up a plain text claim.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(ClaimValue::as_text)
    }

    /// Looks up a JSON claim.
    pub fn json(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(ClaimValue::as_json)
    }

    /// Whether a claim is present.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Raw `auth_date` claim.
    pub fn auth_date(&self) -> Option<&str> {
        self.text("auth_date")
    }

    /// `auth_date` parsed as a Unix timestamp, if present and numeric.
    pub fn auth_timestamp(&self) -> Option<i64> {
        self.auth_date().and_then(|raw| raw.trim().parse().ok())
    }

    /// Typed view of the `user` claim.
    pub fn user(&self) -> Option<SessionUser> {
        let value = self.json("user")?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Iterates over claims in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ClaimValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of claims.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no claims.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders the claims as a JSON object.
    ///
    /// JSON claims appear as nested objects, text claims as strings.
    pub fn to_json(&self) -> Value {
        let map = self
            .entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect();
        Value::Object(map)
    }
}

impl<'a> IntoIterator for &'a Claims {
    type Item = (&'a str, &'a ClaimValue);
    type IntoIter = Box<dyn Iterator<Item = (&'a str, &'a ClaimValue)> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// The acting platform user carried in the `user` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Platform user identifier
    pub id: i64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
    #[serde(default)]
    pub is_premium: Option<bool>,
    #[serde(default)]
    pub allows_write_to_pm: Option<bool>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

impl SessionUser {
    /// Human-readable name: "First Last", falling back to `@username`, then the id.
    pub fn display_name(&self) -> String {
        let full = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full.is_empty() {
            return full;
        }
        match &self.username {
            Some(username) if !username.is_empty() => format!("@{}", username),
            _ => self.id.to_string(),
        }
    }
}

/// Parses a form-urlencoded payload into claims.
///
/// Never fails: a value under a JSON key that does not decode is kept as text
/// and a warning is logged.
pub fn parse_payload(payload: &str) -> Claims {
    let mut claims = Claims::new();
    for (key, value) in url::form_urlencoded::parse(payload.as_bytes()) {
        let key = key.into_owned();
        let value = value.into_owned();
        let claim = if is_json_candidate(&key, &value) {
            decode_json_claim(&key, value)
        } else {
            ClaimValue::Text(value)
        };
        claims.insert(key, claim);
    }
    claims
}

fn is_json_candidate(key: &str, value: &str) -> bool {
    JSON_CLAIM_KEYS.contains(&key) && value.starts_with('{') && value.ends_with('}')
}

fn decode_json_claim(key: &str, raw: String) -> ClaimValue {
    match serde_json::from_str::<Value>(&raw) {
        Ok(value) => ClaimValue::Json { raw, value },
        Err(e) => {
            let preview: String = raw.chars().take(LOG_PREVIEW_CHARS).collect();
            warn!(
                key = key,
                error = %e,
                preview = %preview,
                "Failed to decode JSON claim, keeping raw text"
            );
            ClaimValue::Text(raw)
        }
    }
}
