//! Token claims and the pure decoder that extracts them.
//!
//! Tokens are three dot-separated segments; only the middle one is read.
//! Signatures are never verified on the client; the backend remains the
//! authority and rejects forged tokens with 401.

#[cfg(test)]
#[path = "claims_test.rs"]
mod claims_test;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Deserializer};

/// URL-safe decoder that accepts the segment with or without `=` padding and
/// ignores stray low bits in the final character.
const SEGMENT_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Role asserted by a token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Teacher,
    Student,
    /// A role string this client does not know about.
    Other(String),
}

impl Role {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "admin" => Self::Admin,
            "teacher" => Self::Teacher,
            "student" => Self::Student,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
            Self::Other(raw) => raw,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Decoded token payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Claims {
    pub role: Role,
    /// Subject identifier. Accepted as a JSON string or number.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
}

impl Claims {
    /// Whether the token expired strictly before `now_secs`.
    #[must_use]
    pub fn is_expired_at(&self, now_secs: i64) -> bool {
        self.exp < now_secs
    }
}

/// Decode the claims carried in `token`.
///
/// Returns `None` for a missing middle segment, invalid base64url, or a
/// payload that is not a JSON object with `role`, `id` and `exp`.
#[must_use]
pub fn decode(token: &str) -> Option<Claims> {
    let segment = token.split('.').nth(1)?;
    if segment.is_empty() {
        return None;
    }
    // Standard-alphabet segments are accepted too.
    let segment = segment.replace('+', "-").replace('/', "_");
    let bytes = match SEGMENT_ENGINE.decode(&segment) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = %e, "token payload is not base64");
            return None;
        }
    };
    match serde_json::from_slice::<Claims>(&bytes) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!(error = %e, "token payload is not a claims object");
            None
        }
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
