//! Internal implementation of record identifiers.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// Identifier of a generated record.
///
/// Either a canonical UUID (32 lowercase hex characters) or a derived
/// `<prefix>_<resident_id>` identifier. Once constructed the value is immutable.
///
/// # Construction
/// - [`RecordId::new`] draws a fresh v4 UUID from the OS generator.
/// - [`RecordId::from_random_bytes`] builds a v4 UUID from caller supplied bytes.
/// - [`RecordId::derived`] builds a per-resident singleton identifier.
/// - [`RecordId::parse`] validates an externally supplied canonical identifier.
///
/// # Serialisation
/// Serialises as a bare string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct RecordId(String);

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordId {
    /// Generates a new identifier in canonical form.
    pub fn new() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    /// Builds a canonical identifier from 16 random bytes.
    ///
    /// The version and variant bits are overwritten so the result is always a valid
    /// RFC 4122 version 4 UUID.
    pub fn from_random_bytes(bytes: [u8; 16]) -> Self {
        let uuid = ::uuid::Builder::from_random_bytes(bytes).into_uuid();
        Self(uuid.simple().to_string())
    }

    /// Builds a derived identifier `<prefix>_<resident_id>`.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if either part is empty or whitespace only.
    pub fn derived(prefix: &str, resident_id: &str) -> UuidResult<Self> {
        if prefix.trim().is_empty() || resident_id.trim().is_empty() {
            return Err(UuidError::InvalidInput(format!(
                "derived identifier needs a prefix and a resident id, got: '{}' / '{}'",
                prefix, resident_id
            )));
        }
        Ok(Self(format!("{}_{}", prefix, resident_id)))
    }

    /// Validates and wraps an identifier that must already be in canonical form.
    ///
    /// Hyphenated or uppercase UUIDs are rejected rather than normalised.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not in canonical form.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if Self::is_canonical(input) {
            return Ok(Self(input.to_owned()));
        }
        Err(UuidError::InvalidInput(format!(
            "UUID must be 32 lowercase hex characters without hyphens, got: '{}'",
            input
        )))
    }

    /// Returns true if `input` is in canonical UUID form.
    ///
    /// This is a purely syntactic check: exactly 32 bytes of `0-9` / `a-f`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 32
            && input
                .bytes()
                .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RecordId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RecordId {
    type Err = UuidError;

    /// Equivalent to [`RecordId::parse`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordId::parse(s)
    }
}
