//! Record identifiers for generated demo data.
//!
//! Every generated record carries an opaque `id`. Freshly generated identifiers use the
//! *canonical* UUID representation: **32 lowercase hexadecimal characters** (no hyphens),
//! the same value you would get from `Uuid::new_v4().simple().to_string()`.
//!
//! Some records are per-resident singletons (addresses, identifiers). Those use a
//! *derived* identifier of the form `<prefix>_<resident_id>` so that re-running the
//! generator addresses the same document.
//!
//! Identifiers are drawn from caller supplied random bytes ([`RecordId::from_random_bytes`])
//! so that a seeded generator produces a reproducible dataset.

mod service;

pub use service::{RecordId, Uuid};

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum UuidError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type UuidResult<T> = Result<T, UuidError>;
