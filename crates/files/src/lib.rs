//! Lean Avatar Files
//!
//! Renames resident avatar images to a salted hash of their original filename, so the
//! public avatar directory does not expose resident names.
//!
//! ## Hashing Model
//!
//! - A fresh 16-byte secret is drawn for every run and stored as lowercase hex
//! - The hashed name is `sha256(secret_hex ‖ original_filename)` in hex, plus `.png`
//! - Every non-empty `avatar_url` is rewritten to `/avatars/<hashed name>`
//! - Image files that are absent locally are skipped; their URL is still rewritten
//!
//! ```text
//! public/avatars/
//! ├── ada-okafor.png          # before
//! └── 3f1c9e…b04a.png         # after
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use lean_files::hash_avatars;
//! use std::path::Path;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = hash_avatars(
//!     Path::new("demo-data/residents/data-plain.json"),
//!     Path::new("public/avatars"),
//!     Path::new("avatar-secret.txt"),
//!     &mut rand::thread_rng(),
//! )?;
//! println!("rewrote {} avatar urls", report.rewritten);
//! # Ok(())
//! # }
//! ```

mod avatars;
mod constants;

pub use avatars::{hash_avatars, AvatarHasher, AvatarReport, AvatarSecret};
pub use constants::{
    AVATAR_URL_PREFIX, DEFAULT_AVATARS_DIR, DEFAULT_SECRET_FILE, HASHED_EXTENSION, SECRET_BYTES,
};

/// Errors that can occur while hashing avatars
#[derive(Debug, thiserror::Error)]
pub enum AvatarError {
    /// I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Residents file could not be parsed or rendered
    #[error("Residents JSON error: {0}")]
    Json(#[from] fhir::FhirError),

    /// Secret is not 32 lowercase hex characters
    #[error("Invalid avatar secret: {0}")]
    InvalidSecret(String),
}

pub type AvatarResult<T> = std::result::Result<T, AvatarError>;
