//! Lean Media Upload
//!
//! Walks a local folder and uploads every file it contains to a Cloudinary folder.
//!
//! - Each file's `public_id` is its path relative to the local root, without extension,
//!   joined with `/` (e.g. `staff/ada` for `staff/ada.png`)
//! - Uploads use resource type `auto` and are signed with SHA-256
//! - A failed file is recorded in the [`UploadSummary`]; the batch carries on
//! - Missing credentials or a missing local folder abort before any upload
//!
//! The HTTP client sits behind the [`MediaUploader`] trait so the batch logic can be driven
//! by another uploader.

mod bulk;
mod constants;
mod credentials;
mod items;
mod signing;
mod uploader;

pub use bulk::{bulk_upload, UploadFailure, UploadSummary};
pub use constants::{API_KEY_VAR, API_SECRET_VAR, CLOUD_NAME_VAR};
pub use credentials::CloudinaryCredentials;
pub use items::{collect_upload_items, public_id_for, UploadItem};
pub use signing::sign_params;
pub use uploader::{CloudinaryUploader, MediaUploader, UploadedMedia};

use std::path::PathBuf;

/// Errors that can occur while uploading media
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// One or more credential variables are unset or blank
    #[error("Cloudinary credentials are not set: {}", .0.join(", "))]
    MissingCredentials(Vec<&'static str>),

    #[error("Local folder does not exist: {}", .0.display())]
    LocalFolderNotFound(PathBuf),

    /// Directory traversal failed
    #[error("Failed to walk local folder: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Cloudinary answered with a non-success status
    #[error("Upload rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

pub type UploadResult<T> = std::result::Result<T, UploadError>;
