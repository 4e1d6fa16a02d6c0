use crate::items::collect_upload_items;
use crate::uploader::{MediaUploader, UploadedMedia};
use crate::UploadResult;
use std::path::{Path, PathBuf};

/// A file that could not be uploaded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of one bulk upload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UploadSummary {
    pub uploaded: Vec<UploadedMedia>,
    pub failed: Vec<UploadFailure>,
}

impl UploadSummary {
    /// Files processed, successful or not.
    pub fn total(&self) -> usize {
        self.uploaded.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Upload every file under `local_root` into `remote_folder`.
///
/// A failure on one file is recorded and the batch continues.
///
/// # Errors
///
/// Returns an error only if the local folder cannot be listed; see
/// [`collect_upload_items`].
pub fn bulk_upload<U: MediaUploader + ?Sized>(
    uploader: &U,
    local_root: &Path,
    remote_folder: &str,
) -> UploadResult<UploadSummary> {
    let items = collect_upload_items(local_root)?;
    tracing::info!(
        "starting bulk upload of {} files from {} to {}",
        items.len(),
        local_root.display(),
        remote_folder
    );

    let mut summary = UploadSummary::default();
    for item in &items {
        match uploader.upload(item, remote_folder) {
            Ok(media) => {
                tracing::info!("uploaded {} as {}", item.path.display(), media.secure_url);
                summary.uploaded.push(media);
            }
            Err(e) => {
                tracing::warn!("failed to upload {}: {}", item.path.display(), e);
                summary.failed.push(UploadFailure {
                    path: item.path.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        total = summary.total(),
        uploaded = summary.uploaded.len(),
        failed = summary.failed.len(),
        "bulk upload finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::UploadItem;
    use crate::UploadError;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    /// Rejects any item whose public id contains `bad`.
    #[derive(Default)]
    struct FakeUploader {
        calls: RefCell<Vec<(String, String)>>,
    }

    impl MediaUploader for FakeUploader {
        fn upload(&self, item: &UploadItem, folder: &str) -> UploadResult<UploadedMedia> {
            self.calls
                .borrow_mut()
                .push((item.public_id.clone(), folder.to_string()));
            if item.public_id.contains("bad") {
                return Err(UploadError::Rejected {
                    status: 400,
                    message: "Invalid image file".into(),
                });
            }
            Ok(UploadedMedia {
                public_id: format!("{folder}/{}", item.public_id),
                secure_url: format!("https://res.example/{folder}/{}", item.public_id),
            })
        }
    }

    #[test]
    fn failures_are_collected_without_aborting() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("staff")).unwrap();
        fs::write(dir.path().join("ada.png"), b"a").unwrap();
        fs::write(dir.path().join("bad.png"), b"b").unwrap();
        fs::write(dir.path().join("staff/chidi.png"), b"c").unwrap();

        let uploader = FakeUploader::default();
        let summary = bulk_upload(&uploader, dir.path(), "lean/avatars").unwrap();

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.uploaded.len(), 2);
        assert!(!summary.all_succeeded());
        assert_eq!(summary.failed.len(), 1);
        assert!(summary.failed[0].path.ends_with("bad.png"));
        assert!(summary.failed[0].error.contains("Invalid image file"));
        assert_eq!(summary.uploaded[1].public_id, "lean/avatars/staff/chidi");

        let calls = uploader.calls.borrow();
        assert_eq!(calls.len(), 3);
        assert!(calls.iter().all(|(_, folder)| folder == "lean/avatars"));
    }

    #[test]
    fn empty_folder_uploads_nothing() {
        let dir = TempDir::new().unwrap();
        let summary = bulk_upload(&FakeUploader::default(), dir.path(), "f").unwrap();
        assert_eq!(summary.total(), 0);
        assert!(summary.all_succeeded());
    }

    #[test]
    fn missing_folder_aborts_before_uploading() {
        let dir = TempDir::new().unwrap();
        let uploader = FakeUploader::default();
        let result = bulk_upload(&uploader, &dir.path().join("nope"), "f");
        assert!(matches!(result, Err(UploadError::LocalFolderNotFound(_))));
        assert!(uploader.calls.borrow().is_empty());
    }
}
