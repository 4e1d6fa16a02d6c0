use crate::{UploadError, UploadResult};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// One local file and the public id it is uploaded under.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadItem {
    pub path: PathBuf,
    pub public_id: String,
}

/// Every regular file under `local_root`, sorted by path.
///
/// # Errors
///
/// - [`UploadError::LocalFolderNotFound`] if `local_root` is not a directory.
/// - [`UploadError::Walk`] if a directory entry cannot be read.
pub fn collect_upload_items(local_root: &Path) -> UploadResult<Vec<UploadItem>> {
    if !local_root.is_dir() {
        return Err(UploadError::LocalFolderNotFound(local_root.to_path_buf()));
    }

    let mut items = Vec::new();
    for entry in WalkDir::new(local_root).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let relative = match entry.path().strip_prefix(local_root) {
            Ok(r) if !r.as_os_str().is_empty() => r,
            _ => continue,
        };
        items.push(UploadItem {
            public_id: public_id_for(relative),
            path: entry.into_path(),
        });
    }

    Ok(items)
}

/// Relative path without its extension, segments joined with `/`.
pub fn public_id_for(relative: &Path) -> String {
    let stem = relative.with_extension("");
    stem.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn public_ids_strip_extension_and_use_slashes() {
        assert_eq!(public_id_for(Path::new("ada.png")), "ada");
        assert_eq!(public_id_for(&Path::new("staff").join("bola.jpeg")), "staff/bola");
        assert_eq!(public_id_for(Path::new("README")), "README");
        assert_eq!(public_id_for(Path::new("archive.tar.gz")), "archive.tar");
    }

    #[test]
    fn collects_nested_files_only() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("staff/night")).unwrap();
        fs::write(dir.path().join("ada.png"), b"a").unwrap();
        fs::write(dir.path().join("staff/bola.jpg"), b"b").unwrap();
        fs::write(dir.path().join("staff/night/chidi.webp"), b"c").unwrap();

        let items = collect_upload_items(dir.path()).unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.public_id.as_str()).collect();
        assert_eq!(ids, vec!["ada", "staff/bola", "staff/night/chidi"]);
        assert!(items.iter().all(|i| i.path.is_file()));
    }

    #[test]
    fn missing_folder_is_reported() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("avatars");
        assert!(matches!(
            collect_upload_items(&missing),
            Err(UploadError::LocalFolderNotFound(p)) if p == missing
        ));
    }
}
