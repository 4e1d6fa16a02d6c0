//! Avatar hashing implementation
//!
//! [`AvatarHasher`] rewrites resident records in memory and renames the matching image
//! files; [`hash_avatars`] wraps it with the residents-file and secret-file I/O.

use crate::constants::{AVATAR_URL_PREFIX, HASHED_EXTENSION, SECRET_BYTES};
use crate::{AvatarError, AvatarResult};
use fhir::Resident;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-run salt, held as lowercase hex.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AvatarSecret(String);

impl AvatarSecret {
    /// Draw a fresh secret of [`SECRET_BYTES`] random bytes.
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; SECRET_BYTES];
        rng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Parse a previously stored secret.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::InvalidSecret`] unless the input is 32 lowercase hex characters.
    pub fn from_hex(input: &str) -> AvatarResult<Self> {
        let input = input.trim();
        let valid = input.len() == SECRET_BYTES * 2
            && input
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        if !valid {
            return Err(AvatarError::InvalidSecret(format!(
                "expected {} lowercase hex characters",
                SECRET_BYTES * 2
            )));
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `sha256(secret_hex ‖ original_filename)` as hex, plus `.png`.
    pub fn hashed_filename(&self, original_filename: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.0.as_bytes());
        hasher.update(original_filename.as_bytes());
        format!("{}{}", hex::encode(hasher.finalize()), HASHED_EXTENSION)
    }
}

/// Outcome of one hashing pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AvatarReport {
    /// Residents whose `avatar_url` was rewritten
    pub rewritten: usize,
    /// Image files renamed on disk
    pub renamed: usize,
    /// Original filenames with no file in the avatars directory
    pub missing: Vec<String>,
}

/// Renames avatars inside one directory using one secret.
#[derive(Debug)]
pub struct AvatarHasher {
    avatars_dir: PathBuf,
    secret: AvatarSecret,
}

impl AvatarHasher {
    pub fn new(avatars_dir: &Path, secret: AvatarSecret) -> Self {
        Self {
            avatars_dir: avatars_dir.to_path_buf(),
            secret,
        }
    }

    pub fn secret(&self) -> &AvatarSecret {
        &self.secret
    }

    /// Rewrite every non-empty `avatar_url` and rename the matching local files.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::Io`] if an existing file cannot be renamed.
    pub fn hash_residents(&self, residents: &mut [Resident]) -> AvatarResult<AvatarReport> {
        let mut report = AvatarReport::default();

        for resident in residents.iter_mut() {
            let Some(original) = resident
                .data
                .avatar_url
                .as_deref()
                .filter(|url| !url.is_empty())
                .map(basename)
            else {
                continue;
            };

            let hashed = self.secret.hashed_filename(original);
            let source = self.avatars_dir.join(original);
            if source.is_file() {
                fs::rename(&source, self.avatars_dir.join(&hashed)).map_err(|e| {
                    AvatarError::Io(std::io::Error::new(
                        e.kind(),
                        format!("Failed to rename {}: {}", source.display(), e),
                    ))
                })?;
                report.renamed += 1;
            } else {
                tracing::warn!(
                    resident_id = %resident.id,
                    "avatar file {} not found",
                    source.display()
                );
                report.missing.push(original.to_string());
            }

            resident.data.avatar_url = Some(format!("{AVATAR_URL_PREFIX}/{hashed}"));
            report.rewritten += 1;
        }

        Ok(report)
    }
}

/// Hash every avatar referenced by the residents file.
///
/// Draws a new secret, writes it to `secret_file`, renames files under `avatars_dir`, and
/// writes the rewritten residents back to `residents_file` as 2-space pretty JSON.
///
/// # Errors
///
/// - [`AvatarError::Io`] if a file cannot be read, written or renamed.
/// - [`AvatarError::Json`] if the residents file is not a valid resident array.
pub fn hash_avatars<R: RngCore + ?Sized>(
    residents_file: &Path,
    avatars_dir: &Path,
    secret_file: &Path,
    rng: &mut R,
) -> AvatarResult<AvatarReport> {
    let secret = AvatarSecret::generate(rng);
    fs::write(secret_file, secret.as_str()).map_err(|e| {
        AvatarError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write secret file {}: {}", secret_file.display(), e),
        ))
    })?;

    let text = fs::read_to_string(residents_file).map_err(|e| {
        AvatarError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read residents file {}: {}", residents_file.display(), e),
        ))
    })?;
    let mut residents = Resident::parse_list(&text)?;

    let report = AvatarHasher::new(avatars_dir, secret).hash_residents(&mut residents)?;

    fs::write(residents_file, Resident::render_list(&residents)?).map_err(|e| {
        AvatarError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to write residents file {}: {}", residents_file.display(), e),
        ))
    })?;

    tracing::info!(
        rewritten = report.rewritten,
        renamed = report.renamed,
        missing = report.missing.len(),
        "hashed avatars in {}",
        residents_file.display()
    );
    Ok(report)
}

/// Final path segment of a URL or path; the whole input when there is no `/`.
fn basename(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn secret() -> AvatarSecret {
        AvatarSecret::from_hex("00112233445566778899aabbccddeeff").unwrap()
    }

    #[test]
    fn hashed_filename_is_salted_sha256() {
        let secret = secret();
        let name = secret.hashed_filename("ada.png");

        let mut hasher = Sha256::new();
        hasher.update(b"00112233445566778899aabbccddeeffada.png");
        assert_eq!(name, format!("{}.png", hex::encode(hasher.finalize())));
        assert_eq!(name, secret.hashed_filename("ada.png"));
        assert_ne!(name, secret.hashed_filename("bola.png"));
    }

    #[test]
    fn generated_secrets_are_valid_hex() {
        let mut rng = StdRng::seed_from_u64(1);
        let secret = AvatarSecret::generate(&mut rng);
        assert_eq!(secret.as_str().len(), 32);
        assert_eq!(AvatarSecret::from_hex(secret.as_str()).unwrap(), secret);
    }

    #[test]
    fn rejects_malformed_secrets() {
        for input in [
            "",
            "abc",
            "00112233445566778899AABBCCDDEEFF",
            "zz112233445566778899aabbccddeeff",
        ] {
            assert!(matches!(
                AvatarSecret::from_hex(input),
                Err(AvatarError::InvalidSecret(_))
            ));
        }
    }

    #[test]
    fn basename_takes_last_segment() {
        assert_eq!(basename("/avatars/ada.png"), "ada.png");
        assert_eq!(basename("ada.png"), "ada.png");
    }

    #[test]
    fn renames_present_files_and_rewrites_every_url() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ada.png"), b"png").unwrap();

        let mut residents = Resident::parse_list(
            r#"[
                {"id": "r1", "data": {"avatar_url": "/avatars/ada.png"}},
                {"id": "r2", "data": {"avatar_url": "/avatars/bola.png"}},
                {"id": "r3", "data": {"avatar_url": ""}},
                {"id": "r4", "data": {}}
            ]"#,
        )
        .unwrap();

        let hasher = AvatarHasher::new(dir.path(), secret());
        let report = hasher.hash_residents(&mut residents).unwrap();

        let ada = secret().hashed_filename("ada.png");
        assert_eq!(report.rewritten, 2);
        assert_eq!(report.renamed, 1);
        assert_eq!(report.missing, vec!["bola.png".to_string()]);
        assert!(dir.path().join(&ada).exists());
        assert!(!dir.path().join("ada.png").exists());
        assert_eq!(
            residents[0].data.avatar_url.as_deref(),
            Some(format!("/avatars/{ada}").as_str())
        );
        assert_eq!(residents[2].data.avatar_url.as_deref(), Some(""));
        assert_eq!(residents[3].data.avatar_url, None);
    }

    #[test]
    fn hash_avatars_persists_secret_and_residents() {
        let dir = TempDir::new().unwrap();
        let avatars = dir.path().join("avatars");
        fs::create_dir(&avatars).unwrap();
        fs::write(avatars.join("ada.png"), b"png").unwrap();

        let residents_file = dir.path().join("residents.json");
        fs::write(
            &residents_file,
            concat!(
                r#"[{"id": "r1", "data": {"resident_name": "Ada", "#,
                r#""avatar_url": "/avatars/ada.png", "room": 4}}]"#
            ),
        )
        .unwrap();
        let secret_file = dir.path().join("avatar-secret.txt");

        let mut rng = StdRng::seed_from_u64(9);
        let report = hash_avatars(&residents_file, &avatars, &secret_file, &mut rng).unwrap();
        assert_eq!(report.renamed, 1);

        let stored = AvatarSecret::from_hex(&fs::read_to_string(&secret_file).unwrap()).unwrap();
        let hashed = stored.hashed_filename("ada.png");
        assert!(avatars.join(&hashed).exists());

        let text = fs::read_to_string(&residents_file).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value[0]["data"]["avatar_url"], format!("/avatars/{hashed}"));
        assert_eq!(value[0]["data"]["room"], 4);
        assert!(text.contains("\n  {"));
    }

    #[test]
    fn missing_residents_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let result = hash_avatars(
            &dir.path().join("nope.json"),
            dir.path(),
            &dir.path().join("secret.txt"),
            &mut rng,
        );
        assert!(matches!(result, Err(AvatarError::Io(_))));
    }
}
