use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// Cloudinary request signature.
///
/// Parameters are sorted by name, rendered as `key=value`, joined with `&`, followed
/// directly by the API secret, and hashed with SHA-256. The caller leaves out `file`,
/// `api_key`, `resource_type`, `cloud_name` and `signature_algorithm`.
pub fn sign_params(params: &BTreeMap<&str, String>, api_secret: &str) -> String {
    let joined = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
