use crate::constants::{API_KEY_VAR, API_SECRET_VAR, CLOUD_NAME_VAR};
use crate::{UploadError, UploadResult};
use std::fmt;

/// Cloudinary account credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct CloudinaryCredentials {
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryCredentials {
    pub fn new(cloud_name: &str, api_key: &str, api_secret: &str) -> UploadResult<Self> {
        Self::from_env_values(
            Some(cloud_name.to_string()),
            Some(api_key.to_string()),
            Some(api_secret.to_string()),
        )
    }

    /// Build credentials from the values of `CLOUDINARY_CLOUD_NAME`, `CLOUDINARY_API_KEY`
    /// and `CLOUDINARY_API_SECRET`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::MissingCredentials`] naming every variable that is unset or
    /// blank.
    pub fn from_env_values(
        cloud_name: Option<String>,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> UploadResult<Self> {
        let mut missing = Vec::new();
        let mut take = |value: Option<String>, var: &'static str| {
            let value = value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());
            if value.is_none() {
                missing.push(var);
            }
            value.unwrap_or_default()
        };

        let cloud_name = take(cloud_name, CLOUD_NAME_VAR);
        let api_key = take(api_key, API_KEY_VAR);
        let api_secret = take(api_secret, API_SECRET_VAR);

        if !missing.is_empty() {
            return Err(UploadError::MissingCredentials(missing));
        }

        Ok(Self {
            cloud_name,
            api_key,
            api_secret,
        })
    }

    pub fn cloud_name(&self) -> &str {
        &self.cloud_name
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for CloudinaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudinaryCredentials")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &self.api_key)
            .field("api_secret", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_every_missing_variable() {
        let err =
            CloudinaryCredentials::from_env_values(Some("demo".into()), None, Some("  ".into()))
                .unwrap_err();
        match err {
            UploadError::MissingCredentials(vars) => {
                assert_eq!(vars, vec![API_KEY_VAR, API_SECRET_VAR]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn trims_values_and_redacts_secret() {
        let creds = CloudinaryCredentials::new(" demo ", "123", "shh").unwrap();
        assert_eq!(creds.cloud_name(), "demo");
        assert_eq!(creds.api_secret(), "shh");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("shh"));
        assert!(debug.contains("<redacted>"));
    }
}
