use crate::constants::{
    CLOUDINARY_API_BASE, REQUEST_TIMEOUT_SECS, RESOURCE_TYPE, SIGNATURE_ALGORITHM,
};
use crate::credentials::CloudinaryCredentials;
use crate::items::UploadItem;
use crate::signing::sign_params;
use crate::{UploadError, UploadResult};
use reqwest::blocking::multipart::Form;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// A file the media host accepted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UploadedMedia {
    pub public_id: String,
    pub secure_url: String,
}

/// Uploads one file into a remote folder.
pub trait MediaUploader {
    fn upload(&self, item: &UploadItem, folder: &str) -> UploadResult<UploadedMedia>;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Signed uploads through the Cloudinary upload API.
#[derive(Debug)]
pub struct CloudinaryUploader {
    client: Client,
    credentials: CloudinaryCredentials,
    endpoint: String,
}

impl CloudinaryUploader {
    /// # Errors
    ///
    /// Returns [`UploadError::Http`] if the HTTP client cannot be built.
    pub fn new(credentials: CloudinaryCredentials) -> UploadResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        let endpoint = format!(
            "{}/{}/{}/upload",
            CLOUDINARY_API_BASE,
            credentials.cloud_name(),
            RESOURCE_TYPE
        );
        Ok(Self {
            client,
            credentials,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Signed form parameters for one upload at `timestamp`.
    fn signed_params(
        &self,
        item: &UploadItem,
        folder: &str,
        timestamp: i64,
    ) -> BTreeMap<&'static str, String> {
        let mut params = BTreeMap::new();
        params.insert("folder", folder.to_string());
        params.insert("public_id", item.public_id.clone());
        params.insert("timestamp", timestamp.to_string());

        let signature = sign_params(&params, self.credentials.api_secret());
        params.insert("signature", signature);
        params.insert("signature_algorithm", SIGNATURE_ALGORITHM.to_string());
        params.insert("api_key", self.credentials.api_key().to_string());
        params
    }
}

impl MediaUploader for CloudinaryUploader {
    fn upload(&self, item: &UploadItem, folder: &str) -> UploadResult<UploadedMedia> {
        let timestamp = chrono::Utc::now().timestamp();
        let mut form = Form::new().file("file", &item.path)?;
        for (key, value) in self.signed_params(item, folder, timestamp) {
            form = form.text(key, value);
        }

        let response = self.client.post(&self.endpoint).multipart(form).send()?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<UploadedMedia>()?);
        }

        let body = response.text().unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .map(|b| b.error.message)
            .unwrap_or(body);
        Err(UploadError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
