// src/services/image_store.rs
// DOCUMENTATION: Image store client for avatars
// PURPOSE: Upload a binary blob and get back a public URL

use crate::config::CloudinaryCredentials;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::time::Duration;
use thiserror::Error;

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("image store is not configured")]
    NotConfigured,

    #[error("upload request failed: {0}")]
    Request(String),

    #[error("image store rejected upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected image store response: {0}")]
    Parse(String),
}

/// Anything that can take an image and return its public URL
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(&self, file: FileUpload) -> Result<String, UploadError>;
}

/// Upload response fields we care about
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    message: String,
}

/// Cloudinary signed-upload client
/// DOCUMENTATION: Holds credentials parsed from CLOUDINARY_URL;
/// without them every upload fails with `UploadError::NotConfigured`
pub struct CloudinaryClient {
    client: Client,
    credentials: Option<CloudinaryCredentials>,
    folder: String,
    base_url: String,
}

impl CloudinaryClient {
    pub fn new(credentials: Option<CloudinaryCredentials>, folder: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            credentials,
            folder,
            base_url: "https://api.cloudinary.com/v1_1".to_string(),
        }
    }

    /// SHA-256 signature over the sorted signed parameters plus the API secret
    fn sign(params: &[(&str, &str)], api_secret: &str) -> String {
        let mut sorted: Vec<_> = params.to_vec();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let to_sign = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(api_secret.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[async_trait]
impl ImageStore for CloudinaryClient {
    async fn upload(&self, file: FileUpload) -> Result<String, UploadError> {
        let creds = self.credentials.as_ref().ok_or(UploadError::NotConfigured)?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = Self::sign(
            &[("folder", self.folder.as_str()), ("timestamp", timestamp.as_str())],
            &creds.api_secret,
        );

        let mut part = Part::bytes(file.bytes).file_name(file.filename.clone());
        if let Some(ct) = &file.content_type {
            part = part
                .mime_str(ct)
                .map_err(|e| UploadError::Request(format!("invalid content type: {}", e)))?;
        }

        let form = Form::new()
            .part("file", part)
            .text("api_key", creds.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.folder.clone())
            .text("signature", signature)
            .text("signature_algorithm", "sha256");

        let url = format!("{}/{}/image/upload", self.base_url, creds.cloud_name);

        log::debug!("Uploading {} to image store", file.filename);

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                log::error!("Image store request failed: {}", e);
                UploadError::Request(e.to_string())
            })?;

        let status = response.status();
        let body: UploadResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse image store response: {}", e);
            UploadError::Parse(e.to_string())
        })?;

        if !status.is_success() {
            let message = body
                .error
                .map(|e| e.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let secure_url = body
            .secure_url
            .ok_or_else(|| UploadError::Parse("missing secure_url".to_string()))?;

        log::info!("Uploaded {} -> {}", file.filename, secure_url);
        Ok(secure_url)
    }
}
