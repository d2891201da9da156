// src/handlers/forms.rs
// DOCUMENTATION: multipart/form-data reader shared by student and avatar routes
// PURPOSE: Split a multipart body into text fields and at most one file part

use crate::errors::ApiError;
use crate::services::FileUpload;
use actix_multipart::Multipart;
use futures::StreamExt;

/// Largest accepted file part
pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

/// Largest accepted body, all parts together
pub const MAX_FORM_BYTES: usize = 6 * 1024 * 1024;

/// Text parts in arrival order plus the first non-empty file part
#[derive(Debug, Default)]
pub struct FormParts {
    pub texts: Vec<(String, String)>,
    pub file: Option<FileUpload>,
}

/// Read the whole body. Parts named in `file_fields` are collected as files;
/// an empty file part (no file chosen in a browser form) counts as absent.
pub async fn read_multipart(payload: Multipart, file_fields: &[&str]) -> Result<FormParts, ApiError> {
    read_multipart_limited(payload, file_fields, MAX_FORM_BYTES).await
}

/// Like `read_multipart`, with `max_total` bytes allowed across all parts
pub async fn read_multipart_limited(
    mut payload: Multipart,
    file_fields: &[&str],
    max_total: usize,
) -> Result<FormParts, ApiError> {
    let mut parts = FormParts::default();
    let mut total = 0usize;

    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| ApiError::Validation(format!("Invalid form data: {}", e)))?;

        let name = field.name().unwrap_or_default().to_string();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|m| m.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk =
                chunk.map_err(|e| ApiError::Validation(format!("Invalid form data: {}", e)))?;
            total += chunk.len();
            if total > max_total {
                return Err(ApiError::Validation("Form data too large".to_string()));
            }
            if bytes.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(ApiError::Validation("File too large".to_string()));
            }
            bytes.extend_from_slice(&chunk);
        }

        if file_fields.contains(&name.as_str()) {
            if parts.file.is_none() && !bytes.is_empty() {
                parts.file = Some(FileUpload {
                    filename: filename.unwrap_or_else(|| name.clone()),
                    content_type,
                    bytes,
                });
            }
            continue;
        }

        let value = String::from_utf8(bytes)
            .map_err(|_| ApiError::Validation(format!("Field {} is not valid UTF-8", name)))?;
        parts.texts.push((name, value));
    }

    Ok(parts)
}
