// Multipart form reading shared by the upload endpoints

use axum::extract::Multipart;
use bytes::Bytes;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use super::error::ApiError;
use super::helpers::safe_filename;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Bytes,
}

/// All parts of a multipart body: file parts by field name, plus text fields
#[derive(Debug, Default)]
pub struct MultipartForm {
    files: HashMap<String, UploadedFile>,
    fields: HashMap<String, String>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid file: {}", e)))?;
                    debug!(field = %name, filename = %filename, size = bytes.len(), "Received file part");
                    form.files.insert(name, UploadedFile { filename, bytes });
                }
                None => {
                    let value = field
                        .text()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("Invalid field {}: {}", name, e)))?;
                    form.fields.insert(name, value);
                }
            }
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<UploadedFile> {
        self.files.remove(name)
    }

    /// Text field, trimmed; `None` when missing or blank
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Write an upload under `dir` with a sanitized unique name; returns the stored name
pub async fn store_upload(dir: &Path, prefix: &str, file: &UploadedFile) -> Result<String, ApiError> {
    let stored_name = safe_filename(prefix, &file.filename);
    let path = dir.join(&stored_name);

    tokio::fs::write(&path, &file.bytes).await.map_err(|e| {
        error!(error = %e, path = %path.display(), "Failed to save upload");
        ApiError::InternalServer("Failed to save uploaded file".to_string())
    })?;

    Ok(stored_name)
}

/// Best-effort cleanup of a stored upload after a later stage failed
pub async fn discard_upload(dir: &Path, stored_name: &str) {
    let path: PathBuf = dir.join(stored_name);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        warn!(error = %e, path = %path.display(), "Failed to remove orphaned upload");
    }
}
