// src/jobs/handlers/extract.rs

use axum::{
    extract::{multipart::MultipartRejection, Extension, Multipart},
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use crate::candidates::validators::UploadValidator;
use crate::common::upload::MultipartForm;
use crate::common::{ApiError, AppState, Validator};
use crate::jobs::extract::{extract_jd_details, JdDetails};
use crate::services::pdf::extract_text_blocking;

/// POST /jobs/extract - Pre-fill a job from an uploaded JD document (not stored)
pub async fn extract_job_description(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<JdDetails>, ApiError> {
    let mut form = MultipartForm::read(multipart?).await?;
    let file = form
        .take_file("jd")
        .ok_or_else(|| ApiError::BadRequest("No job description file provided".to_string()))?;

    UploadValidator {
        max_bytes: state.config.max_upload_bytes,
    }
    .validate(&file)
    .into_result()?;

    let text = extract_text_blocking(file.filename.clone(), file.bytes.clone()).await?;
    let details = extract_jd_details(&text);

    info!(
        filename = %file.filename,
        title = %details.title,
        required = details.required_skills.len(),
        "Job description extracted"
    );

    Ok(Json(details))
}
