// src/candidates/handlers/resumes.rs

use crate::candidates::ingest::prepare_candidate;
use crate::candidates::models::{CandidateResponse, CandidateSummary};
use crate::candidates::store;
use crate::candidates::validators::{CandidateNameValidator, UploadValidator};
use crate::common::upload::{discard_upload, store_upload, MultipartForm};
use crate::common::{ApiError, AppState, Validator};
use axum::{
    extract::{multipart::MultipartRejection, Extension, Multipart, Path},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use std::sync::Arc;
use tracing::{error, info};

/// POST /candidates/upload - Upload and parse a resume
pub async fn upload_resume(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut form = MultipartForm::read(multipart?).await?;
    let file = form
        .take_file("resume")
        .ok_or_else(|| ApiError::BadRequest("No resume file provided".to_string()))?;

    UploadValidator {
        max_bytes: state.config.max_upload_bytes,
    }
    .validate(&file)
    .into_result()?;

    let candidate_name = form.text("candidate_name");
    CandidateNameValidator.validate(&candidate_name).into_result()?;

    let mut candidate = prepare_candidate(&state, &file, candidate_name).await?;

    let resumes_dir = &state.config.resumes_dir;
    let stored_name = store_upload(resumes_dir, "resume", &file).await?;
    candidate.filename = Some(stored_name.clone());

    let persisted = async {
        let mut tx = state.db.begin().await?;
        let id = store::insert_candidate(&mut tx, &candidate).await?;
        tx.commit().await?;
        Ok::<String, sqlx::Error>(id)
    }
    .await;

    let candidate_id = match persisted {
        Ok(id) => id,
        Err(e) => {
            error!(error = %e, "Failed to store candidate");
            discard_upload(resumes_dir, &stored_name).await;
            return Err(e.into());
        }
    };

    let row = store::get_candidate(&state.db, &candidate_id)
        .await?
        .ok_or_else(|| ApiError::InternalServer("Stored candidate not found".to_string()))?;

    info!(candidate_id = %candidate_id, filename = %stored_name, "Resume uploaded successfully");

    Ok((StatusCode::CREATED, Json(CandidateResponse::from(row))))
}

/// GET /candidates - All candidates, newest first
pub async fn list_candidates(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<CandidateSummary>>, ApiError> {
    let candidates = store::list_candidates(&state.db).await?;
    Ok(Json(candidates.into_iter().map(CandidateSummary::from).collect()))
}

/// GET /candidates/:id
pub async fn get_candidate(
    Extension(state): Extension<Arc<AppState>>,
    Path(candidate_id): Path<String>,
) -> Result<Json<CandidateResponse>, ApiError> {
    let candidate = store::get_candidate(&state.db, &candidate_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Candidate {} not found", candidate_id)))?;

    Ok(Json(CandidateResponse::from(candidate)))
}
