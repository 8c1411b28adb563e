// src/matching/handlers.rs

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::QueryRejection,
        Extension, Multipart, Path, Query,
    },
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use super::models::{MatchQuery, MatchResultResponse};
use super::pipeline::{self, SingleMatchRequest, DEFAULT_TOP_K};
use super::store;
use super::validators::{MatchQueryValidator, SingleMatchFields, SingleMatchFieldsValidator};
use crate::candidates::validators::UploadValidator;
use crate::common::upload::MultipartForm;
use crate::common::{ApiError, AppState, Validator};
use crate::jobs::store as job_store;

/// POST /match - Evaluate one resume against one job description
pub async fn match_single(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MatchResultResponse>), ApiError> {
    let mut form = MultipartForm::read(multipart?).await?;
    let resume = form
        .take_file("resume")
        .ok_or_else(|| ApiError::BadRequest("No resume file provided".to_string()))?;

    UploadValidator {
        max_bytes: state.config.max_upload_bytes,
    }
    .validate(&resume)
    .into_result()?;

    let fields = SingleMatchFields {
        jd_text: form.text("jd_text"),
        candidate_name: form.text("candidate_name"),
        title: form.text("title"),
    };
    SingleMatchFieldsValidator.validate(&fields).into_result()?;

    let request = SingleMatchRequest {
        jd_text: fields.jd_text.unwrap_or_default().to_string(),
        candidate_name: fields.candidate_name.map(str::to_string),
        title: fields.title.map(str::to_string),
        resume,
    };

    let result = pipeline::evaluate_single(&state, request).await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /match/:job_id?top_k=5 - Rank stored candidates for a job
pub async fn match_candidates(
    Extension(state): Extension<Arc<AppState>>,
    Path(job_id): Path<String>,
    query: Result<Query<MatchQuery>, QueryRejection>,
) -> Result<Json<Vec<MatchResultResponse>>, ApiError> {
    let Query(query) = query?;
    MatchQueryValidator.validate(&query).into_result()?;
    let top_k = query.top_k.unwrap_or(DEFAULT_TOP_K) as usize;

    let job = job_store::get_job(&state.db, &job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job_id)))?;

    let results = pipeline::rank_candidates(&state, &job, top_k).await?;

    info!(job_id = %job_id, returned = results.len(), "Candidates ranked");
    Ok(Json(results))
}

/// GET /results/:job_id - Stored results for a job, newest first
pub async fn list_results(
    Extension(state): Extension<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<Vec<MatchResultResponse>>, ApiError> {
    if job_store::get_job(&state.db, &job_id).await?.is_none() {
        return Err(ApiError::NotFound(format!("Job {} not found", job_id)));
    }

    let rows = store::list_match_results(&state.db, &job_id).await?;
    Ok(Json(rows.into_iter().map(MatchResultResponse::from).collect()))
}

/// GET /results/:job_id/:candidate_id - Latest stored result for the pair
pub async fn get_result(
    Extension(state): Extension<Arc<AppState>>,
    Path((job_id, candidate_id)): Path<(String, String)>,
) -> Result<Json<MatchResultResponse>, ApiError> {
    let row = store::get_match_result(&state.db, &candidate_id, &job_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!(
                "No match result for candidate {} and job {}",
                candidate_id, job_id
            ))
        })?;

    Ok(Json(MatchResultResponse::from(row)))
}
