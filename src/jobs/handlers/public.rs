// src/jobs/handlers/public.rs

use axum::{
    extract::{rejection::JsonRejection, Extension, Path},
    http::StatusCode,
    response::Json,
};
use std::sync::Arc;
use tracing::info;

use crate::common::{ApiError, AppState};
use crate::jobs::ingest::prepare_job;
use crate::jobs::models::*;
use crate::jobs::store;

/// POST /jobs - Create a job with its embedding for later matching
pub async fn create_job(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<CreateJob>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateJobResponse>), ApiError> {
    let Json(payload) = payload?;
    let job = prepare_job(&state, payload).await?;

    let mut tx = state.db.begin().await?;
    let job_id = store::insert_job(&mut tx, &job).await?;
    tx.commit().await?;

    info!(job_id = %job_id, title = %job.title, "Job created");

    Ok((
        StatusCode::CREATED,
        Json(CreateJobResponse {
            job_id,
            title: job.title,
        }),
    ))
}

/// GET /jobs/list - Job ids and titles for pickers
pub async fn list_jobs(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<JobListItem>>, ApiError> {
    let jobs = store::list_jobs(&state.db).await?;
    Ok(Json(jobs.into_iter().map(JobListItem::from).collect()))
}

/// GET /jobs/:id
pub async fn get_job_by_id(
    Extension(state): Extension<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Result<Json<JobResponse>, ApiError> {
    let job = store::get_job(&state.db, &job_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Job {} not found", job_id)))?;

    Ok(Json(JobResponse::from(job)))
}
