// src/jobs/ingest.rs

use super::models::{CreateJob, NewJob};
use super::validators::JobValidator;
use crate::common::{ApiError, AppState, Validator};

fn clean_skills(skills: Vec<String>) -> Vec<String> {
    skills
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Validate and embed a job description. Nothing is persisted.
pub async fn prepare_job(state: &AppState, request: CreateJob) -> Result<NewJob, ApiError> {
    JobValidator.validate(&request).into_result()?;

    let jd_text = request.jd_text.trim().to_string();
    let embedding = state.embed(jd_text.clone()).await?;

    Ok(NewJob {
        title: request.title.trim().to_string(),
        jd_text,
        required_skills: clean_skills(request.required_skills),
        nice_to_have_skills: clean_skills(request.nice_to_have_skills),
        embedding,
        embedding_model: state.embedder.model_name().to_string(),
    })
}
