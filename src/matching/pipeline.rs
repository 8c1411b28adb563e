// src/matching/pipeline.rs
//! parse -> embed -> score -> LLM evaluate -> persist

use std::cmp::Ordering;
use tracing::{debug, info, warn};

use super::models::{MatchResultResponse, NewMatchResult};
use super::store as match_store;
use crate::candidates::ingest::prepare_candidate;
use crate::candidates::models::Candidate;
use crate::candidates::store as candidate_store;
use crate::common::upload::{discard_upload, store_upload, UploadedFile};
use crate::common::{ApiError, AppState};
use crate::jobs::extract::extract_jd_details;
use crate::jobs::ingest::prepare_job;
use crate::jobs::models::{CreateJob, Job};
use crate::jobs::store as job_store;
use crate::services::scoring::{composite_score, cosine_similarity, skill_coverage, CompositeScore};

pub const DEFAULT_TOP_K: i64 = 5;
pub const MAX_TOP_K: i64 = 50;
const MIN_SHORTLIST: usize = 10;

/// Input for a one-shot resume vs JD evaluation
pub struct SingleMatchRequest {
    pub resume: UploadedFile,
    pub jd_text: String,
    pub candidate_name: Option<String>,
    pub title: Option<String>,
}

/// Evaluate one resume against one job description and store candidate, job
/// and result together. Any failing stage fails the whole request.
pub async fn evaluate_single(
    state: &AppState,
    request: SingleMatchRequest,
) -> Result<MatchResultResponse, ApiError> {
    let jd_details = extract_jd_details(&request.jd_text);
    let job = prepare_job(
        state,
        CreateJob {
            title: request.title.unwrap_or(jd_details.title),
            jd_text: request.jd_text,
            required_skills: jd_details.required_skills,
            nice_to_have_skills: jd_details.nice_to_have_skills,
        },
    )
    .await?;

    let mut candidate =
        prepare_candidate(state, &request.resume, request.candidate_name.as_deref()).await?;

    let similarity = cosine_similarity(&candidate.embedding, &job.embedding)?;
    let coverage = skill_coverage(
        &candidate.skills,
        &job.required_skills,
        &job.nice_to_have_skills,
    );
    debug!(similarity, required = coverage.required, "Resume scored");

    let evaluation = state
        .evaluator
        .evaluate(&job.jd_text, &candidate.name, &candidate.raw_text)
        .await?;
    let composite = composite_score(similarity, &coverage, Some(evaluation.fit_score));

    let resumes_dir = &state.config.resumes_dir;
    let stored_name = store_upload(resumes_dir, "resume", &request.resume).await?;
    candidate.filename = Some(stored_name.clone());

    let persisted = async {
        let mut tx = state.db.begin().await?;
        let candidate_id = candidate_store::insert_candidate(&mut tx, &candidate).await?;
        let job_id = job_store::insert_job(&mut tx, &job).await?;
        let result = NewMatchResult {
            candidate_id,
            job_id,
            similarity,
            composite,
            evaluation,
            llm_model: state.evaluator.model_name().to_string(),
        };
        let inserted = match_store::insert_match_result(&mut tx, &result).await?;
        tx.commit().await?;
        Ok::<_, sqlx::Error>((inserted, result))
    }
    .await;

    let (inserted, result) = match persisted {
        Ok(parts) => parts,
        Err(e) => {
            discard_upload(resumes_dir, &stored_name).await;
            return Err(e.into());
        }
    };

    info!(
        result_id = %inserted.id,
        candidate_id = %result.candidate_id,
        job_id = %result.job_id,
        score = result.composite.score,
        fit_score = result.evaluation.fit_score,
        "Single match evaluated"
    );

    Ok(MatchResultResponse::from_new(inserted, &candidate.name, result))
}

/// Stored vector when it came from the loaded model, otherwise re-embedded
async fn current_embedding(
    state: &AppState,
    stored: Option<Vec<f32>>,
    stored_model: &str,
    text: &str,
) -> Result<Vec<f32>, ApiError> {
    match stored {
        Some(vector) if stored_model == state.embedder.model_name() && !vector.is_empty() => {
            Ok(vector)
        }
        _ => {
            warn!(
                stored_model = %stored_model,
                current_model = %state.embedder.model_name(),
                "Stored embedding unusable, re-embedding"
            );
            Ok(state.embed(text.to_string()).await?)
        }
    }
}

struct Prelim {
    candidate: Candidate,
    similarity: f32,
    preliminary: CompositeScore,
}

fn shortlist_size(top_k: usize) -> usize {
    MIN_SHORTLIST.max(top_k * 2)
}

/// Rank every stored candidate for a job. Candidates are pre-scored without
/// the LLM, the shortlist is evaluated, all evaluations are stored in one
/// transaction and the best `top_k` returned.
pub async fn rank_candidates(
    state: &AppState,
    job: &Job,
    top_k: usize,
) -> Result<Vec<MatchResultResponse>, ApiError> {
    let candidates = candidate_store::list_candidates(&state.db).await?;
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let job_embedding =
        current_embedding(state, job.embedding_vector(), &job.embedding_model, &job.jd_text)
            .await?;
    let required = job.required_skill_list();
    let nice = job.nice_to_have_skill_list();

    let mut prelims = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let embedding = current_embedding(
            state,
            candidate.embedding_vector(),
            &candidate.embedding_model,
            &candidate.raw_text,
        )
        .await?;
        let similarity = cosine_similarity(&embedding, &job_embedding)?;
        let coverage = skill_coverage(&candidate.skill_list(), &required, &nice);
        prelims.push(Prelim {
            preliminary: composite_score(similarity, &coverage, None),
            candidate,
            similarity,
        });
    }

    prelims.sort_by(|a, b| {
        b.preliminary
            .score
            .partial_cmp(&a.preliminary.score)
            .unwrap_or(Ordering::Equal)
    });
    prelims.truncate(shortlist_size(top_k));

    info!(
        job_id = %job.id,
        shortlisted = prelims.len(),
        top_k,
        "Evaluating shortlist"
    );

    let mut evaluated = Vec::with_capacity(prelims.len());
    for prelim in prelims {
        let evaluation = state
            .evaluator
            .evaluate(&job.jd_text, &prelim.candidate.name, &prelim.candidate.raw_text)
            .await?;
        let coverage = skill_coverage(&prelim.candidate.skill_list(), &required, &nice);
        let result = NewMatchResult {
            candidate_id: prelim.candidate.id.clone(),
            job_id: job.id.clone(),
            similarity: prelim.similarity,
            composite: composite_score(prelim.similarity, &coverage, Some(evaluation.fit_score)),
            evaluation,
            llm_model: state.evaluator.model_name().to_string(),
        };
        evaluated.push((prelim.candidate.name, result));
    }

    let mut tx = state.db.begin().await?;
    let mut responses = Vec::with_capacity(evaluated.len());
    for (name, result) in evaluated {
        let inserted = match_store::insert_match_result(&mut tx, &result).await?;
        responses.push(MatchResultResponse::from_new(inserted, &name, result));
    }
    tx.commit().await?;

    responses.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    responses.truncate(top_k);
    Ok(responses)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortlist_size() {
        assert_eq!(shortlist_size(1), 10);
        assert_eq!(shortlist_size(5), 10);
        assert_eq!(shortlist_size(8), 16);
        assert_eq!(shortlist_size(50), 100);
    }
}
