// src/matching/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::parse_json_list;
use crate::services::llm::Evaluation;
use crate::services::scoring::{fit_band, similarity_percent, CompositeScore, ScoreComponents};

// ============================================================================
// Match Result Models
// ============================================================================

/// Stored match result joined with the candidate's name
#[derive(FromRow, Debug, Clone)]
pub struct MatchResultRow {
    pub id: String,
    pub candidate_id: String,
    pub candidate_name: Option<String>,
    pub job_id: String,
    pub similarity: f64,
    pub score: f64,
    pub components: String,      // JSON object in DB
    pub summary_bullets: String, // JSON array in DB
    pub fit_score: i64,
    pub key_strengths: String, // JSON array in DB
    pub concerns: String,      // JSON array in DB
    pub reasoning: String,
    pub llm_model: String,
    pub created_at: String,
}

impl MatchResultRow {
    pub fn evaluation(&self) -> Evaluation {
        Evaluation {
            summary_bullets: parse_json_list(&self.summary_bullets),
            // CHECK constraint keeps this in 1..=10
            fit_score: self.fit_score.clamp(1, 10) as u8,
            key_strengths: parse_json_list(&self.key_strengths),
            concerns: parse_json_list(&self.concerns),
            reasoning: self.reasoning.clone(),
        }
    }
}

/// Values for a new match_results row
#[derive(Debug, Clone)]
pub struct NewMatchResult {
    pub candidate_id: String,
    pub job_id: String,
    /// Raw cosine similarity
    pub similarity: f32,
    pub composite: CompositeScore,
    pub evaluation: Evaluation,
    pub llm_model: String,
}

#[derive(Debug, Clone)]
pub struct InsertedRow {
    pub id: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MatchResultResponse {
    pub id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub job_id: String,
    pub similarity: f32,
    pub similarity_percent: f32,
    pub fit_band: String,
    /// Composite 0-100 ranking score
    pub score: f32,
    pub components: ScoreComponents,
    pub evaluation: Evaluation,
    pub justification: String,
    pub llm_model: String,
    pub created_at: String,
}

impl MatchResultResponse {
    pub fn from_new(inserted: InsertedRow, candidate_name: &str, result: NewMatchResult) -> Self {
        let percent = similarity_percent(result.similarity);
        MatchResultResponse {
            id: inserted.id,
            candidate_id: result.candidate_id,
            candidate_name: candidate_name.to_string(),
            job_id: result.job_id,
            similarity: result.similarity,
            similarity_percent: percent,
            fit_band: fit_band(percent).label().to_string(),
            score: result.composite.score,
            components: result.composite.components,
            justification: result.evaluation.justification(),
            evaluation: result.evaluation,
            llm_model: result.llm_model,
            created_at: inserted.created_at,
        }
    }
}

impl From<MatchResultRow> for MatchResultResponse {
    fn from(row: MatchResultRow) -> Self {
        let evaluation = row.evaluation();
        let similarity = row.similarity as f32;
        let percent = similarity_percent(similarity);
        let components = serde_json::from_str(&row.components).unwrap_or_default();

        MatchResultResponse {
            id: row.id,
            candidate_id: row.candidate_id,
            candidate_name: row.candidate_name.unwrap_or_default(),
            job_id: row.job_id,
            similarity,
            similarity_percent: percent,
            fit_band: fit_band(percent).label().to_string(),
            score: row.score as f32,
            components,
            justification: evaluation.justification(),
            evaluation,
            llm_model: row.llm_model,
            created_at: row.created_at,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct MatchQuery {
    pub top_k: Option<i64>,
}
