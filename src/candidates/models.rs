// src/candidates/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

use crate::common::helpers::parse_json_list;

// ============================================================================
// Candidate Models
// ============================================================================

#[derive(FromRow, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub filename: Option<String>,
    pub raw_text: String,
    pub skills: String,             // JSON array in DB
    pub skills_categorized: String, // JSON object in DB
    pub experience_years: f64,
    pub education: String, // JSON array in DB
    pub embedding: String, // JSON array of f32
    pub embedding_model: String,
    pub created_at: String,
}

impl Candidate {
    pub fn skill_list(&self) -> Vec<String> {
        parse_json_list(&self.skills)
    }

    /// Stored vector, `None` when the column holds bad data
    pub fn embedding_vector(&self) -> Option<Vec<f32>> {
        serde_json::from_str(&self.embedding).ok()
    }
}

/// Values for a new candidate row
#[derive(Debug, Clone)]
pub struct NewCandidate {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub filename: Option<String>,
    pub raw_text: String,
    pub skills: Vec<String>,
    pub skills_categorized: BTreeMap<String, Vec<String>>,
    pub experience_years: f64,
    pub education: Vec<String>,
    pub embedding: Vec<f32>,
    pub embedding_model: String,
}

// Full profile, raw text and vector omitted
#[derive(Serialize, Deserialize, Debug)]
pub struct CandidateResponse {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub filename: Option<String>,
    pub skills: Vec<String>,
    pub skills_categorized: BTreeMap<String, Vec<String>>,
    pub experience_years: f64,
    pub education: Vec<String>,
    pub text_preview: String,
    pub created_at: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CandidateSummary {
    pub id: String,
    pub name: String,
    pub skills: Vec<String>,
    pub experience_years: f64,
    pub created_at: String,
}

const PREVIEW_CHARS: usize = 500;

impl From<Candidate> for CandidateResponse {
    fn from(candidate: Candidate) -> Self {
        let skills = candidate.skill_list();
        let skills_categorized =
            serde_json::from_str(&candidate.skills_categorized).unwrap_or_default();
        let text_preview = candidate.raw_text.chars().take(PREVIEW_CHARS).collect();

        CandidateResponse {
            id: candidate.id,
            name: candidate.name,
            email: candidate.email,
            phone: candidate.phone,
            filename: candidate.filename,
            skills,
            skills_categorized,
            experience_years: candidate.experience_years,
            education: parse_json_list(&candidate.education),
            text_preview,
            created_at: candidate.created_at,
        }
    }
}

impl From<Candidate> for CandidateSummary {
    fn from(candidate: Candidate) -> Self {
        CandidateSummary {
            skills: candidate.skill_list(),
            id: candidate.id,
            name: candidate.name,
            experience_years: candidate.experience_years,
            created_at: candidate.created_at,
        }
    }
}
