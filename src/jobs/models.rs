// src/jobs/models.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::common::helpers::parse_json_list;

// ============================================================================
// Job Models
// ============================================================================

#[derive(FromRow, Debug, Clone)]
pub struct Job {
    pub id: String,
    pub title: String,
    pub jd_text: String,
    pub required_skills: String,     // JSON string in DB, will be parsed
    pub nice_to_have_skills: String, // JSON string in DB, will be parsed
    pub embedding: String,           // JSON array of f32
    pub embedding_model: String,
    pub created_at: String,
}

impl Job {
    pub fn required_skill_list(&self) -> Vec<String> {
        parse_json_list(&self.required_skills)
    }

    pub fn nice_to_have_skill_list(&self) -> Vec<String> {
        parse_json_list(&self.nice_to_have_skills)
    }

    pub fn embedding_vector(&self) -> Option<Vec<f32>> {
        serde_json::from_str(&self.embedding).ok()
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateJob {
    pub title: String,
    pub jd_text: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
}

/// Values for a new job row
#[derive(Debug, Clone)]
pub struct NewJob {
    pub title: String,
    pub jd_text: String,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub embedding: Vec<f32>,
    pub embedding_model: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct CreateJobResponse {
    pub job_id: String,
    pub title: String,
}

// Entry for job pickers
#[derive(Serialize, Deserialize, Debug)]
pub struct JobListItem {
    pub id: String,
    pub title: String,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct JobResponse {
    pub id: String,
    pub title: String,
    pub jd_text: String,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
    pub embedding_model: String,
    pub created_at: String,
}

impl From<Job> for JobResponse {
    fn from(job: Job) -> Self {
        JobResponse {
            required_skills: job.required_skill_list(),
            nice_to_have_skills: job.nice_to_have_skill_list(),
            id: job.id,
            title: job.title,
            jd_text: job.jd_text,
            embedding_model: job.embedding_model,
            created_at: job.created_at,
        }
    }
}

impl From<Job> for JobListItem {
    fn from(job: Job) -> Self {
        JobListItem {
            id: job.id,
            title: job.title,
        }
    }
}
