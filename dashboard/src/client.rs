// dashboard/src/client.rs
//! Thin HTTP client for the matcher API

use anyhow::{bail, Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

// ============================================================================
// Response shapes (subset of what the API returns)
// ============================================================================

#[derive(Deserialize, Debug, Clone)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_years: f64,
    #[serde(default)]
    pub education: Vec<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct JobListItem {
    pub id: String,
    pub title: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreatedJob {
    pub job_id: String,
    pub title: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct JdDetails {
    pub title: String,
    #[serde(default)]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub nice_to_have_skills: Vec<String>,
    #[serde(default)]
    pub responsibilities: Vec<String>,
    #[serde(default)]
    pub raw_text: String,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ScoreComponents {
    pub similarity: f32,
    pub required_coverage: f32,
    pub nice_to_have_coverage: f32,
    pub llm_fit: f32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Evaluation {
    pub fit_score: u8,
}

#[derive(Deserialize, Debug, Clone)]
pub struct MatchResult {
    pub id: String,
    pub candidate_id: String,
    pub candidate_name: String,
    pub job_id: String,
    pub similarity_percent: f32,
    pub fit_band: String,
    pub score: f32,
    pub components: ScoreComponents,
    pub evaluation: Evaluation,
    pub justification: String,
    pub created_at: String,
}

#[derive(Serialize, Debug)]
pub struct NewJob {
    pub title: String,
    pub jd_text: String,
    pub required_skills: Vec<String>,
    pub nice_to_have_skills: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    error: String,
    code: String,
}

// ============================================================================
// Client
// ============================================================================

pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let http = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let body = response.text().await.context("Failed to read response body")?;

        if !status.is_success() {
            match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => bail!("{} ({}): {}", status, err.code, err.error),
                Err(_) => bail!("{}: {}", status, body),
            }
        }

        serde_json::from_str(&body).with_context(|| format!("Unexpected response: {}", body))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        Self::parse(response).await
    }

    async fn post_form<T: DeserializeOwned>(&self, path: &str, form: Form) -> Result<T> {
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        Self::parse(response).await
    }

    pub async fn upload_resume(&self, file: &Path, name: Option<&str>) -> Result<Candidate> {
        let mut form = Form::new().part("resume", file_part(file).await?);
        if let Some(name) = name {
            form = form.text("candidate_name", name.to_string());
        }
        self.post_form("/candidates/upload", form).await
    }

    pub async fn extract_jd(&self, file: &Path) -> Result<JdDetails> {
        let form = Form::new().part("jd", file_part(file).await?);
        self.post_form("/jobs/extract", form).await
    }

    pub async fn create_job(&self, job: &NewJob) -> Result<CreatedJob> {
        let response = self
            .http
            .post(self.url("/jobs"))
            .json(job)
            .send()
            .await
            .context("POST /jobs failed")?;
        Self::parse(response).await
    }

    pub async fn list_jobs(&self) -> Result<Vec<JobListItem>> {
        self.get("/jobs/list").await
    }

    pub async fn match_job(&self, job_id: &str, top_k: u32) -> Result<Vec<MatchResult>> {
        self.get(&format!("/match/{}?top_k={}", job_id, top_k)).await
    }

    pub async fn evaluate(
        &self,
        resume: &Path,
        jd_text: &str,
        candidate_name: Option<&str>,
    ) -> Result<MatchResult> {
        let mut form = Form::new()
            .part("resume", file_part(resume).await?)
            .text("jd_text", jd_text.to_string());
        if let Some(name) = candidate_name {
            form = form.text("candidate_name", name.to_string());
        }
        self.post_form("/match", form).await
    }

    pub async fn results(&self, job_id: &str) -> Result<Vec<MatchResult>> {
        self.get(&format!("/results/{}", job_id)).await
    }
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Cannot read {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string());
    Ok(Part::bytes(bytes).file_name(filename))
}
