// src/candidates/ingest.rs
//! Resume upload -> text -> profile -> embedding, before anything is stored

use tracing::info;

use super::extract::{extract_profile, UNKNOWN_NAME};
use super::models::NewCandidate;
use crate::common::upload::UploadedFile;
use crate::common::{ApiError, AppState};
use crate::services::pdf::extract_text_blocking;

/// Parse and embed an uploaded resume. `name` overrides the extracted name.
pub async fn prepare_candidate(
    state: &AppState,
    file: &UploadedFile,
    name: Option<&str>,
) -> Result<NewCandidate, ApiError> {
    let raw_text = extract_text_blocking(file.filename.clone(), file.bytes.clone()).await?;

    let profile = extract_profile(&raw_text);
    let embedding = state.embed(raw_text.clone()).await?;

    let name = name
        .map(str::to_string)
        .or_else(|| Some(profile.contact.name.clone()).filter(|n| n != UNKNOWN_NAME))
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());

    info!(
        filename = %file.filename,
        candidate = %name,
        skills = profile.skills.skills.len(),
        chars = raw_text.len(),
        "Resume parsed"
    );

    Ok(NewCandidate {
        name,
        email: profile.contact.email,
        phone: profile.contact.phone,
        filename: None,
        raw_text,
        skills: profile.skills.skills,
        skills_categorized: profile.skills.categorized,
        experience_years: profile.experience_years,
        education: profile.education,
        embedding,
        embedding_model: state.embedder.model_name().to_string(),
    })
}
