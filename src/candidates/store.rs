// src/candidates/store.rs
//! Candidate rows. Insert and read only.

use sqlx::{Sqlite, SqlitePool};

use super::models::{Candidate, NewCandidate};
use crate::common::generate_candidate_id;

const CANDIDATE_COLUMNS: &str = "id, name, email, phone, filename, raw_text, skills, \
    skills_categorized, experience_years, education, embedding, embedding_model, created_at";

/// Insert inside the caller's transaction; returns the new id
pub async fn insert_candidate(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    candidate: &NewCandidate,
) -> Result<String, sqlx::Error> {
    let id = generate_candidate_id();
    let now = chrono::Utc::now().to_rfc3339();

    // serde_json cannot fail on these plain collections
    let skills = serde_json::to_string(&candidate.skills).unwrap_or_else(|_| "[]".to_string());
    let categorized = serde_json::to_string(&candidate.skills_categorized)
        .unwrap_or_else(|_| "{}".to_string());
    let education =
        serde_json::to_string(&candidate.education).unwrap_or_else(|_| "[]".to_string());
    let embedding =
        serde_json::to_string(&candidate.embedding).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        r#"
        INSERT INTO candidates (
            id, name, email, phone, filename, raw_text, skills, skills_categorized,
            experience_years, education, embedding, embedding_model, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&candidate.name)
    .bind(&candidate.email)
    .bind(&candidate.phone)
    .bind(&candidate.filename)
    .bind(&candidate.raw_text)
    .bind(&skills)
    .bind(&categorized)
    .bind(candidate.experience_years)
    .bind(&education)
    .bind(&embedding)
    .bind(&candidate.embedding_model)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(id)
}

pub async fn get_candidate(pool: &SqlitePool, id: &str) -> Result<Option<Candidate>, sqlx::Error> {
    sqlx::query_as::<_, Candidate>(&format!(
        "SELECT {} FROM candidates WHERE id = ?",
        CANDIDATE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Newest first
pub async fn list_candidates(pool: &SqlitePool) -> Result<Vec<Candidate>, sqlx::Error> {
    sqlx::query_as::<_, Candidate>(&format!(
        "SELECT {} FROM candidates ORDER BY created_at DESC, rowid DESC",
        CANDIDATE_COLUMNS
    ))
    .fetch_all(pool)
    .await
}
