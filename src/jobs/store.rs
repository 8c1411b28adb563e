// src/jobs/store.rs
//! Job rows. Insert and read only.

use sqlx::{Sqlite, SqlitePool};

use super::models::{Job, NewJob};
use crate::common::generate_job_id;

const JOB_COLUMNS: &str =
    "id, title, jd_text, required_skills, nice_to_have_skills, embedding, embedding_model, created_at";

/// Insert inside the caller's transaction; returns the new id
pub async fn insert_job(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    job: &NewJob,
) -> Result<String, sqlx::Error> {
    let id = generate_job_id();
    let now = chrono::Utc::now().to_rfc3339();

    let required = serde_json::to_string(&job.required_skills).unwrap_or_else(|_| "[]".to_string());
    let nice =
        serde_json::to_string(&job.nice_to_have_skills).unwrap_or_else(|_| "[]".to_string());
    let embedding = serde_json::to_string(&job.embedding).unwrap_or_else(|_| "[]".to_string());

    sqlx::query(
        r#"
        INSERT INTO jobs (
            id, title, jd_text, required_skills, nice_to_have_skills,
            embedding, embedding_model, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&job.title)
    .bind(&job.jd_text)
    .bind(&required)
    .bind(&nice)
    .bind(&embedding)
    .bind(&job.embedding_model)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(id)
}

pub async fn get_job(pool: &SqlitePool, id: &str) -> Result<Option<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(&format!("SELECT {} FROM jobs WHERE id = ?", JOB_COLUMNS))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Oldest first, the order recruiters created them in
pub async fn list_jobs(pool: &SqlitePool) -> Result<Vec<Job>, sqlx::Error> {
    sqlx::query_as::<_, Job>(&format!(
        "SELECT {} FROM jobs ORDER BY created_at ASC, rowid ASC",
        JOB_COLUMNS
    ))
    .fetch_all(pool)
    .await
}
