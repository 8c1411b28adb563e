// src/matching/store.rs
//! Match results are append-only: reads return the newest row for a pair.

use sqlx::{Sqlite, SqlitePool};

use super::models::{InsertedRow, MatchResultRow, NewMatchResult};
use crate::common::generate_match_id;

const SELECT_WITH_NAME: &str = r#"
    SELECT m.id, m.candidate_id, c.name AS candidate_name, m.job_id, m.similarity, m.score,
           m.components, m.summary_bullets, m.fit_score, m.key_strengths, m.concerns,
           m.reasoning, m.llm_model, m.created_at
    FROM match_results m
    LEFT JOIN candidates c ON c.id = m.candidate_id
"#;

fn to_json<T: serde::Serialize>(value: &T, fallback: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| fallback.to_string())
}

/// Insert inside the caller's transaction
pub async fn insert_match_result(
    tx: &mut sqlx::Transaction<'_, Sqlite>,
    result: &NewMatchResult,
) -> Result<InsertedRow, sqlx::Error> {
    let id = generate_match_id();
    let now = chrono::Utc::now().to_rfc3339();
    let evaluation = &result.evaluation;

    sqlx::query(
        r#"
        INSERT INTO match_results (
            id, candidate_id, job_id, similarity, score, components, summary_bullets,
            fit_score, key_strengths, concerns, reasoning, llm_model, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&result.candidate_id)
    .bind(&result.job_id)
    .bind(result.similarity as f64)
    .bind(result.composite.score as f64)
    .bind(to_json(&result.composite.components, "{}"))
    .bind(to_json(&evaluation.summary_bullets, "[]"))
    .bind(evaluation.fit_score as i64)
    .bind(to_json(&evaluation.key_strengths, "[]"))
    .bind(to_json(&evaluation.concerns, "[]"))
    .bind(&evaluation.reasoning)
    .bind(&result.llm_model)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(InsertedRow {
        id,
        created_at: now,
    })
}

/// Latest result for a (candidate, job) pair
pub async fn get_match_result(
    pool: &SqlitePool,
    candidate_id: &str,
    job_id: &str,
) -> Result<Option<MatchResultRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchResultRow>(&format!(
        "{} WHERE m.candidate_id = ? AND m.job_id = ? ORDER BY m.created_at DESC, m.rowid DESC LIMIT 1",
        SELECT_WITH_NAME
    ))
    .bind(candidate_id)
    .bind(job_id)
    .fetch_optional(pool)
    .await
}

/// Every stored result for a job, newest first
pub async fn list_match_results(
    pool: &SqlitePool,
    job_id: &str,
) -> Result<Vec<MatchResultRow>, sqlx::Error> {
    sqlx::query_as::<_, MatchResultRow>(&format!(
        "{} WHERE m.job_id = ? ORDER BY m.created_at DESC, m.rowid DESC",
        SELECT_WITH_NAME
    ))
    .bind(job_id)
    .fetch_all(pool)
    .await
}
