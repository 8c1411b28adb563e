// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. Set `RESET_DB=true` to drop and recreate
/// everything on startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("⚠️  RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("✅ Dropped old tables");
    }

    create_tables(pool).await?;
    create_indexes(pool).await?;

    info!("✅ Database migration completed successfully!");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Children first
    for table in ["match_results", "jobs", "candidates"] {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }
    Ok(())
}

async fn create_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Candidates: one row per uploaded resume
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            email TEXT,
            phone TEXT,
            filename TEXT,
            raw_text TEXT NOT NULL,
            skills TEXT NOT NULL DEFAULT '[]',
            skills_categorized TEXT NOT NULL DEFAULT '{}',
            experience_years REAL NOT NULL DEFAULT 0,
            education TEXT NOT NULL DEFAULT '[]',
            embedding TEXT NOT NULL,
            embedding_model TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Job descriptions
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS jobs (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            jd_text TEXT NOT NULL,
            required_skills TEXT NOT NULL DEFAULT '[]',
            nice_to_have_skills TEXT NOT NULL DEFAULT '[]',
            embedding TEXT NOT NULL,
            embedding_model TEXT NOT NULL,
            created_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    // Match results are append-only
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS match_results (
            id TEXT PRIMARY KEY,
            candidate_id TEXT NOT NULL,
            job_id TEXT NOT NULL,
            similarity REAL NOT NULL,
            score REAL NOT NULL,
            components TEXT NOT NULL,
            summary_bullets TEXT NOT NULL,
            fit_score INTEGER NOT NULL CHECK (fit_score BETWEEN 1 AND 10),
            key_strengths TEXT NOT NULL,
            concerns TEXT NOT NULL,
            reasoning TEXT NOT NULL,
            llm_model TEXT NOT NULL,
            created_at TEXT NOT NULL,
            FOREIGN KEY(candidate_id) REFERENCES candidates(id),
            FOREIGN KEY(job_id) REFERENCES jobs(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = vec![
        "CREATE INDEX IF NOT EXISTS idx_match_results_job ON match_results(job_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_match_results_pair ON match_results(candidate_id, job_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_candidates_created ON candidates(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_jobs_created ON jobs(created_at)",
    ];

    for index_sql in indexes {
        sqlx::query(index_sql).execute(pool).await?;
    }

    Ok(())
}

#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    // One connection: every in-memory connection is its own database
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    run_migrations(&pool).await.expect("migrations");
    pool
}
