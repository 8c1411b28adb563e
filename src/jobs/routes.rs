// src/jobs/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Create the jobs router with all job-related routes
pub fn jobs_routes() -> Router {
    Router::new()
        .route("/jobs", post(handlers::create_job))
        .route("/jobs/list", get(handlers::list_jobs))
        .route("/jobs/extract", post(handlers::extract_job_description))
        .route("/jobs/:id", get(handlers::get_job_by_id))
}
