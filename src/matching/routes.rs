// src/matching/routes.rs

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

pub fn matching_routes() -> Router {
    Router::new()
        .route("/match", post(handlers::match_single))
        .route("/match/:job_id", get(handlers::match_candidates))
        .route("/results/:job_id", get(handlers::list_results))
        .route("/results/:job_id/:candidate_id", get(handlers::get_result))
}
