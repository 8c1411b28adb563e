// src/candidates/routes.rs

use crate::candidates::handlers;
use axum::{
    routing::{get, post},
    Router,
};

pub fn candidates_routes() -> Router {
    Router::new()
        .route("/candidates/upload", post(handlers::upload_resume))
        .route("/candidates", get(handlers::list_candidates))
        .route("/candidates/:id", get(handlers::get_candidate))
}
