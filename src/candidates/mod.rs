// src/candidates/mod.rs

pub mod extract;
pub mod handlers;
pub mod ingest;
pub mod models;
pub mod routes;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use routes::candidates_routes;
