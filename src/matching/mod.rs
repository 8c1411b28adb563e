// src/matching/mod.rs

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod store;
pub mod validators;

#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use routes::matching_routes;
