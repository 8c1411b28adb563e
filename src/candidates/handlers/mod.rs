// src/candidates/handlers/mod.rs

pub mod resumes;

// Re-export handler functions
pub use resumes::*;
