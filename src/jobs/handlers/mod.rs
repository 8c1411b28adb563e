// src/jobs/handlers/mod.rs

pub mod extract;
pub mod public;

// Re-export handler functions
pub use extract::*;
pub use public::*;
