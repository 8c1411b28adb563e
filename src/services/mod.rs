// src/services/mod.rs
//
// Shared services: document extraction, embeddings, similarity scoring
// and the LLM evaluator used by the domain modules

pub mod embedding;
pub mod llm;
pub mod pdf;
pub mod prompts;
pub mod scoring;

// Re-export commonly used types for convenience
pub use embedding::{Embedder, EmbeddingError};
pub use llm::{ChatCompletion, Evaluation, GroqClient, LlmEvaluator};
