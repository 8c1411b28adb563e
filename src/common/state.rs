// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::common::config::AppConfig;
use crate::services::embedding::Embedder;
use crate::services::llm::LlmEvaluator;

/// Application state containing database pool, pipeline components, and configuration.
///
/// The embedding model is loaded once at startup and shared read-only
/// across requests through this handle.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub embedder: Arc<dyn Embedder>,
    pub evaluator: Arc<LlmEvaluator>,
}

impl AppState {
    pub fn new(
        db: SqlitePool,
        config: AppConfig,
        embedder: Arc<dyn Embedder>,
        evaluator: Arc<LlmEvaluator>,
    ) -> Self {
        Self {
            db,
            config: Arc::new(config),
            embedder,
            evaluator,
        }
    }

    /// Embed text on the blocking pool; model inference is CPU bound
    pub async fn embed(
        &self,
        text: String,
    ) -> Result<Vec<f32>, crate::services::embedding::EmbeddingError> {
        let embedder = self.embedder.clone();
        tokio::task::spawn_blocking(move || embedder.embed(&text))
            .await
            .map_err(|e| crate::services::embedding::EmbeddingError::Runtime(e.to_string()))?
    }
}
