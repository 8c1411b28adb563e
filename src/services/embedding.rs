// src/services/embedding.rs
//! Sentence embeddings for resumes and job descriptions.
//!
//! [`MiniLmEmbedder`] runs a pretrained sentence-transformer (BERT) with
//! candle, mean-pooled and L2-normalized. [`HashingEmbedder`] is a
//! deterministic feature-hashing stand-in that needs no model download.

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::api::sync::ApiBuilder;
use hf_hub::{Repo, RepoType};
use siphasher::sip::SipHasher13;
use std::hash::Hasher;
use std::path::Path;
use tokenizers::{Tokenizer, TruncationParams};
use tracing::{debug, info, warn};

use crate::common::config::{AppConfig, EmbedderKind};

/// Tokens fed to the model; longer input is truncated
const MAX_SEQUENCE_LENGTH: usize = 256;

pub const HASH_EMBEDDING_DIMENSION: usize = 384;

// Changing these keys changes every hashed embedding
const HASH_SEED_K0: u64 = 0x0123_4567_89ab_cdef;
const HASH_SEED_K1: u64 = 0xfedc_ba98_7654_3210;

#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("Cannot embed empty text")]
    EmptyInput,

    #[error("Model download failed: {0}")]
    ModelDownload(String),

    #[error("Tokenizer error: {0}")]
    Tokenizer(String),

    #[error("Tensor operation failed: {0}")]
    Tensor(#[from] candle_core::Error),

    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid model configuration: {0}")]
    Config(String),

    #[error("Embedding task failed: {0}")]
    Runtime(String),
}

/// A text embedding model shared read-only across requests
pub trait Embedder: Send + Sync {
    /// Embed one text into a fixed-length, L2-normalized vector
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    fn dimension(&self) -> usize;

    /// Identifier stored next to persisted vectors
    fn model_name(&self) -> &str;
}

/// Load the embedder selected by configuration. Blocking: downloads and maps weights.
pub fn load_embedder(config: &AppConfig) -> Result<Box<dyn Embedder>, EmbeddingError> {
    match config.embedder {
        EmbedderKind::Hash => {
            info!("Using feature-hashing embedder");
            Ok(Box::new(HashingEmbedder::new(HASH_EMBEDDING_DIMENSION)))
        }
        EmbedderKind::MiniLm => {
            let embedder = MiniLmEmbedder::load(&config.embedding_model, &config.model_cache_dir)?;
            Ok(Box::new(embedder))
        }
    }
}

// ============================================================================
// candle sentence-transformer
// ============================================================================

#[derive(serde::Deserialize)]
struct ModelShape {
    hidden_size: usize,
}

pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    model_id: String,
    dimension: usize,
}

impl MiniLmEmbedder {
    pub fn load(model_id: &str, cache_dir: &Path) -> Result<Self, EmbeddingError> {
        let device = Device::Cpu;

        std::fs::create_dir_all(cache_dir)?;
        let api = ApiBuilder::new()
            .with_cache_dir(cache_dir.to_path_buf())
            .build()
            .map_err(|e| EmbeddingError::ModelDownload(e.to_string()))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let fetch = |file: &str| {
            repo.get(file)
                .map_err(|e| EmbeddingError::ModelDownload(format!("{}: {}", file, e)))
        };
        let config_path = fetch("config.json")?;
        let tokenizer_path = fetch("tokenizer.json")?;
        let weights_path = fetch("model.safetensors")?;

        let raw_config = std::fs::read_to_string(config_path)?;
        let config: Config = serde_json::from_str(&raw_config)
            .map_err(|e| EmbeddingError::Config(e.to_string()))?;
        let ModelShape { hidden_size } = serde_json::from_str(&raw_config)
            .map_err(|e| EmbeddingError::Config(e.to_string()))?;

        let mut tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_SEQUENCE_LENGTH,
                ..Default::default()
            }))
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;
        // Single-sequence encoding needs no padding
        tokenizer.with_padding(None);

        // SAFETY: the weights file is owned by the hf-hub cache and not mutated while mapped
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)?
        };
        let model = BertModel::load(vb, &config)
            .map_err(|e| EmbeddingError::Config(format!("Failed to load model: {}", e)))?;

        info!(model = %model_id, dimension = hidden_size, "Embedding model loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
            model_id: model_id.to_string(),
            dimension: hidden_size,
        })
    }
}

impl Embedder for MiniLmEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let encoding = self
            .tokenizer
            .encode(text, true)
            .map_err(|e| EmbeddingError::Tokenizer(e.to_string()))?;

        let token_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = token_ids.zeros_like()?;

        // [1, seq_len, hidden]
        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        // Mean pooling over real tokens
        let mask = attention_mask.to_dtype(DType::F32)?.unsqueeze(2)?;
        let summed = hidden.broadcast_mul(&mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f32::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        let norm = pooled.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f32::MAX)?;
        let normalized = pooled.broadcast_div(&norm)?;

        let vector: Vec<f32> = normalized.squeeze(0)?.to_vec1()?;
        if vector.len() != self.dimension {
            warn!(
                expected = self.dimension,
                actual = vector.len(),
                "Embedding dimension differs from model config"
            );
        }
        debug!(tokens = encoding.get_ids().len(), "Embedded text");
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Feature hashing
// ============================================================================

/// Signed feature hashing over lowercase alphanumeric tokens.
///
/// Deterministic across runs and Rust versions (SipHash-1-3, fixed keys).
pub struct HashingEmbedder {
    dimension: usize,
    name: String,
}

impl HashingEmbedder {
    pub fn new(dimension: usize) -> Self {
        let dimension = dimension.max(1);
        Self {
            dimension,
            name: format!("hash-{}", dimension),
        }
    }

    fn hash(token: &str, salt: u8) -> u64 {
        let mut hasher = SipHasher13::new_with_keys(HASH_SEED_K0, HASH_SEED_K1);
        hasher.write(token.as_bytes());
        hasher.write_u8(salt);
        hasher.finish()
    }
}

/// Lowercase alphanumeric tokens of at least two characters
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= 2)
        .map(|t| t.to_lowercase())
}

impl Embedder for HashingEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let idx = (Self::hash(&token, 0) % self.dimension as u64) as usize;
            let sign = if Self::hash(&token, 1) % 2 == 0 { 1.0 } else { -1.0 };
            vector[idx] += sign;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }
        Ok(vector)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::scoring::cosine_similarity;

    #[test]
    fn test_hashing_embedder_is_deterministic() {
        let embedder = HashingEmbedder::new(HASH_EMBEDDING_DIMENSION);
        let text = "5 years Python backend engineer, built REST APIs";

        let a = embedder.embed(text).unwrap();
        let b = embedder.embed(text).unwrap();
        assert_eq!(a, b);

        // A fresh instance gives the same vector
        let c = HashingEmbedder::new(HASH_EMBEDDING_DIMENSION).embed(text).unwrap();
        assert_eq!(a, c);
    }

    #[test]
    fn test_hashing_embedder_is_normalized() {
        let embedder = HashingEmbedder::new(64);
        let v = embedder.embed("rust tokio axum sqlx serde").unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert_eq!(v.len(), 64);
        assert!((norm - 1.0).abs() < 1e-5, "norm was {}", norm);
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let embedder = HashingEmbedder::new(16);
        assert!(matches!(embedder.embed("   "), Err(EmbeddingError::EmptyInput)));
    }

    #[test]
    fn test_related_texts_score_higher_than_unrelated() {
        let embedder = HashingEmbedder::new(1024);
        let resume = embedder
            .embed("5 years Python backend engineer, built REST APIs")
            .unwrap();
        let job = embedder
            .embed("Senior Python backend role, 5+ years, REST API experience")
            .unwrap();
        let chef = embedder
            .embed("pastry chef, 10 years bakery experience")
            .unwrap();
        let ml_job = embedder.embed("senior machine learning engineer").unwrap();

        let strong = cosine_similarity(&resume, &job).unwrap();
        let weak = cosine_similarity(&chef, &ml_job).unwrap();
        assert!(strong > 0.3, "related similarity {}", strong);
        assert!(weak < 0.3, "unrelated similarity {}", weak);
        assert!(strong > weak);
    }

    #[test]
    fn test_tokenize_drops_single_chars() {
        let tokens: Vec<String> = tokenize("5 years of C, Go & Rust").collect();
        assert_eq!(tokens, vec!["years", "of", "go", "rust"]);
    }

    #[test]
    #[ignore = "downloads the sentence-transformer weights"]
    fn test_minilm_embedder_is_deterministic() {
        let cache = std::env::temp_dir().join("matcher-hf-cache");
        let embedder =
            MiniLmEmbedder::load(crate::common::config::DEFAULT_EMBEDDING_MODEL, &cache).unwrap();
        let a = embedder.embed("Senior Rust engineer").unwrap();
        let b = embedder.embed("Senior Rust engineer").unwrap();

        assert_eq!(a.len(), embedder.dimension());
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-6);
        }
        let self_sim = cosine_similarity(&a, &a).unwrap();
        assert!((self_sim - 1.0).abs() < 1e-4);
    }

    #[test]
    #[ignore = "downloads the sentence-transformer weights"]
    fn test_minilm_separates_related_and_unrelated_pairs() {
        use crate::services::scoring::{fit_band, similarity_percent, FitBand};

        let cache = std::env::temp_dir().join("matcher-hf-cache");
        let embedder =
            MiniLmEmbedder::load(crate::common::config::DEFAULT_EMBEDDING_MODEL, &cache).unwrap();
        let similarity = |resume: &str, job: &str| {
            let r = embedder.embed(resume).unwrap();
            let j = embedder.embed(job).unwrap();
            similarity_percent(cosine_similarity(&r, &j).unwrap())
        };

        let python = similarity(
            "5 years Python backend engineer, built REST APIs",
            "Senior Python backend role, 5+ years, REST API experience",
        );
        let chef = similarity(
            "pastry chef, 10 years bakery experience",
            "senior machine learning engineer",
        );

        assert_eq!(fit_band(python), FitBand::Strong, "python pair at {}%", python);
        assert_ne!(fit_band(chef), FitBand::Strong, "chef pair at {}%", chef);
        assert!(chef < python);
    }
}
