// src/common/config.rs
//! Runtime configuration read from the environment (and `.env`)

use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_NAME: &str = "llama-3.3-70b-versatile";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const MAX_LLM_RETRIES: u32 = 10;
pub const DEFAULT_EMBEDDING_MODEL: &str = "sentence-transformers/paraphrase-MiniLM-L6-v2";

/// Which embedding backend to load at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedderKind {
    /// candle BERT sentence-transformer
    MiniLm,
    /// Deterministic feature hashing, no model download
    Hash,
}

impl EmbedderKind {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "hash" | "hashing" => EmbedderKind::Hash,
            _ => EmbedderKind::MiniLm,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_dir: PathBuf,
    pub database_url: String,
    pub resumes_dir: PathBuf,
    pub embedder: EmbedderKind,
    pub embedding_model: String,
    pub model_cache_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,
    pub llm: LlmConfig,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // Hosted spaces only allow writes under /tmp
        let is_hosted_space = env::var("SPACE_ID").is_ok();
        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                if is_hosted_space {
                    PathBuf::from("/tmp/data")
                } else {
                    PathBuf::from("./data")
                }
            });

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| format!("sqlite://{}/app.db", data_dir.display()));
        let resumes_dir = env::var("RESUMES_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| data_dir.join("resumes"));

        let model_cache_dir = env::var("HF_CACHE_DIR")
            .or_else(|_| env::var("TRANSFORMERS_CACHE"))
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp/hf_cache"));

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            port: parse_env("PORT", 8080),
            data_dir,
            database_url,
            resumes_dir,
            embedder: EmbedderKind::parse(&env::var("EMBEDDER").unwrap_or_default()),
            embedding_model: env::var("EMBEDDING_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            model_cache_dir,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024),
            cors_origins,
            llm: LlmConfig {
                api_key: env::var("GROQ_API_KEY").ok().filter(|k| !k.trim().is_empty()),
                model: env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL_NAME.to_string()),
                base_url: env::var("LLM_BASE_URL")
                    .unwrap_or_else(|_| DEFAULT_LLM_BASE_URL.to_string()),
                timeout_secs: parse_env("LLM_TIMEOUT_SECS", 60),
                max_retries: parse_env::<u32>("LLM_MAX_RETRIES", 3).clamp(1, MAX_LLM_RETRIES),
            },
        }
    }

    /// Configuration for tests: in-memory database, hashing embedder, no LLM key
    #[cfg(test)]
    pub fn for_tests(data_dir: PathBuf) -> Self {
        Self {
            port: 0,
            database_url: "sqlite::memory:".to_string(),
            resumes_dir: data_dir.join("resumes"),
            data_dir,
            embedder: EmbedderKind::Hash,
            embedding_model: "hash".to_string(),
            model_cache_dir: PathBuf::from("/tmp/hf_cache"),
            max_upload_bytes: 1024 * 1024,
            cors_origins: vec!["*".to_string()],
            llm: LlmConfig {
                api_key: None,
                model: DEFAULT_MODEL_NAME.to_string(),
                base_url: DEFAULT_LLM_BASE_URL.to_string(),
                timeout_secs: 5,
                max_retries: 1,
            },
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

/// Print the effective configuration on startup, secrets masked
pub fn print_config_status(config: &AppConfig) {
    println!("📁 Data directory: {}", config.data_dir.display());
    println!("🗄️  Database: {}", config.database_url);
    println!("📄 Resumes directory: {}", config.resumes_dir.display());
    match config.embedder {
        EmbedderKind::MiniLm => println!(
            "🧠 Embedder: {} (cache: {})",
            config.embedding_model,
            config.model_cache_dir.display()
        ),
        EmbedderKind::Hash => println!("🧠 Embedder: feature hashing (offline)"),
    }
    println!(
        "🤖 LLM: {} via {} (key: {})",
        config.llm.model,
        config.llm.base_url,
        config
            .llm
            .api_key
            .as_deref()
            .map(super::helpers::safe_token_log)
            .unwrap_or_else(|| "not configured".to_string())
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_kind_parse() {
        assert_eq!(EmbedderKind::parse("hash"), EmbedderKind::Hash);
        assert_eq!(EmbedderKind::parse(" HASHING "), EmbedderKind::Hash);
        assert_eq!(EmbedderKind::parse("minilm"), EmbedderKind::MiniLm);
        assert_eq!(EmbedderKind::parse(""), EmbedderKind::MiniLm);
    }

    #[test]
    fn test_parse_env_falls_back_on_garbage() {
        env::set_var("MATCHER_TEST_PARSE_ENV", "not-a-number");
        assert_eq!(parse_env("MATCHER_TEST_PARSE_ENV", 42u16), 42);
        env::set_var("MATCHER_TEST_PARSE_ENV", " 7 ");
        assert_eq!(parse_env("MATCHER_TEST_PARSE_ENV", 42u16), 7);
        env::remove_var("MATCHER_TEST_PARSE_ENV");
    }
}
