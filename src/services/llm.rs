// src/services/llm.rs
//! Hosted chat-completion client and the structured candidate evaluation

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::common::config::LlmConfig;
use crate::services::prompts::{evaluation_user_prompt, EVALUATION_SYSTEM_PROMPT};

const TEMPERATURE: f32 = 0.4;

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("API key not configured")]
    NotConfigured,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Transport failures, 429 and 5xx are worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            LlmError::RequestFailed(_) | LlmError::RateLimitExceeded => true,
            LlmError::HttpStatus { status, .. } => *status >= 500,
            LlmError::NotConfigured | LlmError::InvalidResponse(_) => false,
        }
    }
}

/// One system + user exchange with a chat model, returning the raw reply text
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError>;

    fn model_name(&self) -> &str;
}

// ============================================================================
// OpenAI-compatible wire types
// ============================================================================

#[derive(Debug, Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    response_format: ResponseFormat,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct Usage {
    total_tokens: u32,
}

// ============================================================================
// Groq client
// ============================================================================

pub struct GroqClient {
    client: Client,
    config: LlmConfig,
    backoff_base: Duration,
}

/// `base * 2^(attempt-1)`, saturating instead of overflowing
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::RequestFailed(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            backoff_base: Duration::from_millis(1000),
        })
    }

    /// Override the first retry delay (doubles on each further attempt)
    pub fn with_backoff(mut self, base: Duration) -> Self {
        self.backoff_base = base;
        self
    }

    async fn make_request_with_retry(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let max_retries = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=max_retries {
            match self.make_request(api_key, request).await {
                Ok(response) => return Ok(response),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) => {
                    warn!(
                        attempt = attempt,
                        max_retries = max_retries,
                        error = %e,
                        "LLM API request failed, retrying..."
                    );
                    last_error = Some(e);

                    // Exponential backoff
                    if attempt < max_retries {
                        let delay = backoff_delay(self.backoff_base, attempt);
                        tokio::time::sleep(delay).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::RequestFailed("Unknown error".to_string())))
    }

    async fn make_request(
        &self,
        api_key: &str,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LlmError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(LlmError::RateLimitExceeded);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "LLM API request failed");
            return Err(LlmError::HttpStatus {
                status: status.as_u16(),
                body: error_text,
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatCompletion for GroqClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, LlmError> {
        let api_key = self.config.api_key.as_deref().ok_or(LlmError::NotConfigured)?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user.to_string(),
                },
            ],
            temperature: TEMPERATURE,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
        };

        let response = self.make_request_with_retry(api_key, &request).await?;

        let content = response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("No choices in response".to_string()))?;

        if let Some(usage) = response.usage {
            info!(
                model = %self.config.model,
                tokens_used = usage.total_tokens,
                "LLM completion finished"
            );
        }

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Validated recruiter-style judgement of one candidate against one job
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub summary_bullets: Vec<String>,
    pub fit_score: u8,
    pub key_strengths: Vec<String>,
    pub concerns: Vec<String>,
    pub reasoning: String,
}

impl Evaluation {
    /// Markdown rendering for recruiters
    pub fn justification(&self) -> String {
        let mut out = String::new();

        out.push_str(&format!("**Fit score:** {}/10\n\n", self.fit_score));

        out.push_str("**Summary:**\n");
        for bullet in &self.summary_bullets {
            out.push_str(&format!("- {}\n", bullet));
        }

        out.push_str("\n**Strengths:**\n");
        for strength in &self.key_strengths {
            out.push_str(&format!("- {}\n", strength));
        }

        out.push_str("\n**Concerns:**\n");
        if self.concerns.is_empty() {
            out.push_str("- None noted\n");
        } else {
            for concern in &self.concerns {
                out.push_str(&format!("- {}\n", concern));
            }
        }

        out.push_str(&format!("\n**Reasoning:** {}\n", self.reasoning));
        out
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Llm(#[from] LlmError),

    #[error("response is not a JSON object: {0}")]
    Malformed(String),

    #[error("field `{field}` {reason}")]
    Schema { field: &'static str, reason: String },
}

fn schema(field: &'static str, reason: impl Into<String>) -> EvaluationError {
    EvaluationError::Schema {
        field,
        reason: reason.into(),
    }
}

/// Remove one surrounding markdown code fence, if present
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line
    let body = match rest.find('\n') {
        Some(idx) => &rest[idx + 1..],
        None => rest,
    };
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

fn string_list(
    obj: &Map<String, Value>,
    field: &'static str,
    min: usize,
    max: usize,
) -> Result<Vec<String>, EvaluationError> {
    let items = obj
        .get(field)
        .ok_or_else(|| schema(field, "is required"))?
        .as_array()
        .ok_or_else(|| schema(field, "must be a list of strings"))?;

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let text = item
            .as_str()
            .ok_or_else(|| schema(field, "must contain only strings"))?
            .trim();
        if text.is_empty() {
            return Err(schema(field, "must not contain empty entries"));
        }
        out.push(text.to_string());
    }

    if out.len() < min || out.len() > max {
        return Err(schema(
            field,
            format!("must have {}-{} entries, got {}", min, max, out.len()),
        ));
    }
    Ok(out)
}

/// Parse and strictly validate a model reply. Nothing is coerced.
pub fn parse_evaluation(raw: &str) -> Result<Evaluation, EvaluationError> {
    let value: Value = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| EvaluationError::Malformed(e.to_string()))?;
    let obj = value
        .as_object()
        .ok_or_else(|| EvaluationError::Malformed("expected a JSON object".to_string()))?;

    let summary_bullets = string_list(obj, "summary_bullets", 3, 5)?;

    let fit_score = obj
        .get("fit_score")
        .ok_or_else(|| schema("fit_score", "is required"))?
        .as_u64()
        .ok_or_else(|| schema("fit_score", "must be an integer"))?;
    if !(1..=10).contains(&fit_score) {
        return Err(schema(
            "fit_score",
            format!("must be in 1..=10, got {}", fit_score),
        ));
    }

    let key_strengths = string_list(obj, "key_strengths", 2, 3)?;
    let concerns = string_list(obj, "concerns", 0, 3)?;

    let reasoning = obj
        .get("reasoning")
        .ok_or_else(|| schema("reasoning", "is required"))?
        .as_str()
        .ok_or_else(|| schema("reasoning", "must be a string"))?
        .trim();
    if reasoning.is_empty() {
        return Err(schema("reasoning", "must not be empty"));
    }

    Ok(Evaluation {
        summary_bullets,
        fit_score: fit_score as u8,
        key_strengths,
        concerns,
        reasoning: reasoning.to_string(),
    })
}

/// Prompts the chat model with the fixed rubric and validates its answer
pub struct LlmEvaluator {
    client: Arc<dyn ChatCompletion>,
}

impl LlmEvaluator {
    pub fn new(client: Arc<dyn ChatCompletion>) -> Self {
        Self { client }
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub async fn evaluate(
        &self,
        job_description: &str,
        candidate_name: &str,
        resume_text: &str,
    ) -> Result<Evaluation, EvaluationError> {
        let user_prompt = evaluation_user_prompt(job_description, candidate_name, resume_text);
        let raw = self
            .client
            .complete(EVALUATION_SYSTEM_PROMPT, &user_prompt)
            .await?;

        debug!(chars = raw.len(), "LLM evaluation received");

        let evaluation = parse_evaluation(&raw).map_err(|e| {
            warn!(error = %e, "LLM evaluation failed validation");
            e
        })?;

        info!(
            candidate = %candidate_name,
            fit_score = evaluation.fit_score,
            "Candidate evaluated"
        );
        Ok(evaluation)
    }
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    pub const VALID_REPLY: &str = r#"{
        "summary_bullets": ["Five years of Python backend work", "Built REST APIs", "Led a small team"],
        "fit_score": 8,
        "key_strengths": ["Python", "API design"],
        "concerns": ["No Kubernetes experience"],
        "reasoning": "Strong backend match with a minor infrastructure gap."
    }"#;

    /// Chat client that replays a fixed reply and counts calls
    pub struct StubChat {
        pub reply: Result<String, u16>,
        pub calls: AtomicUsize,
    }

    impl StubChat {
        pub fn replying(reply: &str) -> Self {
            Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for StubChat {
        async fn complete(&self, _system: &str, _user: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(status) => Err(LlmError::HttpStatus {
                    status: *status,
                    body: "stub failure".to_string(),
                }),
            }
        }

        fn model_name(&self) -> &str {
            "stub-model"
        }
    }
}
