// src/app.rs
//! Router composition shared by the server binary and the API tests

use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::candidates::candidates_routes;
use crate::common::AppState;
use crate::jobs::jobs_routes;
use crate::logging_middleware;
use crate::matching::matching_routes;

/// Multipart framing on top of the largest accepted file
const BODY_LIMIT_OVERHEAD: usize = 64 * 1024;

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub llm_model: String,
}

/// GET /health
pub async fn health(Extension(state): Extension<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        embedding_model: state.embedder.model_name().to_string(),
        embedding_dimension: state.embedder.dimension(),
        llm_model: state.evaluator.model_name().to_string(),
    })
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ]);

    if origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(origins).allow_credentials(true)
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes + BODY_LIMIT_OVERHEAD;
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        // ====================================================================
        // CANDIDATE ROUTES (Resume upload and listing)
        // ====================================================================
        .merge(candidates_routes())
        // ====================================================================
        // JOB ROUTES (Create, list, extract)
        // ====================================================================
        .merge(jobs_routes())
        // ====================================================================
        // MATCHING ROUTES (Single evaluation, ranking, stored results)
        // ====================================================================
        .merge(matching_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(middleware::from_fn(logging_middleware::log_request_response))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(Extension(state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub mod test_support {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::common::migrations::test_pool;
    use crate::common::AppConfig;
    use crate::services::embedding::HashingEmbedder;
    use crate::services::llm::test_support::{StubChat, VALID_REPLY};
    use crate::services::llm::LlmEvaluator;

    pub const BOUNDARY: &str = "matcher-test-boundary";

    pub struct TestApp {
        pub router: Router,
        pub state: Arc<AppState>,
        pub chat: Arc<StubChat>,
        _dir: tempfile::TempDir,
    }

    impl TestApp {
        pub async fn new() -> Self {
            Self::with_chat(StubChat::replying(VALID_REPLY)).await
        }

        pub async fn with_chat(chat: StubChat) -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = AppConfig::for_tests(dir.path().to_path_buf());
            std::fs::create_dir_all(&config.resumes_dir).unwrap();

            let chat = Arc::new(chat);
            let state = Arc::new(AppState::new(
                test_pool().await,
                config,
                Arc::new(HashingEmbedder::new(1024)),
                Arc::new(LlmEvaluator::new(chat.clone())),
            ));

            TestApp {
                router: build_router(state.clone()),
                state,
                chat,
                _dir: dir,
            }
        }

        pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body = if bytes.is_empty() {
                Value::Null
            } else {
                serde_json::from_slice(&bytes).unwrap()
            };
            (status, body)
        }

        pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
            self.send(Request::get(uri).body(Body::empty()).unwrap()).await
        }

        pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
            self.send(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        pub async fn post_multipart(&self, uri: &str, parts: Vec<Part<'_>>) -> (StatusCode, Value) {
            self.send(
                Request::post(uri)
                    .header(
                        header::CONTENT_TYPE,
                        format!("multipart/form-data; boundary={}", BOUNDARY),
                    )
                    .body(Body::from(multipart_body(&parts)))
                    .unwrap(),
            )
            .await
        }
    }

    pub enum Part<'a> {
        Text(&'a str, &'a str),
        File {
            field: &'a str,
            filename: &'a str,
            content: &'a [u8],
        },
    }

    pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    field,
                    filename,
                    content,
                } => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            field, filename
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(content);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    pub const PYTHON_RESUME: &str = "Jane Doe\n\
        jane.doe@example.com | +1 555 123 4567\n\
        Senior Python developer with 6 years of experience building REST APIs.\n\
        Skills: Python, Django, FastAPI, PostgreSQL, Docker, AWS, SQL\n\
        Education: B.Sc. in Computer Science\n";

    pub const PAINTER_RESUME: &str = "Marco Rossi\n\
        marco.rossi@example.com\n\
        Oil painter and gallery curator. Watercolour landscapes, portraits,\n\
        framing, canvas restoration and exhibition planning for museums.\n";

    pub const PYTHON_JD: &str = "Senior Python Developer\n\
        We build REST APIs for logistics customers.\n\
        Requirements:\n\
        - 5+ years of Python\n\
        - Django or FastAPI\n\
        - PostgreSQL and SQL\n\
        Nice to have:\n\
        - Docker\n\
        - AWS\n";
}

#[cfg(test)]
mod tests {
    use super::test_support::TestApp;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_models() {
        let app = TestApp::new().await;
        let (status, body) = app.get("/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["embedding_model"], "hash-1024");
        assert_eq!(body["embedding_dimension"], 1024);
        assert_eq!(body["llm_model"], "stub-model");
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = TestApp::new().await;
        let (status, _) = app.get("/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
