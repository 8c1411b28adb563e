// Error handling types for the API

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::Serialize;
use std::fmt;
use tracing::error;

use super::validation::ValidationResult;
use crate::services::embedding::EmbeddingError;
use crate::services::llm::{EvaluationError, LlmError};
use crate::services::pdf::PdfError;
use crate::services::scoring::ScoringError;

/// API error types
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    UnsupportedMedia(String),
    UnprocessableDocument(String),
    UpstreamError(String),
    InternalServer(String),
    ServiceUnavailable(String),
    DatabaseError(sqlx::Error),
    ValidationError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ApiError::UnsupportedMedia(msg) => write!(f, "Unsupported Media Type: {}", msg),
            ApiError::UnprocessableDocument(msg) => write!(f, "Unprocessable Document: {}", msg),
            ApiError::UpstreamError(msg) => write!(f, "Upstream Error: {}", msg),
            ApiError::InternalServer(msg) => write!(f, "Internal Server Error: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service Unavailable: {}", msg),
            ApiError::DatabaseError(e) => write!(f, "Database Error: {}", e),
            ApiError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
        }
    }
}

/// JSON error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message, code) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, "BAD_REQUEST"),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, "NOT_FOUND"),
            ApiError::UnsupportedMedia(msg) => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                msg,
                "UNSUPPORTED_MEDIA_TYPE",
            ),
            ApiError::UnprocessableDocument(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                msg,
                "UNPROCESSABLE_DOCUMENT",
            ),
            ApiError::UpstreamError(msg) => (StatusCode::BAD_GATEWAY, msg, "UPSTREAM_ERROR"),
            ApiError::InternalServer(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                msg,
                "INTERNAL_SERVER_ERROR",
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                msg,
                "SERVICE_UNAVAILABLE",
            ),
            ApiError::DatabaseError(e) => {
                error!(error = %e, "Database error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database operation failed".to_string(),
                    "DATABASE_ERROR",
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg, "VALIDATION_ERROR"),
        };

        let error_response = ErrorResponse {
            error: error_message,
            code: code.to_string(),
        };

        (status, Json(error_response)).into_response()
    }
}

/// Helper function to convert ValidationResult to ApiError
impl From<ValidationResult> for ApiError {
    fn from(result: ValidationResult) -> Self {
        if result.is_valid {
            ApiError::InternalServer(
                "Validation result was valid but converted to error".to_string(),
            )
        } else {
            let error_messages: Vec<String> = result
                .errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            ApiError::ValidationError(error_messages.join(", "))
        }
    }
}

// Extractor rejections render as the same `{error, code}` body as every other failure
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::ValidationError(rejection.body_text())
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::DatabaseError(e)
    }
}

impl From<PdfError> for ApiError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::Empty => ApiError::BadRequest(e.to_string()),
            PdfError::UnsupportedFormat(_) => ApiError::UnsupportedMedia(e.to_string()),
            PdfError::Unreadable(_) => ApiError::UnprocessableDocument(e.to_string()),
        }
    }
}

impl From<EmbeddingError> for ApiError {
    fn from(e: EmbeddingError) -> Self {
        match e {
            EmbeddingError::EmptyInput => ApiError::BadRequest(e.to_string()),
            other => {
                error!(error = %other, "Embedding model failure");
                ApiError::ServiceUnavailable(format!("Embedding model unavailable: {}", other))
            }
        }
    }
}

impl From<ScoringError> for ApiError {
    fn from(e: ScoringError) -> Self {
        // Stored vectors from another model version
        ApiError::InternalServer(format!("Similarity scoring failed: {}", e))
    }
}

impl From<EvaluationError> for ApiError {
    fn from(e: EvaluationError) -> Self {
        match e {
            EvaluationError::Llm(LlmError::NotConfigured) => {
                ApiError::ServiceUnavailable("LLM API key is not configured".to_string())
            }
            EvaluationError::Llm(inner) => {
                error!(error = %inner, "LLM request failed");
                ApiError::UpstreamError(format!("LLM request failed: {}", inner))
            }
            EvaluationError::Malformed(_) | EvaluationError::Schema { .. } => {
                error!(error = %e, "LLM response rejected");
                ApiError::UpstreamError(format!("LLM response rejected: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = vec![
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (
                ApiError::UnsupportedMedia("x".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (
                ApiError::UnprocessableDocument("x".into()),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (ApiError::UpstreamError("x".into()), StatusCode::BAD_GATEWAY),
            (
                ApiError::ServiceUnavailable("x".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_schema_violation_maps_to_bad_gateway() {
        let err: ApiError = EvaluationError::Schema {
            field: "fit_score",
            reason: "must be an integer in 1..=10".to_string(),
        }
        .into();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_missing_api_key_maps_to_unavailable() {
        let err: ApiError = EvaluationError::Llm(LlmError::NotConfigured).into();
        assert_eq!(err.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_pdf_errors_map_by_kind() {
        let err: ApiError = PdfError::UnsupportedFormat("docx".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);

        let err: ApiError = PdfError::Unreadable("bad xref".into()).into();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
