// src/logging_middleware.rs
//! Middleware for logging request and response bodies in debug mode

use axum::body::to_bytes;
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Longest body text written to the log
const MAX_LOGGED_BODY: usize = 4096;

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.starts_with("multipart/"))
        .unwrap_or(false)
}

/// Pretty JSON when possible, otherwise the raw text, cut to `MAX_LOGGED_BODY`
fn render_body(bytes: &[u8]) -> Option<String> {
    let body_str = std::str::from_utf8(bytes).ok()?;
    let rendered = match serde_json::from_str::<serde_json::Value>(body_str) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body_str.to_string()),
        Err(_) => body_str.to_string(),
    };
    Some(rendered.chars().take(MAX_LOGGED_BODY).collect())
}

/// Middleware to log request and response bodies in debug mode.
/// File uploads are logged by size only.
pub async fn log_request_response(request: Request, next: Next) -> Result<Response, StatusCode> {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return Ok(next.run(request).await);
    }

    let request = if is_multipart(request.headers()) {
        debug!(
            method = %request.method(),
            uri = %request.uri(),
            content_length = ?request.headers().get(header::CONTENT_LENGTH),
            "📥 Request (multipart)"
        );
        request
    } else {
        let (parts, body) = request.into_parts();
        let bytes = to_bytes(body, usize::MAX)
            .await
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

        if !bytes.is_empty() {
            match render_body(&bytes) {
                Some(body) => debug!(
                    method = %parts.method,
                    uri = %parts.uri,
                    request_body = %body,
                    "📥 Request"
                ),
                None => debug!(
                    method = %parts.method,
                    uri = %parts.uri,
                    size = bytes.len(),
                    "📥 Request (binary)"
                ),
            }
        }

        Request::from_parts(parts, Body::from(bytes))
    };

    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let bytes = to_bytes(body, usize::MAX)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    if !bytes.is_empty() {
        match render_body(&bytes) {
            Some(body) => debug!(status = %parts.status, response_body = %body, "📤 Response"),
            None => debug!(status = %parts.status, size = bytes.len(), "📤 Response (binary)"),
        }
    }

    Ok(Response::from_parts(parts, Body::from(bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_body_pretty_prints_json() {
        let rendered = render_body(br#"{"a":1}"#).unwrap();
        assert_eq!(rendered, "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_render_body_skips_binary() {
        assert!(render_body(&[0xff, 0xfe, 0x00]).is_none());
    }

    #[test]
    fn test_render_body_truncates() {
        let long = "x".repeat(MAX_LOGGED_BODY * 2);
        assert_eq!(render_body(long.as_bytes()).unwrap().len(), MAX_LOGGED_BODY);
    }

    #[test]
    fn test_is_multipart() {
        let mut headers = HeaderMap::new();
        assert!(!is_multipart(&headers));
        headers.insert(
            header::CONTENT_TYPE,
            "multipart/form-data; boundary=abc".parse().unwrap(),
        );
        assert!(is_multipart(&headers));
    }
}
