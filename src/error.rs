use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

// Errors surfaced by the gateway handlers. Upstream failures are passed
// through as-is, never retried or reinterpreted here.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{message}")]
    RateLimited { retry_after_secs: u64, message: String },

    #[error("{0}")]
    InvalidRequest(String),

    #[error("GROQ_API_KEY is not set on the server.")]
    MissingApiKey,

    #[error("{0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        let body = Json(json!({ "message": self.to_string() }));

        match self {
            ApiError::RateLimited {
                retry_after_secs, ..
            } => (
                status,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            _ => (status, body).into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn rate_limited_renders_429_with_retry_after() {
        let error = ApiError::RateLimited {
            retry_after_secs: 60,
            message: "Try again in 60 seconds.".to_string(),
        };
        let response = error.into_response();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get(header::RETRY_AFTER).unwrap(),
            "60"
        );

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["message"], "Try again in 60 seconds.");
    }

    #[tokio::test]
    async fn upstream_renders_502_without_retry_after() {
        let response = ApiError::Upstream("boom".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert!(response.headers().get(header::RETRY_AFTER).is_none());
    }
}
