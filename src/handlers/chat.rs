use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use crate::client_key::{self, ClientInfo};
use crate::error::ApiError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL, TRACKED_CLIENTS, UPSTREAM_LATENCY};
use crate::models::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRequest, ChatResponse,
    UpstreamError,
};
use crate::rate_limit::{Verdict, retry_after_secs};
use crate::state::AppState;

const SYSTEM_PROMPT: &str = "You are the site assistant for a community game review site. \
Answer briefly and in a friendly tone. Focus on the site features: reviewer sign-up, the game \
catalog, reviews on game detail pages, and the privacy policy. If you do not know the answer, \
point the user to the admins via the help page.";

// Forwards one question to the completion API, behind the chat guard.
// The guard is consulted before anything else so a denied request never
// touches the (billed) upstream, not even for input validation.
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let key = client_key::resolve(&ClientInfo::from_request(&headers, Some(peer)));
    if let Verdict::Deny { retry_after } = state.chat_limiter.check(&key, Instant::now()) {
        let secs = retry_after_secs(retry_after);
        RATE_LIMITED_TOTAL.inc();
        debug!(%key, secs, "chat request rate limited");
        return Err(ApiError::RateLimited {
            retry_after_secs: secs,
            message: format!(
                "Limit of {} questions per minute reached. Try again in {} seconds.",
                state.chat_limiter.max_count(),
                secs
            ),
        });
    }
    TRACKED_CLIENTS.set(state.chat_limiter.tracked_keys() as f64);

    let message = payload.message.as_deref().map(str::trim).unwrap_or("");
    if message.is_empty() {
        return Err(ApiError::InvalidRequest("Invalid message.".to_string()));
    }

    let api_key = state.api_key.as_deref().ok_or(ApiError::MissingApiKey)?;

    let request = ChatCompletionRequest {
        model: state.model.clone(),
        temperature: 0.4,
        messages: vec![
            ChatMessage {
                role: "system".to_string(),
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: message.to_string(),
            },
        ],
    };

    let start = Instant::now();
    let response = state
        .client
        .post(format!("{}/chat/completions", state.groq_url))
        .bearer_auth(api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| {
            warn!(error = %e, "chat completion request failed");
            ApiError::Upstream("Failed to reach the AI service.".to_string())
        })?;
    UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());

    if !response.status().is_success() {
        let status = response.status();
        let detail = response
            .json::<UpstreamError>()
            .await
            .ok()
            .and_then(|body| body.error)
            .map(|error| error.message)
            .unwrap_or_else(|| "Failed to fetch an answer from the AI.".to_string());
        warn!(%status, "chat completion returned an error");
        return Err(ApiError::Upstream(detail));
    }

    let completion: ChatCompletionResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Upstream(format!("Parse error: {}", e)))?;

    let reply = completion
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|reply| !reply.is_empty())
        .ok_or_else(|| ApiError::Upstream("The AI returned an empty answer.".to_string()))?;

    Ok(Json(ChatResponse { reply }))
}
