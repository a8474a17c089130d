use axum::Json;
use axum::extract::{ConnectInfo, State};
use axum::http::HeaderMap;
use rand::seq::SliceRandom;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

use crate::client_key::{self, ClientInfo};
use crate::error::ApiError;
use crate::metrics::{RATE_LIMITED_TOTAL, REQUEST_TOTAL};
use crate::models::EmojiResponse;
use crate::rate_limit::{Verdict, retry_after_secs};
use crate::state::AppState;

const EMOJIS: &[&str] = &[
    "😀", "😃", "😄", "😁", "😆", "😅", "🤣", "😂", "🙂", "🙃", "😉", "😊", "😇", "😍", "🤩",
    "😘", "😗", "😜", "🤪", "😎", "🤠", "🧐", "🤓", "😏", "😬", "😮", "😲", "😴", "🥳", "🙌",
    "👏", "👍", "🤝", "🔥", "⭐", "🌟", "⚡", "🎮", "🕹️", "🏆",
];

// Picks one random emoji, behind the emoji guard (one request per window)
pub async fn emoji_handler(
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
) -> Result<Json<EmojiResponse>, ApiError> {
    REQUEST_TOTAL.inc();

    let key = client_key::resolve(&ClientInfo::from_request(&headers, Some(peer)));
    if let Verdict::Deny { retry_after } = state.emoji_limiter.check(&key, Instant::now()) {
        let secs = retry_after_secs(retry_after);
        RATE_LIMITED_TOTAL.inc();
        debug!(%key, secs, "emoji request rate limited");
        return Err(ApiError::RateLimited {
            retry_after_secs: secs,
            message: format!("Wait {} seconds before generating again.", secs),
        });
    }

    let emoji = EMOJIS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("🎮");

    Ok(Json(EmojiResponse {
        emoji: emoji.to_string(),
        generated_at: chrono::Utc::now(),
    }))
}
