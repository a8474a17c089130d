use crate::rate_limit::RateLimiter;

// App's shared state. Built once at startup and handed to the router;
// the limiters live exactly as long as the process, nothing persists.
pub struct AppState {
    pub client: reqwest::Client,
    pub groq_url: String,
    pub model: String,
    pub api_key: Option<String>, // from GROQ_API_KEY, checked per request
    pub chat_limiter: RateLimiter,
    pub emoji_limiter: RateLimiter,
}
