use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// Gateway chat request body
#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
}

// Gateway chat response body
#[derive(Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

// Emoji generator response body
#[derive(Serialize)]
pub struct EmojiResponse {
    pub emoji: String,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

// OpenAI-compatible chat completion request (Groq speaks this format)
#[derive(Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

// Chat completion response - only the fields the gateway reads
#[derive(Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
}

// Error envelope returned by the completion API
#[derive(Deserialize, Default)]
pub struct UpstreamError {
    #[serde(default)]
    pub error: Option<UpstreamErrorDetail>,
}

#[derive(Deserialize)]
pub struct UpstreamErrorDetail {
    pub message: String,
}
