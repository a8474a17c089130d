use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "assistant-gateway")]
#[command(about = "Rate-limited gateway for the site assistant and emoji generator")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base URL of the OpenAI-compatible completion API
    #[arg(long, default_value = "https://api.groq.com/openai/v1")]
    pub groq_url: String,

    // Model passed to the completion API
    #[arg(long, default_value = "llama-3.1-8b-instant")]
    pub model: String,

    // Chat guard: max requests per window
    #[arg(long, default_value_t = 5)]
    pub chat_rate_limit: u32,

    // Chat guard: window in seconds
    #[arg(long, default_value_t = 60)]
    pub chat_rate_window: u64,

    // Emoji guard: window in seconds (one request allowed per window)
    #[arg(long, default_value_t = 10)]
    pub emoji_rate_window: u64,
}
