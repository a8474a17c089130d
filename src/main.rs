use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use assistant_gateway::app;
use assistant_gateway::config::Args;
use assistant_gateway::rate_limit::RateLimiter;
use assistant_gateway::state::AppState;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let api_key = std::env::var("GROQ_API_KEY").ok();

    let state = Arc::new(AppState {
        client: reqwest::Client::new(),
        groq_url: args.groq_url.clone(),
        model: args.model.clone(),
        api_key,
        chat_limiter: RateLimiter::new(
            args.chat_rate_limit,
            Duration::from_secs(args.chat_rate_window),
        ),
        emoji_limiter: RateLimiter::new(1, Duration::from_secs(args.emoji_rate_window)),
    });

    if state.api_key.is_none() {
        warn!("GROQ_API_KEY is not set; /api/chat will answer with errors");
    }

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("gateway running on http://localhost:{}", args.port);
    info!("forwarding chat completions to {} (model {})", args.groq_url, args.model);
    info!(
        "chat guard: {} requests per {} seconds",
        args.chat_rate_limit, args.chat_rate_window
    );
    info!("emoji guard: 1 request per {} seconds", args.emoji_rate_window);

    axum::serve(
        listener,
        app(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
}
