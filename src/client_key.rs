use axum::http::HeaderMap;
use std::net::SocketAddr;

// Request metadata the client key is derived from, decoupled from the
// HTTP layer so resolution stays a pure function
pub struct ClientInfo {
    pub forwarded_for: Option<String>,
    pub peer_addr: Option<String>,
}

impl ClientInfo {
    pub fn from_request(headers: &HeaderMap, peer: Option<SocketAddr>) -> Self {
        Self {
            forwarded_for: headers
                .get("x-forwarded-for")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            peer_addr: peer.map(|addr| addr.ip().to_string()),
        }
    }
}

// Resolve the rate-limiting key for a caller.
//
// Prefers the first entry of X-Forwarded-For, falls back to the peer
// address, then to "unknown". The header is client-suppliable, so this
// is only trustworthy behind a reverse proxy that overwrites it.
pub fn resolve(info: &ClientInfo) -> String {
    if let Some(forwarded) = info.forwarded_for.as_deref() {
        if !forwarded.is_empty() {
            return forwarded
                .split(',')
                .next()
                .unwrap_or_default()
                .trim()
                .to_string();
        }
    }
    match &info.peer_addr {
        Some(addr) => addr.clone(),
        None => "unknown".to_string(),
    }
}
