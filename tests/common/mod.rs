//! Shared helpers: start the real router on an ephemeral port.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use site_api::app;
use site_api::rate_limit::{RateLimitPolicy, RateLimiter};
use site_api::search::SearchIndex;
use site_api::state::AppState;

pub struct TestServer {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

pub async fn start_server(max_per_window: u32, window: Duration) -> TestServer {
    let limiter = RateLimiter::new(RateLimitPolicy {
        max_per_window,
        window,
    });
    let state = Arc::new(AppState::new(limiter, SearchIndex::builtin()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.unwrap();
    });

    TestServer {
        addr,
        client: reqwest::Client::new(),
    }
}

#[allow(dead_code)]
pub fn chatbot_event(message_id: &str) -> serde_json::Value {
    serde_json::json!({
        "messageId": message_id,
        "sessionId": "session-1",
        "userMessage": "Do you offer SAP BTP integration?"
    })
}
