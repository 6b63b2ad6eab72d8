// Common test utilities and fixtures
#![allow(dead_code)]

use axum_test::TestServer;
use conoha_api::app::{build_app, AppState};
use conoha_providers::mock::MockProvider;
use conoha_providers::Credentials;
use std::sync::Arc;

pub fn test_credentials() -> Credentials {
    Credentials::new("gncu1".into(), "pw".into(), "tenant".into())
}

/// Create a test server backed by the given mock provider
pub fn create_test_server(provider: Arc<MockProvider>) -> TestServer {
    let state = AppState::new(test_credentials(), provider);
    TestServer::new(build_app(state)).unwrap()
}

/// One parsed SSE event: (event name, JSON data).
pub type SseEvent = (String, serde_json::Value);

/// Parse a complete `text/event-stream` body.
pub fn parse_sse(body: &str) -> Vec<SseEvent> {
    body.split("\n\n")
        .filter(|block| !block.trim().is_empty())
        .filter_map(|block| {
            let mut name = String::from("message");
            let mut data = String::new();
            for line in block.lines() {
                if let Some(v) = line.strip_prefix("event:") {
                    name = v.trim_start().to_string();
                } else if let Some(v) = line.strip_prefix("data:") {
                    data.push_str(v.trim_start());
                }
            }
            if data.is_empty() {
                return None;
            }
            Some((name, serde_json::from_str(&data).unwrap()))
        })
        .collect()
}
