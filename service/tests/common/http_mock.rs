//! HTTP mock server helpers for testing outbound Whop API calls.
//!
//! This module provides a thin wrapper around `wiremock` for declarative
//! HTTP stubbing.
//!
//! # Quick Start
//!
//! ```ignore
//! use crate::common::http_mock::MockHttpServer;
//!
//! #[tokio::test]
//! async fn test_external_api_call() {
//!     let server = MockHttpServer::start().await;
//!
//!     server
//!         .expect_get("/v5/app/memberships")
//!         .with_query("page", "1")
//!         .respond_with_json(json!({"data": []}))
//!         .mount()
//!         .await;
//!
//!     let client = HttpWhopClient::new(server.url(), "test-key");
//! }
//! ```
//!
//! # Patterns
//!
//! - **Success response**: `.respond_with_json(value)`
//! - **Error response**: `.respond_with_status(500)` plus optional `.with_json_response(value)`
//! - **Timeout simulation**: `.respond_with_delay(Duration::from_secs(30))`
//! - **Request verification**: `.expect_times(1)` then `server.verify().await`

#![allow(dead_code)]

use std::time::Duration;

use serde_json::Value;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A running stub server.
pub struct MockHttpServer {
    server: MockServer,
}

impl MockHttpServer {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to hand to the client under test.
    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Underlying wiremock server, for matchers this wrapper does not cover.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// Start stubbing a GET request to `path`.
    pub fn expect_get(&self, path: &str) -> StubBuilder<'_> {
        StubBuilder {
            server: &self.server,
            path: path.to_string(),
            headers: Vec::new(),
            query: Vec::new(),
            status: 200,
            body: None,
            text: None,
            delay: None,
            times: None,
        }
    }

    /// Assert every `expect_times` expectation was met.
    pub async fn verify(&self) {
        self.server.verify().await;
    }

    /// Number of requests received so far on `path`.
    pub async fn request_count(&self, path: &str) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == path)
            .count()
    }

    /// Values of query parameter `key` across requests to `path`, in order.
    pub async fn query_values(&self, path: &str, key: &str) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.url.path() == path)
            .filter_map(|r| {
                r.url
                    .query_pairs()
                    .find(|(k, _)| k == key)
                    .map(|(_, v)| v.into_owned())
            })
            .collect()
    }
}

/// Builder for a single stubbed endpoint.
pub struct StubBuilder<'a> {
    server: &'a MockServer,
    path: String,
    headers: Vec<(String, String)>,
    query: Vec<(String, String)>,
    status: u16,
    body: Option<Value>,
    text: Option<String>,
    delay: Option<Duration>,
    times: Option<u64>,
}

impl StubBuilder<'_> {
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn respond_with_json(mut self, body: Value) -> Self {
        self.status = 200;
        self.body = Some(body);
        self
    }

    pub fn respond_with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    /// Attach a JSON body without changing the status.
    pub fn with_json_response(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a raw text body without changing the status.
    pub fn with_text_response(mut self, body: &str) -> Self {
        self.text = Some(body.to_string());
        self
    }

    pub fn respond_with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn expect_times(mut self, times: u64) -> Self {
        self.times = Some(times);
        self
    }

    pub async fn mount(self) {
        let mut builder = Mock::given(method("GET")).and(path(self.path.as_str()));
        for (name, value) in self.headers {
            builder = builder.and(header(name.as_str(), value.as_str()));
        }
        for (key, value) in self.query {
            builder = builder.and(query_param(key, value));
        }

        let mut template = ResponseTemplate::new(self.status);
        if let Some(body) = self.body {
            template = template.set_body_json(body);
        }
        if let Some(text) = self.text {
            template = template.set_body_string(text);
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }

        let mut mock = builder.respond_with(template);
        if let Some(times) = self.times {
            mock = mock.expect(times);
        }
        mock.mount(self.server).await;
    }
}
