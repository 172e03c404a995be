//! Test app builder over the production router.
//!
//! [`TestAppBuilder`] calls the same [`raffle_api::http::app`] that `main.rs`
//! uses, with an injectable directory service and per-test CORS and
//! security header settings.
//!
//! # Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_full_app() {
//!     let app = TestAppBuilder::new()
//!         .with_directory(Arc::new(StaticDirectory::new(members)))
//!         .with_cors(&["http://localhost:3000"])
//!         .build();
//! }
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use raffle_api::{
    config::{CorsConfig, SecurityHeadersConfig},
    directory::{CanonicalMember, DirectoryError, DirectoryRequest, DirectoryService},
    http::{self, RaffleState},
};
use std::sync::Mutex;

/// Directory service returning a fixed snapshot and recording requests.
pub struct StaticDirectory {
    members: Vec<CanonicalMember>,
    requests: Mutex<Vec<DirectoryRequest>>,
}

impl StaticDirectory {
    pub fn new(members: Vec<CanonicalMember>) -> Self {
        Self {
            members,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<DirectoryRequest> {
        self.requests.lock().expect("lock").clone()
    }
}

#[async_trait]
impl DirectoryService for StaticDirectory {
    async fn build_directory(
        &self,
        request: &DirectoryRequest,
    ) -> Result<Vec<CanonicalMember>, DirectoryError> {
        self.requests.lock().expect("lock").push(request.clone());
        Ok(self.members.clone())
    }
}

/// Builder for test applications that mirrors main.rs wiring.
pub struct TestAppBuilder {
    /// Directory service (None simulates a missing API key)
    directory: Option<Arc<dyn DirectoryService>>,
    cors: CorsConfig,
    security_headers: SecurityHeadersConfig,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAppBuilder {
    /// App without a directory service and without security headers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            directory: None,
            cors: CorsConfig::default(),
            security_headers: SecurityHeadersConfig {
                enabled: false,
                ..SecurityHeadersConfig::default()
            },
        }
    }

    #[must_use]
    pub fn with_directory(mut self, directory: Arc<dyn DirectoryService>) -> Self {
        self.directory = Some(directory);
        self
    }

    /// Configure CORS with specific allowed origins.
    #[must_use]
    pub fn with_cors(mut self, origins: &[&str]) -> Self {
        self.cors.allowed_origins = origins.iter().map(|s| (*s).to_string()).collect();
        self
    }

    #[must_use]
    pub fn with_security_headers(mut self, config: SecurityHeadersConfig) -> Self {
        self.security_headers = config;
        self
    }

    #[must_use]
    pub fn with_security_headers_default(self) -> Self {
        self.with_security_headers(SecurityHeadersConfig::default())
    }

    #[must_use]
    pub fn build(self) -> Router {
        let state = self
            .directory
            .map_or_else(RaffleState::unconfigured, RaffleState::new);
        http::app(state, &self.cors, &self.security_headers)
    }
}
