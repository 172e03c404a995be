//! Common test utilities for integration tests.
//!
//! This module provides:
//!
//! - [`app_builder::TestAppBuilder`] - Build test Axum apps that mirror main.rs wiring
//! - [`http_mock::MockHttpServer`] - Stub the Whop API over real HTTP
//! - [`factories`] - JSON payload builders for Whop records
//!
//! # App Builder Usage
//!
//! ```ignore
//! use crate::common::app_builder::TestAppBuilder;
//!
//! #[tokio::test]
//! async fn test_with_app() {
//!     let app = TestAppBuilder::new().with_directory(mock).build();
//!     // Use app.oneshot(...) to send requests
//! }
//! ```

pub mod app_builder;
pub mod factories;
pub mod http_mock;
