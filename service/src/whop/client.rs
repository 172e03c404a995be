//! Whop API client for listing community memberships.
//!
//! This module provides a trait-based HTTP client for the two list endpoints
//! the directory depends on. The trait abstraction enables:
//!
//! - Scripted page sequences in unit tests ([`mock::MockWhopClient`])
//! - HTTP-level testing with `MockHttpServer` in integration tests
//!
//! # Example
//!
//! ```ignore
//! use raffle_api::whop::{HttpWhopClient, MembershipFilter, PageRequest, WhopApiClient};
//!
//! let client = HttpWhopClient::new("https://api.whop.com", "my-api-key");
//! let filter = MembershipFilter { status: "active".into(), company_id: None };
//! let page = client.list_memberships(&filter, PageRequest { page: 1, per: 50 }).await?;
//! println!("{} memberships, more: {}", page.records.len(), page.has_next);
//! ```

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::{
    MembersPayload, MembershipFilter, MembershipsResponse, Page, PageRequest, RawMember,
    RawMembership,
};
use crate::config::WhopConfig;

/// Path of the primary, membership-state endpoint.
pub const MEMBERSHIPS_PATH: &str = "/v5/app/memberships";
/// Path of the secondary, profile-rich endpoint.
pub const MEMBERS_PATH: &str = "/v5/app/members";

/// Errors that can occur when calling the Whop API.
#[derive(Debug, Error)]
pub enum WhopApiError {
    /// No API key was configured
    #[error("Missing Whop API key")]
    MissingApiKey,

    /// HTTP request failed (connection, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// API returned a non-success status
    #[error("Whop {path} HTTP {status}: {message}")]
    ApiError {
        path: &'static str,
        status: u16,
        message: String,
    },

    /// Response body did not have the expected shape
    #[error("Malformed response from Whop {path}: {source}")]
    Malformed {
        path: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Trait for Whop list operations, one page per call.
#[async_trait]
pub trait WhopApiClient: Send + Sync {
    /// Fetch one page of memberships matching `filter`.
    async fn list_memberships(
        &self,
        filter: &MembershipFilter,
        page: PageRequest,
    ) -> Result<Page<RawMembership>, WhopApiError>;

    /// Fetch one page of member profiles, optionally scoped to a company.
    async fn list_members(
        &self,
        company_id: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<RawMember>, WhopApiError>;
}

/// HTTP-based implementation of `WhopApiClient`.
pub struct HttpWhopClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpWhopClient {
    /// Create a new client with the given base URL and API key.
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Create a client with a custom `reqwest::Client` (for testing with custom config).
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    /// Build a client from configuration, applying the per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`WhopApiError::MissingApiKey`] if no key is configured, or
    /// [`WhopApiError::Request`] if the HTTP client cannot be built.
    pub fn from_config(config: &WhopConfig) -> Result<Self, WhopApiError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .ok_or(WhopApiError::MissingApiKey)?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self::with_client(
            client,
            config.base_url.trim_end_matches('/'),
            api_key,
        ))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, WhopApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .query(query)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(WhopApiError::ApiError {
                path,
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| WhopApiError::Malformed { path, source })
    }
}

#[async_trait]
impl WhopApiClient for HttpWhopClient {
    async fn list_memberships(
        &self,
        filter: &MembershipFilter,
        page: PageRequest,
    ) -> Result<Page<RawMembership>, WhopApiError> {
        let mut query = vec![
            ("per", page.per.to_string()),
            ("page", page.page.to_string()),
            ("status", filter.status.clone()),
        ];
        if let Some(company_id) = &filter.company_id {
            query.push(("company_id", company_id.clone()));
        }

        let response: MembershipsResponse = self.get_json(MEMBERSHIPS_PATH, &query).await?;
        Ok(response.into_page())
    }

    async fn list_members(
        &self,
        company_id: Option<&str>,
        page: PageRequest,
    ) -> Result<Page<RawMember>, WhopApiError> {
        let mut query = vec![
            ("per", page.per.to_string()),
            ("page", page.page.to_string()),
        ];
        if let Some(company_id) = company_id {
            query.push(("company_id", company_id.to_string()));
        }

        let payload: MembersPayload = self.get_json(MEMBERS_PATH, &query).await?;
        Ok(payload.into_page(page.per))
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[allow(
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::missing_const_for_fn,
    clippy::must_use_candidate
)]
pub mod mock {
    //! Mock implementation for unit testing.

    use super::{
        MembershipFilter, Page, PageRequest, RawMember, RawMembership, WhopApiClient,
        WhopApiError,
    };
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Mock implementation of `WhopApiClient` for unit tests.
    ///
    /// Queue page results with `push_*` methods; each call pops the next one.
    /// Once a queue is drained, calls return an empty final page. Verify
    /// requests with `membership_calls()` and `member_calls()`.
    pub struct MockWhopClient {
        membership_pages: Mutex<VecDeque<Result<Page<RawMembership>, WhopApiError>>>,
        member_pages: Mutex<VecDeque<Result<Page<RawMember>, WhopApiError>>>,
        membership_calls: Mutex<Vec<(MembershipFilter, PageRequest)>>,
        member_calls: Mutex<Vec<(Option<String>, PageRequest)>>,
    }

    impl MockWhopClient {
        pub fn new() -> Self {
            Self {
                membership_pages: Mutex::new(VecDeque::new()),
                member_pages: Mutex::new(VecDeque::new()),
                membership_calls: Mutex::new(Vec::new()),
                member_calls: Mutex::new(Vec::new()),
            }
        }

        /// Queue the result for the next `list_memberships` call.
        pub fn push_membership_page(&self, result: Result<Page<RawMembership>, WhopApiError>) {
            self.membership_pages.lock().unwrap().push_back(result);
        }

        /// Queue the result for the next `list_members` call.
        pub fn push_member_page(&self, result: Result<Page<RawMember>, WhopApiError>) {
            self.member_pages.lock().unwrap().push_back(result);
        }

        /// Get all filters and page coordinates passed to `list_memberships`.
        pub fn membership_calls(&self) -> Vec<(MembershipFilter, PageRequest)> {
            self.membership_calls.lock().unwrap().clone()
        }

        /// Get all company ids and page coordinates passed to `list_members`.
        pub fn member_calls(&self) -> Vec<(Option<String>, PageRequest)> {
            self.member_calls.lock().unwrap().clone()
        }
    }

    impl Default for MockWhopClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl WhopApiClient for MockWhopClient {
        async fn list_memberships(
            &self,
            filter: &MembershipFilter,
            page: PageRequest,
        ) -> Result<Page<RawMembership>, WhopApiError> {
            self.membership_calls
                .lock()
                .unwrap()
                .push((filter.clone(), page));

            self.membership_pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Page::last(Vec::new())))
        }

        async fn list_members(
            &self,
            company_id: Option<&str>,
            page: PageRequest,
        ) -> Result<Page<RawMember>, WhopApiError> {
            self.member_calls
                .lock()
                .unwrap()
                .push((company_id.map(String::from), page));

            self.member_pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Page::last(Vec::new())))
        }
    }
}
