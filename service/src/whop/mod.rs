//! Whop API client module.
//!
//! Provides the HTTP client abstraction for the membership platform the
//! directory is built from.
//!
//! # Architecture
//!
//! - [`WhopApiClient`] - Trait defining one-page list operations
//! - [`HttpWhopClient`] - Real HTTP implementation using reqwest
//! - [`mock::MockWhopClient`] - Scripted pages for unit tests (behind `test-utils` feature)
//!
//! Two endpoints are consumed:
//!
//! - `memberships` (primary): authoritative membership state, paged with
//!   `pagination.next_page` metadata.
//! - `members` (secondary): richer profile fields, answered either as a bare
//!   array or wrapped in `data`/`members`. See [`MembersPayload`].
//!
//! # Testing Patterns
//!
//! ```ignore
//! use raffle_api::whop::{mock::MockWhopClient, Page};
//!
//! let mock = MockWhopClient::new();
//! mock.push_membership_page(Ok(Page::new(vec![membership], true)));
//! mock.push_membership_page(Ok(Page::last(vec![])));
//! ```

mod client;
mod types;

pub use client::{HttpWhopClient, WhopApiClient, WhopApiError, MEMBERSHIPS_PATH, MEMBERS_PATH};
pub use types::{
    MembersEnvelope, MembersPayload, MembershipFilter, MembershipsResponse, Page, PageRequest,
    Pagination, RawMember, RawMembership, RawUser,
};

#[cfg(any(test, feature = "test-utils"))]
pub use client::mock;
