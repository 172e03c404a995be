//! Member directory aggregation.
//!
//! A directory build walks the Whop memberships endpoint page by page,
//! resolves a display name for every membership and, when more than half of
//! those names are synthetic placeholders, cross-references the members
//! endpoint by user id to find better ones.
//!
//! # Architecture
//!
//! - [`pager`] - Sequential page walker with page-size and page-count caps
//! - [`names`] - Display name precedence and generic-name classification
//! - [`aggregator`] - [`DirectoryService`] orchestration and enrichment merge
//!
//! Enrichment is best effort: a failing members endpoint leaves the
//! membership names in place and the build still succeeds.

pub mod aggregator;
pub mod names;
pub mod pager;
mod types;

pub use aggregator::{DirectoryError, DirectoryService, DirectorySettings, WhopDirectory};
pub use types::{CanonicalMember, DirectoryRequest};
