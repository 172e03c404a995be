//! JSON factories for Whop API payloads.

pub mod membership;

#[allow(unused_imports)]
pub use membership::{bare_membership, member_profile, membership_page, named_membership};
