//! Display name resolution for raw Whop records.
//!
//! Curated fields beat contact-derived ones. The synthetic fallback
//! (`"Member " + last four characters of the id`) guarantees a non-empty name
//! and is what the aggregator counts as a *generic* name.

use crate::whop::{RawMember, RawMembership};

/// Prefix shared by all synthetic fallback names.
pub const GENERIC_PREFIX: &str = "Member ";

/// Candidate name fields of a record, in precedence order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NameCandidates<'a> {
    pub display_name: Option<&'a str>,
    pub username: Option<&'a str>,
    pub name: Option<&'a str>,
    pub handle: Option<&'a str>,
    pub slug: Option<&'a str>,
    pub email: Option<&'a str>,
}

impl NameCandidates<'_> {
    /// First usable curated or contact-derived name, if any.
    #[must_use]
    pub fn best(&self) -> Option<String> {
        [
            self.display_name,
            self.username,
            self.name,
            self.handle,
            self.slug,
        ]
        .into_iter()
        .flatten()
        .find_map(non_blank)
        .or_else(|| self.email.and_then(email_local_part))
        .map(str::to_string)
    }
}

impl<'a> From<&'a RawMembership> for NameCandidates<'a> {
    fn from(record: &'a RawMembership) -> Self {
        let user = record.user.as_ref();

        Self {
            display_name: record
                .display_name
                .as_deref()
                .and_then(non_blank)
                .or_else(|| user.and_then(|u| u.display_name.as_deref())),
            username: user.and_then(|u| u.username.as_deref()),
            name: user.and_then(|u| u.name.as_deref()),
            handle: user.and_then(|u| u.handle.as_deref()),
            slug: user.and_then(|u| u.slug.as_deref()),
            email: user.and_then(|u| u.email.as_deref()),
        }
    }
}

impl<'a> From<&'a RawMember> for NameCandidates<'a> {
    fn from(record: &'a RawMember) -> Self {
        Self {
            display_name: record.display_name.as_deref(),
            username: record.username.as_deref(),
            name: record.name.as_deref(),
            handle: record.handle.as_deref(),
            slug: record.slug.as_deref(),
            email: record.email.as_deref(),
        }
    }
}

/// Resolve a never-empty display name for a record identified by `id`.
#[must_use]
pub fn resolve_name(candidates: &NameCandidates<'_>, id: &str) -> String {
    candidates.best().unwrap_or_else(|| fallback_name(id))
}

/// Synthetic name built from the last four characters of `id`.
#[must_use]
pub fn fallback_name(id: &str) -> String {
    let tail = id
        .char_indices()
        .rev()
        .nth(3)
        .map_or(id, |(idx, _)| &id[idx..]);
    format!("{GENERIC_PREFIX}{tail}")
}

/// Whether `name` looks like a synthetic fallback.
#[must_use]
pub fn is_generic(name: &str) -> bool {
    name.starts_with(GENERIC_PREFIX)
}

fn non_blank(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn email_local_part(email: &str) -> Option<&str> {
    email.split('@').next().and_then(non_blank)
}
