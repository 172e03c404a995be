//! Wire types for Whop API responses.
//!
//! Everything here is ephemeral: records live only for the duration of one
//! fetch pass before being resolved into [`crate::directory::CanonicalMember`].

use serde::{Deserialize, Deserializer};

/// User profile embedded in a membership record.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawUser {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
}

/// A record from the memberships endpoint.
///
/// Authoritative for who is currently a member, but frequently missing
/// curated display fields.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawMembership {
    /// Opaque membership identifier (e.g. "mem_00001234")
    pub id: String,
    pub status: Option<String>,
    pub display_name: Option<String>,
    /// Embedded profile; a bare id string is read as a profile with only `id`.
    #[serde(default, deserialize_with = "deserialize_user")]
    pub user: Option<RawUser>,
}

fn deserialize_user<'de, D>(deserializer: D) -> Result<Option<RawUser>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum UserField {
        Embedded(RawUser),
        Id(String),
    }

    Ok(Option::<UserField>::deserialize(deserializer)?.map(|field| match field {
        UserField::Embedded(user) => user,
        UserField::Id(id) => RawUser {
            id: Some(id),
            ..RawUser::default()
        },
    }))
}

impl RawMembership {
    /// Underlying account id, used as the enrichment join key.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.id.as_deref())
            .filter(|id| !id.trim().is_empty())
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|u| u.email.as_deref())
            .filter(|e| !e.trim().is_empty())
    }
}

/// A record from the members endpoint (enrichment only).
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawMember {
    pub id: Option<String>,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub name: Option<String>,
    pub handle: Option<String>,
    pub slug: Option<String>,
    pub email: Option<String>,
}

impl RawMember {
    /// Key used to join against a membership's user id.
    ///
    /// Prefers a non-blank `user_id` and falls back to the record's own id.
    #[must_use]
    pub fn join_key(&self) -> Option<&str> {
        let non_blank = |key: &&str| !key.trim().is_empty();
        self.user_id
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.id.as_deref().filter(non_blank))
    }
}

/// Pagination metadata attached to list responses.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: Option<u64>,
    pub total_pages: Option<u64>,
    pub next_page: Option<u64>,
    pub total_count: Option<u64>,
}

impl Pagination {
    /// A missing or zero `next_page` marks the last page.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        matches!(self.next_page, Some(n) if n > 0)
    }
}

/// Response from the memberships endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MembershipsResponse {
    #[serde(default)]
    pub data: Vec<RawMembership>,
    #[serde(default)]
    pub pagination: Pagination,
}

impl MembershipsResponse {
    #[must_use]
    pub fn into_page(self) -> Page<RawMembership> {
        Page {
            has_next: self.pagination.has_next(),
            records: self.data,
        }
    }
}

/// Response from the members endpoint.
///
/// The endpoint has been observed to answer with either a bare array or an
/// object wrapping the records under `data` or `members`. The shape is
/// settled here so callers only ever see a [`Page`].
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum MembersPayload {
    Bare(Vec<RawMember>),
    Wrapped(MembersEnvelope),
}

#[derive(Debug, Clone, Deserialize)]
pub struct MembersEnvelope {
    #[serde(alias = "members")]
    pub data: Vec<RawMember>,
    pub pagination: Option<Pagination>,
}

impl MembersPayload {
    /// Normalize into a page.
    ///
    /// Without pagination metadata a full page (`len >= per`) is taken to
    /// mean more records may follow.
    #[must_use]
    pub fn into_page(self, per: u32) -> Page<RawMember> {
        let (records, pagination) = match self {
            Self::Bare(records) => (records, None),
            Self::Wrapped(envelope) => (envelope.data, envelope.pagination),
        };
        let has_next = pagination.map_or_else(
            || u32::try_from(records.len()).is_ok_and(|len| len >= per),
            |p| p.has_next(),
        );
        Page { records, has_next }
    }
}

/// One page of records plus whether the endpoint reported a further page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub records: Vec<T>,
    pub has_next: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub const fn new(records: Vec<T>, has_next: bool) -> Self {
        Self { records, has_next }
    }

    /// A final page holding `records`.
    #[must_use]
    pub const fn last(records: Vec<T>) -> Self {
        Self::new(records, false)
    }
}

/// Page coordinates sent with a list request. Pages are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per: u32,
}

/// Filter applied to the memberships endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipFilter {
    pub status: String,
    pub company_id: Option<String>,
}
