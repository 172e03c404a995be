//! Directory aggregation over the Whop memberships and members endpoints.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;

use super::names::{is_generic, resolve_name, NameCandidates};
use super::pager::{fetch_pages, EndpointCaps, PageLimits};
use super::types::{CanonicalMember, DirectoryRequest};
use crate::config::{DirectoryConfig, WhopConfig};
use crate::whop::{MembershipFilter, RawMember, RawMembership, WhopApiClient, WhopApiError};

/// Error from a directory build.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    /// No credential is available for the remote API.
    #[error("Missing Whop API key")]
    Configuration,
    /// The primary endpoint failed or returned an unexpected payload.
    #[error(transparent)]
    Remote(WhopApiError),
}

impl From<WhopApiError> for DirectoryError {
    fn from(err: WhopApiError) -> Self {
        match err {
            WhopApiError::MissingApiKey => Self::Configuration,
            other => Self::Remote(other),
        }
    }
}

/// Builds a fresh member snapshot per call. Nothing is cached.
#[async_trait]
pub trait DirectoryService: Send + Sync {
    async fn build_directory(
        &self,
        request: &DirectoryRequest,
    ) -> Result<Vec<CanonicalMember>, DirectoryError>;
}

/// Resolved directory settings: defaults, endpoint caps and enrichment tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectorySettings {
    pub default_company_id: Option<String>,
    pub default_per: u32,
    pub default_max_pages: u32,
    pub default_status: String,
    pub memberships_caps: EndpointCaps,
    pub members_caps: EndpointCaps,
    pub generic_threshold: f64,
    pub enrichment_record_limit: usize,
}

impl DirectorySettings {
    #[must_use]
    pub fn from_config(directory: &DirectoryConfig, whop: &WhopConfig) -> Self {
        Self {
            default_company_id: whop.company_id.clone(),
            default_per: directory.default_per,
            default_max_pages: directory.default_max_pages,
            default_status: directory.default_status.clone(),
            memberships_caps: EndpointCaps {
                max_per: directory.memberships_max_per,
                max_pages: directory.memberships_max_pages,
            },
            members_caps: EndpointCaps {
                max_per: directory.members_max_per,
                max_pages: directory.members_max_pages,
            },
            generic_threshold: directory.generic_threshold,
            enrichment_record_limit: directory.enrichment_record_limit,
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self::from_config(&DirectoryConfig::default(), &WhopConfig::default())
    }
}

/// [`DirectoryService`] backed by a [`WhopApiClient`].
pub struct WhopDirectory<C> {
    client: C,
    settings: DirectorySettings,
}

impl<C: WhopApiClient> WhopDirectory<C> {
    pub const fn new(client: C, settings: DirectorySettings) -> Self {
        Self { client, settings }
    }

    /// Access the underlying client (useful for inspecting mocks in tests).
    pub const fn client(&self) -> &C {
        &self.client
    }

    async fn fetch_memberships(
        &self,
        filter: &MembershipFilter,
        limits: PageLimits,
    ) -> Result<Vec<RawMembership>, WhopApiError> {
        let client = &self.client;
        fetch_pages(limits, move |page| client.list_memberships(filter, page)).await
    }

    async fn fetch_member_profiles(
        &self,
        company_id: Option<&str>,
    ) -> Result<Vec<RawMember>, WhopApiError> {
        let client = &self.client;
        let limits = PageLimits::for_record_limit(
            self.settings.enrichment_record_limit,
            self.settings.members_caps,
        );
        fetch_pages(limits, move |page| client.list_members(company_id, page)).await
    }

    /// Replace names from the members endpoint, best effort.
    ///
    /// Any failure leaves `members` untouched.
    async fn enrich(&self, members: &mut [CanonicalMember], company_id: Option<&str>) {
        let profiles = match self.fetch_member_profiles(company_id).await {
            Ok(profiles) => profiles,
            Err(e) => {
                tracing::warn!(error = %e, "member enrichment failed, keeping membership names");
                return;
            }
        };

        let enriched = apply_enrichment(members, &profiles);
        tracing::info!(profiles = profiles.len(), enriched, "enriched member names");
    }
}

#[async_trait]
impl<C: WhopApiClient> DirectoryService for WhopDirectory<C> {
    async fn build_directory(
        &self,
        request: &DirectoryRequest,
    ) -> Result<Vec<CanonicalMember>, DirectoryError> {
        let settings = &self.settings;
        let company_id = request
            .company_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .or_else(|| settings.default_company_id.clone());
        let filter = MembershipFilter {
            status: request
                .status
                .clone()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| settings.default_status.clone()),
            company_id: company_id.clone(),
        };
        let limits = PageLimits::coerce(
            request.per.unwrap_or_else(|| i64::from(settings.default_per)),
            request
                .max_pages
                .unwrap_or_else(|| i64::from(settings.default_max_pages)),
            settings.memberships_caps,
        );

        let memberships = self.fetch_memberships(&filter, limits).await?;
        let mut members = canonicalize(&memberships);

        let ratio = generic_ratio(&members);
        tracing::info!(
            total = members.len(),
            generic_ratio = ratio,
            company_id = company_id.as_deref().unwrap_or(""),
            status = %filter.status,
            "fetched memberships"
        );

        if !members.is_empty() && ratio > settings.generic_threshold {
            self.enrich(&mut members, company_id.as_deref()).await;
        }

        Ok(members)
    }
}

/// Resolve memberships into canonical members, keeping the first occurrence
/// of any repeated membership id.
#[must_use]
pub fn canonicalize(memberships: &[RawMembership]) -> Vec<CanonicalMember> {
    let mut seen = HashSet::with_capacity(memberships.len());
    let mut members = Vec::with_capacity(memberships.len());

    for record in memberships {
        if !seen.insert(record.id.as_str()) {
            tracing::debug!(id = %record.id, "dropping duplicate membership");
            continue;
        }
        members.push(CanonicalMember {
            id: record.id.clone(),
            user_id: record.user_id().map(String::from),
            name: resolve_name(&NameCandidates::from(record), &record.id),
            email: record.email().map(String::from),
        });
    }

    members
}

/// Share of members whose resolved name is a synthetic fallback.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn generic_ratio(members: &[CanonicalMember]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let generic = members.iter().filter(|m| is_generic(&m.name)).count();
    generic as f64 / members.len() as f64
}

/// Merge member profiles into `members` by user id and return how many
/// members matched.
///
/// Later profiles win on duplicate keys. Names are recomputed from the
/// profile when it has a usable candidate; email is only filled when absent.
pub fn apply_enrichment(members: &mut [CanonicalMember], profiles: &[RawMember]) -> usize {
    let index: HashMap<&str, &RawMember> = profiles
        .iter()
        .filter_map(|p| p.join_key().map(|key| (key, p)))
        .collect();

    let mut matched = 0;
    for member in members.iter_mut() {
        let Some(profile) = member
            .user_id
            .as_deref()
            .and_then(|user_id| index.get(user_id))
        else {
            continue;
        };
        matched += 1;

        if let Some(name) = NameCandidates::from(*profile).best() {
            member.name = name;
        }
        if member.email.is_none() {
            member.email = profile
                .email
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty())
                .map(String::from);
        }
    }

    matched
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::whop::mock::MockWhopClient;
    use crate::whop::{Page, RawUser};

    fn bare(id: &str, user_id: &str) -> RawMembership {
        RawMembership {
            id: id.to_string(),
            user: Some(RawUser {
                id: Some(user_id.to_string()),
                ..RawUser::default()
            }),
            ..RawMembership::default()
        }
    }

    fn named(id: &str, user_id: &str, username: &str) -> RawMembership {
        let mut record = bare(id, user_id);
        if let Some(user) = record.user.as_mut() {
            user.username = Some(username.to_string());
        }
        record
    }

    fn profile(user_id: &str, username: &str) -> RawMember {
        RawMember {
            user_id: Some(user_id.to_string()),
            username: Some(username.to_string()),
            ..RawMember::default()
        }
    }

    /// `generic` bare memberships followed by `curated` named ones.
    fn batch(generic: usize, curated: usize) -> Vec<RawMembership> {
        (0..generic)
            .map(|i| bare(&format!("mem_{i:04}"), &format!("user_{i}")))
            .chain((generic..generic + curated).map(|i| {
                named(&format!("mem_{i:04}"), &format!("user_{i}"), &format!("name{i}"))
            }))
            .collect()
    }

    fn directory(mock: MockWhopClient) -> WhopDirectory<MockWhopClient> {
        WhopDirectory::new(mock, DirectorySettings::default())
    }

    #[tokio::test]
    async fn test_enrichment_runs_when_most_names_generic() {
        let mock = MockWhopClient::new();
        mock.push_membership_page(Ok(Page::last(batch(6, 4))));
        mock.push_member_page(Ok(Page::last(vec![profile("user_0", "zoe")])));
        let dir = directory(mock);

        let members = dir
            .build_directory(&DirectoryRequest::default())
            .await
            .unwrap();

        assert_eq!(dir.client().member_calls().len(), 1);
        assert_eq!(members.len(), 10);
        assert_eq!(members[0].name, "zoe");
        assert_eq!(members[1].name, "Member 0001");
    }

    #[tokio::test]
    async fn test_enrichment_skipped_at_half_generic() {
        let mock = MockWhopClient::new();
        mock.push_membership_page(Ok(Page::last(batch(5, 5))));
        let dir = directory(mock);

        let members = dir
            .build_directory(&DirectoryRequest::default())
            .await
            .unwrap();

        assert!(dir.client().member_calls().is_empty());
        assert_eq!(members.len(), 10);
    }

    #[tokio::test]
    async fn test_empty_directory_skips_enrichment() {
        let dir = directory(MockWhopClient::new());

        let members = dir
            .build_directory(&DirectoryRequest::default())
            .await
            .unwrap();

        assert!(members.is_empty());
        assert!(dir.client().member_calls().is_empty());
    }

    #[tokio::test]
    async fn test_enrichment_failure_is_swallowed() {
        let mock = MockWhopClient::new();
        mock.push_membership_page(Ok(Page::last(batch(3, 0))));
        mock.push_member_page(Err(WhopApiError::ApiError {
            path: crate::whop::MEMBERS_PATH,
            status: 500,
            message: "boom".into(),
        }));
        let dir = directory(mock);

        let members = dir
            .build_directory(&DirectoryRequest::default())
            .await
            .unwrap();

        let names: Vec<_> = members.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Member 0000", "Member 0001", "Member 0002"]);
    }

    #[tokio::test]
    async fn test_enrichment_failure_on_later_page_keeps_primary_names() {
        let mock = MockWhopClient::new();
        mock.push_membership_page(Ok(Page::last(batch(2, 0))));
        mock.push_member_page(Ok(Page::new(vec![profile("user_0", "zoe")], true)));
        mock.push_member_page(Err(WhopApiError::ApiError {
            path: crate::whop::MEMBERS_PATH,
            status: 503,
            message: "unavailable".into(),
        }));
        let dir = directory(mock);

        let members = dir
            .build_directory(&DirectoryRequest::default())
            .await
            .unwrap();

        assert_eq!(members[0].name, "Member 0000");
    }

    #[tokio::test]
    async fn test_primary_failure_aborts() {
        let mock = MockWhopClient::new();
        mock.push_membership_page(Err(WhopApiError::ApiError {
            path: crate::whop::MEMBERSHIPS_PATH,
            status: 401,
            message: "unauthorized".into(),
        }));
        let dir = directory(mock);

        let result = dir.build_directory(&DirectoryRequest::default()).await;

        assert!(matches!(
            result,
            Err(DirectoryError::Remote(WhopApiError::ApiError { status: 401, .. }))
        ));
    }

    #[tokio::test]
    async fn test_request_defaults_and_overrides() {
        let mock = MockWhopClient::new();
        let settings = DirectorySettings {
            default_company_id: Some("biz_default".into()),
            ..DirectorySettings::default()
        };
        let dir = WhopDirectory::new(mock, settings);

        dir.build_directory(&DirectoryRequest::default())
            .await
            .unwrap();
        dir.build_directory(&DirectoryRequest {
            company_id: Some("biz_other".into()),
            per: Some(500),
            max_pages: Some(0),
            status: Some("canceled".into()),
        })
        .await
        .unwrap();

        let calls = dir.client().membership_calls();
        assert_eq!(calls.len(), 2);

        let (filter, page) = &calls[0];
        assert_eq!(filter.status, "active");
        assert_eq!(filter.company_id.as_deref(), Some("biz_default"));
        assert_eq!(page.per, 50);

        let (filter, page) = &calls[1];
        assert_eq!(filter.status, "canceled");
        assert_eq!(filter.company_id.as_deref(), Some("biz_other"));
        assert_eq!(page.per, 50, "page size clamped to endpoint cap");
    }

    #[tokio::test]
    async fn test_enrichment_is_scoped_to_company() {
        let mock = MockWhopClient::new();
        mock.push_membership_page(Ok(Page::last(batch(1, 0))));
        let dir = directory(mock);

        dir.build_directory(&DirectoryRequest {
            company_id: Some("biz_42".into()),
            ..DirectoryRequest::default()
        })
        .await
        .unwrap();

        let calls = dir.client().member_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0.as_deref(), Some("biz_42"));
        assert_eq!(calls[0].1.per, 200);
    }

    #[test]
    fn test_canonicalize_drops_duplicate_ids() {
        let records = vec![
            named("mem_1", "user_1", "first"),
            named("mem_2", "user_2", "second"),
            named("mem_1", "user_1", "again"),
        ];

        let members = canonicalize(&records);

        assert_eq!(members.len(), 2);
        assert_eq!(members[0].name, "first");
        assert_eq!(members[0].user_id.as_deref(), Some("user_1"));
    }

    #[test]
    fn test_generic_ratio() {
        let members = canonicalize(&batch(6, 4));
        assert!((generic_ratio(&members) - 0.6).abs() < f64::EPSILON);
        assert!(generic_ratio(&[]).abs() < f64::EPSILON);
    }

    #[test]
    fn test_enrichment_last_profile_wins() {
        let mut members = canonicalize(&batch(1, 0));
        let profiles = vec![profile("user_0", "old"), profile("user_0", "new")];

        assert_eq!(apply_enrichment(&mut members, &profiles), 1);
        assert_eq!(members[0].name, "new");
    }

    #[test]
    fn test_enrichment_fills_missing_email_only() {
        let mut with_email = bare("mem_1", "user_1");
        if let Some(user) = with_email.user.as_mut() {
            user.email = Some("primary@x.com".into());
        }
        let mut members = canonicalize(&[with_email, bare("mem_2", "user_2")]);
        let profiles = vec![
            RawMember {
                user_id: Some("user_1".into()),
                email: Some("secondary@x.com".into()),
                ..RawMember::default()
            },
            RawMember {
                user_id: Some("user_2".into()),
                email: Some("filled@x.com".into()),
                ..RawMember::default()
            },
        ];

        apply_enrichment(&mut members, &profiles);

        assert_eq!(members[0].email.as_deref(), Some("primary@x.com"));
        assert_eq!(members[1].email.as_deref(), Some("filled@x.com"));
        assert_eq!(members[1].name, "filled");
    }

    #[test]
    fn test_enrichment_leaves_unmatched_members() {
        let mut members = canonicalize(&[
            RawMembership {
                id: "mem_nouser".into(),
                ..RawMembership::default()
            },
            bare("mem_2", "user_2"),
        ]);
        let profiles = vec![profile("user_999", "stranger")];

        assert_eq!(apply_enrichment(&mut members, &profiles), 0);
        assert_eq!(members[0].name, "Member user");
        assert_eq!(members[1].name, "Member em_2");
    }

    #[test]
    fn test_bare_profile_keeps_primary_name() {
        let mut members = canonicalize(&batch(1, 0));
        let profiles = vec![RawMember {
            user_id: Some("user_0".into()),
            ..RawMember::default()
        }];

        assert_eq!(apply_enrichment(&mut members, &profiles), 1);
        assert_eq!(members[0].name, "Member 0000");
    }
}
