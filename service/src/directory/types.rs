//! Public directory types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A community member as exposed to the presentation layer.
///
/// `user_id` is an internal join key: it is accepted on input but never
/// serialized back out.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalMember {
    /// Membership id, unique within one directory snapshot
    pub id: String,
    /// Underlying account id
    #[serde(default, skip_serializing)]
    #[schema(ignore)]
    pub user_id: Option<String>,
    /// Resolved display name, never empty
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Caller-supplied hints for one directory build.
///
/// Absent values fall back to the configured defaults; present values are
/// clamped into the endpoint caps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryRequest {
    pub company_id: Option<String>,
    pub per: Option<i64>,
    pub max_pages: Option<i64>,
    pub status: Option<String>,
}
