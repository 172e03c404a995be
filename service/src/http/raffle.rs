//! HTTP handlers for the directory and draw operations.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Extension, Query},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_aux::prelude::deserialize_option_number_from_string;
use utoipa::{IntoParams, ToSchema};

use super::error::{ApiError, ErrorResponse};
use crate::directory::{CanonicalMember, DirectoryRequest, DirectoryService};
use crate::draw::WinnerSet;

/// Shared state for the raffle routes.
///
/// `directory` is `None` when no Whop API key is configured; directory
/// requests then fail with a configuration error while draws keep working.
#[derive(Clone, Default)]
pub struct RaffleState {
    pub directory: Option<Arc<dyn DirectoryService>>,
}

impl RaffleState {
    #[must_use]
    pub fn new(directory: Arc<dyn DirectoryService>) -> Self {
        Self {
            directory: Some(directory),
        }
    }

    /// State for a deployment without credentials.
    #[must_use]
    pub fn unconfigured() -> Self {
        Self::default()
    }
}

/// Query parameters for a directory build
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MembersQuery {
    /// Community (company) id; defaults to the configured one
    pub company_id: Option<String>,
    /// Page size hint, clamped to the endpoint cap
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub per: Option<i64>,
    /// Page count hint, clamped to the endpoint cap
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub max_pages: Option<i64>,
    /// Membership status filter (default "active")
    pub status: Option<String>,
}

impl From<MembersQuery> for DirectoryRequest {
    fn from(query: MembersQuery) -> Self {
        Self {
            company_id: query.company_id,
            per: query.per,
            max_pages: query.max_pages,
            status: query.status,
        }
    }
}

/// Directory snapshot response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DirectoryResponse {
    pub count: usize,
    pub members: Vec<CanonicalMember>,
}

/// Draw request payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct DrawRequest {
    /// Snapshot to draw from, as returned by the directory route
    #[serde(default)]
    pub members: Option<Vec<CanonicalMember>>,
    /// Number of winners; clamped into `[1, members.len()]`
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    #[schema(value_type = Option<i64>)]
    pub count: Option<i64>,
}

/// Draw annotations
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrawMeta {
    /// Snapshot size
    pub total: usize,
    /// Winners drawn
    pub count: usize,
    /// Winners asked for, before clamping
    pub requested: i64,
    pub timestamp: DateTime<Utc>,
}

/// Draw response; the first winner is the headline winner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DrawResponse {
    pub winners: Vec<CanonicalMember>,
    pub meta: DrawMeta,
}

impl From<WinnerSet> for DrawResponse {
    fn from(set: WinnerSet) -> Self {
        Self {
            meta: DrawMeta {
                total: set.total,
                count: set.count(),
                requested: set.requested,
                timestamp: set.drawn_at,
            },
            winners: set.winners,
        }
    }
}

pub fn router() -> Router {
    Router::new()
        .route("/api/members", get(list_members))
        .route("/api/draw", post(draw_winners))
}

/// Build a member directory
///
/// Fetches a fresh snapshot of the community's memberships from Whop.
///
/// # Errors
///
/// Returns 500 when no API key is configured or the membership endpoint fails,
/// and 400 for unparseable query parameters.
#[utoipa::path(
    get,
    path = "/api/members",
    tag = "Raffle",
    params(MembersQuery),
    responses(
        (status = 200, description = "Directory snapshot", body = DirectoryResponse),
        (status = 400, description = "Invalid query parameters", body = ErrorResponse),
        (status = 500, description = "Missing credentials or Whop API failure", body = ErrorResponse)
    )
)]
pub async fn list_members(
    Extension(state): Extension<RaffleState>,
    query: Result<Query<MembersQuery>, QueryRejection>,
) -> Result<Json<DirectoryResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let directory = state.directory.ok_or(ApiError::Configuration)?;

    let members = directory.build_directory(&query.into()).await?;

    Ok(Json(DirectoryResponse {
        count: members.len(),
        members,
    }))
}

/// Draw winners
///
/// Draws uniformly at random without replacement from the submitted members.
///
/// # Errors
///
/// Returns 400 when the body is not valid JSON, `members` is not an array, or
/// the array is empty.
#[utoipa::path(
    post,
    path = "/api/draw",
    tag = "Raffle",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "Winners drawn", body = DrawResponse),
        (status = 400, description = "No members provided or malformed body", body = ErrorResponse)
    )
)]
#[allow(clippy::unused_async)] // Required for Axum handler signature
pub async fn draw_winners(
    payload: Result<Json<DrawRequest>, JsonRejection>,
) -> Result<Json<DrawResponse>, ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let members = request
        .members
        .filter(|m| !m.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("No members provided".into()))?;
    let requested = request.count.unwrap_or(1);

    let set = WinnerSet::draw(&members, requested, &mut rand::thread_rng())?;
    tracing::info!(
        total = set.total,
        requested,
        drawn = set.count(),
        headline = set.headline().map_or("", |m| m.id.as_str()),
        "drew winners"
    );

    Ok(Json(set.into()))
}
