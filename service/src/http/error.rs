//! JSON error payloads for the raffle routes.

use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::directory::DirectoryError;
use crate::draw::DrawError;

/// Error response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Short human-readable message
    pub error: String,
}

/// Errors surfaced by the raffle routes.
///
/// Client mistakes map to 400; missing credentials and remote failures map
/// to 500.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Missing Whop API key")]
    Configuration,
    #[error("{0}")]
    Remote(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("Cannot draw from an empty member list")]
    EmptyPool,
}

impl ApiError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Configuration | Self::Remote(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidInput(_) | Self::EmptyPool => StatusCode::BAD_REQUEST,
        }
    }
}

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Configuration => Self::Configuration,
            DirectoryError::Remote(e) => Self::Remote(e.to_string()),
        }
    }
}

impl From<DrawError> for ApiError {
    fn from(err: DrawError) -> Self {
        match err {
            DrawError::EmptyPool => Self::EmptyPool,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}
