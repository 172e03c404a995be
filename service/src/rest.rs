//! `OpenAPI` documentation for the raffle routes.

// The OpenApi derive macro generates code that triggers this lint
#![allow(clippy::needless_for_each)]

use utoipa::OpenApi;

use crate::directory::CanonicalMember;
use crate::http::raffle::{DirectoryResponse, DrawMeta, DrawRequest, DrawResponse};
use crate::http::ErrorResponse;

/// `OpenAPI` documentation for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Raffle API",
        version = "1.0.0",
        description = "Community member directory and fair winner draws",
        license(name = "MIT")
    ),
    paths(crate::http::raffle::list_members, crate::http::raffle::draw_winners),
    components(schemas(
        CanonicalMember,
        DirectoryResponse,
        DrawRequest,
        DrawMeta,
        DrawResponse,
        ErrorResponse
    ))
)]
pub struct ApiDoc;
