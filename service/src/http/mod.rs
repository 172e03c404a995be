//! HTTP surface of the raffle service.
//!
//! [`app`] assembles the full router used by `main.rs` and the integration
//! tests, so both run the same layer ordering.

pub mod error;
pub mod layers;
pub mod raffle;

use axum::{http::StatusCode, middleware, response::IntoResponse, routing::get, Extension, Router};
use tower_http::trace::TraceLayer;

pub use error::{ApiError, ErrorResponse};
pub use layers::{apply_security_headers, cors_layer, security_headers};
pub use raffle::{RaffleState, router};

use crate::config::{CorsConfig, SecurityHeadersConfig};

async fn health_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Build the application router.
#[must_use]
pub fn app(state: RaffleState, cors: &CorsConfig, security: &SecurityHeadersConfig) -> Router {
    let mut app = Router::new()
        .merge(router())
        .route("/health", get(health_check))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors));

    if security.enabled {
        tracing::info!("Security headers enabled");
        app = app
            .layer(middleware::from_fn(apply_security_headers))
            .layer(Extension(security_headers(security)));
    } else {
        tracing::info!("Security headers disabled");
    }

    app
}
