//! Cross-cutting router layers: CORS and response security headers.

use std::sync::Arc;

use axum::{
    extract::Request,
    http::{
        header::{
            CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
            X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS, X_XSS_PROTECTION,
        },
        HeaderMap, HeaderValue, Method,
    },
    middleware::Next,
    response::Response,
    Extension,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{CorsConfig, SecurityHeadersConfig};

/// Build the CORS layer for the configured origins.
///
/// `"*"` anywhere in the list allows any origin; an empty list blocks all
/// cross-origin requests. Unparseable origins are skipped.
#[must_use]
pub fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = &config.allowed_origins;
    let allow_origin = if origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow any origin - not recommended for production");
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        if parsed.is_empty() {
            tracing::info!("CORS allowed origins not configured - cross-origin requests will be blocked");
        } else {
            tracing::info!(origins = ?origins, "CORS allowed origins configured");
        }
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any)
        .allow_origin(allow_origin)
}

/// Pre-build the security headers attached to every response.
#[must_use]
pub fn security_headers(config: &SecurityHeadersConfig) -> Arc<HeaderMap> {
    let mut headers = HeaderMap::new();

    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(X_XSS_PROTECTION, HeaderValue::from_static("1; mode=block"));

    let configured = [
        (X_FRAME_OPTIONS, config.frame_options.as_str()),
        (CONTENT_SECURITY_POLICY, config.content_security_policy.as_str()),
        (REFERRER_POLICY, config.referrer_policy.as_str()),
    ];
    for (name, value) in configured {
        if let Ok(value) = HeaderValue::from_str(value) {
            headers.insert(name, value);
        }
    }

    // HSTS only makes sense behind HTTPS
    if config.hsts_enabled {
        let mut hsts = format!("max-age={}", config.hsts_max_age);
        if config.hsts_include_subdomains {
            hsts.push_str("; includeSubDomains");
        }
        if let Ok(value) = HeaderValue::from_str(&hsts) {
            headers.insert(STRICT_TRANSPORT_SECURITY, value);
        }
    }

    Arc::new(headers)
}

/// Copy the pre-built security headers onto every response.
pub async fn apply_security_headers(
    Extension(headers): Extension<Arc<HeaderMap>>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    let response_headers = response.headers_mut();
    for (name, value) in headers.iter() {
        response_headers.insert(name.clone(), value.clone());
    }
    response
}
