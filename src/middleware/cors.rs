//! CORS policy for browser clients.
//!
//! Sessions travel in a cookie, so credentials are allowed. That rules out
//! wildcard origins:
//! - Development: the request origin is mirrored.
//! - Production: only origins in `CORS_ALLOWED_ORIGINS` (exact match); an empty
//!   list allows none.

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::config::{AppEnv, HttpConfig};

pub fn apply(router: Router, app_env: AppEnv, config: &HttpConfig) -> Router {
    let allow_origin = if app_env.is_production() {
        let allowed: Vec<HeaderValue> = config
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        })
    } else {
        AllowOrigin::mirror_request()
    };

    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            HeaderName::from_static("x-request-id"),
        ])
        .max_age(std::time::Duration::from_secs(60 * 10));

    router.layer(cors)
}
