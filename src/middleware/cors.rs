use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::csrf::CSRF_HEADER;

/// Builds the CORS layer. An empty list or a `*` entry allows any origin;
/// entries that are not valid header values are skipped with a warning.
pub fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.is_empty() || origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(e) => {
                    warn!("ignoring invalid CORS origin '{}': {}", origin, e);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, CSRF_HEADER, AUTHORIZATION])
        .expose_headers([CSRF_HEADER])
        .max_age(Duration::from_secs(3600))
}
