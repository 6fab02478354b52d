use std::sync::Arc;

use axum::Router;
use axum::middleware::from_fn_with_state;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::middleware::{cors, csrf, headers};
use crate::state::AppState;
use crate::{api, docs};

/// Builds the application with its full middleware stack, outermost first:
///
/// 1. CORS (answers preflight requests itself)
/// 2. request tracing
/// 3. security headers
/// 4. CSRF check and token issuance
///
/// Unknown paths and unsupported methods answer with the usual JSON error
/// body. The binary and the integration tests both go through here.
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = Router::new()
        .merge(api::router())
        .merge(docs::router())
        .method_not_allowed_fallback(api::method_not_allowed)
        .fallback(api::route_not_found)
        .layer(from_fn_with_state(
            Arc::new(config.csrf.clone()),
            csrf::csrf_protect,
        ));

    for (name, value) in headers::security_headers() {
        app = app.layer(SetResponseHeaderLayer::overriding(name, value));
    }

    app.layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_response(DefaultOnResponse::new().level(Level::INFO)),
    )
    .layer(cors::build_cors_layer(&config.cors_origins))
    .with_state(state)
}
