//! The request pipeline shared by every route.
//!
//! Stages run in this order on the way in (and in reverse on the way out):
//!
//! 1. security headers
//! 2. cross-origin resource policy (`cross-origin`)
//! 3. access log
//! 4. CORS, any origin
//! 5. body size cap for the JSON and URL-encoded extractors
//!
//! Body parsing itself happens in the extractors at the end of the chain, and
//! static assets are a route like any other, so both sit behind every stage.
//! Upload routes lift the cap again with their own [`DefaultBodyLimit`].

pub mod security_headers;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, Router};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
    LatencyUnit,
};
use tracing::Level;

use crate::config::Config;

pub use security_headers::{security_headers, CROSS_ORIGIN_RESOURCE_POLICY, SECURITY_HEADERS};

/// Wraps `router` in the pipeline. Routes added to the router afterwards are
/// not covered.
pub fn apply_pipeline(router: Router, config: &Config) -> Router {
    let stages = ServiceBuilder::new()
        .layer(middleware::from_fn(security_headers))
        .layer(SetResponseHeaderLayer::if_not_present(
            CROSS_ORIGIN_RESOURCE_POLICY,
            HeaderValue::from_static("cross-origin"),
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(LatencyUnit::Millis),
                ),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(DefaultBodyLimit::max(config.body_limit_bytes));

    router.layer(stages)
}
