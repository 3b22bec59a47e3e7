//! Per-route request metrics

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use labsite_common::metrics::RequestMetrics;

/// Record count and latency labeled by the matched route template
pub async fn track_requests(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    let metrics = RequestMetrics::start(&route);
    let response = next.run(request).await;
    metrics.finish(response.status().as_u16());

    response
}
