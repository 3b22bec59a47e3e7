//! LabSite page server
//!
//! Renders the public site from CMS content:
//! - Listing and detail pages for every content type
//! - Publication and alumni exports
//! - Static path enumeration for pre-rendering
//! - Health and readiness probes

pub mod handlers;
pub mod middleware;
pub mod render;

use axum::{routing::get, Router};
use labsite_cms::ContentApi;
use labsite_common::config::AppConfig;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub content: ContentApi,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, content: ContentApi) -> Self {
        Self { config, content }
    }
}

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .route("/static-paths", get(handlers::paths::static_paths))

        // Pages
        .route("/", get(handlers::home::home))
        .route("/faculty", get(handlers::faculty::list))
        .route("/faculty/{slug}", get(handlers::faculty::detail))
        .route("/research", get(handlers::research::list))
        .route("/research/{slug}", get(handlers::research::detail))
        .route("/projects", get(handlers::projects::list))
        .route("/projects/{slug}", get(handlers::projects::detail))
        .route("/partners", get(handlers::partners::list))
        .route("/news", get(handlers::news::list))
        .route("/news/{slug}", get(handlers::news::detail))

        // Publications (exports before the slug route)
        .route("/publications", get(handlers::publications::list))
        .route("/publications/export.csv", get(handlers::publications::export_csv))
        .route("/publications/export.bib", get(handlers::publications::export_bibtex))
        .route("/publications/{slug}", get(handlers::publications::detail))

        // Alumni
        .route("/alumni", get(handlers::alumni::list))
        .route("/alumni/export.csv", get(handlers::alumni::export_csv))

        .fallback(handlers::not_found)
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}
