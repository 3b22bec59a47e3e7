//! Static path enumeration for pre-rendering

use crate::AppState;
use axum::{extract::State, Json};
use labsite_common::errors::Result;
use serde::Serialize;

#[derive(Serialize)]
pub struct StaticPathsResponse {
    pub count: usize,
    pub paths: Vec<String>,
}

/// Every detail route the site can render
///
/// Unlike pages this fails loudly: a partial list would silently drop
/// pages from a static build.
pub async fn static_paths(State(state): State<AppState>) -> Result<Json<StaticPathsResponse>> {
    let paths = state.content.static_paths().await?;
    tracing::info!(count = paths.len(), "Static paths enumerated");

    Ok(Json(StaticPathsResponse {
        count: paths.len(),
        paths,
    }))
}
