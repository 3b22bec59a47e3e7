//! Page handlers
//!
//! Listing pages always answer 200: each section that cannot be loaded is
//! replaced by the empty-state copy. Detail pages need their record and
//! answer 404 when it cannot be resolved.

pub mod alumni;
pub mod faculty;
pub mod health;
pub mod home;
pub mod news;
pub mod partners;
pub mod paths;
pub mod projects;
pub mod publications;
pub mod research;

use crate::render::{self, PageHead};
use crate::AppState;
use axum::{
    extract::State,
    http::{header, Uri},
    response::{Html, IntoResponse, Response},
};
use labsite_cms::models::{PageKind, PageSettings};
use labsite_cms::{Fallback, Section};
use labsite_common::errors::{AppError, Result};

/// Chrome and empty-state copy for a listing page
pub(crate) struct Listing {
    pub head: PageHead,
    /// Shown when the backend could not provide the list
    pub unavailable: String,
    /// Shown when the list loaded but has no entries
    pub empty: String,
}

impl Listing {
    pub fn new(state: &AppState, kind: PageKind, settings: Result<Option<PageSettings>>) -> Self {
        let settings = settings.or_fallback(kind.resource());

        let empty = settings
            .as_ref()
            .and_then(|s| s.empty_state_message.clone())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Nothing has been published here yet.".to_string());

        Self {
            head: PageHead::listing(kind, settings.as_ref()),
            unavailable: state.config.site.empty_state_message.clone(),
            empty,
        }
    }

    /// Section body: rendered items, or the matching empty state
    pub fn section<T>(&self, section: &Section<Vec<T>>, render_items: impl FnOnce(&[T]) -> String) -> String {
        match section {
            Section::Unavailable => render::empty_state(&self.unavailable),
            Section::Loaded(items) if items.is_empty() => render::empty_state(&self.empty),
            Section::Loaded(items) => render_items(items),
        }
    }

    pub fn render(&self, state: &AppState, body: &str) -> Html<String> {
        Html(render::layout(&state.config.site, &self.head, body))
    }
}

/// The record a detail page cannot render without
///
/// An unreachable backend is treated like a missing record.
pub(crate) fn essential<T>(result: Result<Option<T>>, resource_type: &str, slug: &str) -> Result<T> {
    let not_found = || AppError::NotFound {
        resource_type: resource_type.to_string(),
        slug: slug.to_string(),
    };

    match result {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(not_found()),
        Err(e) if e.is_unavailable() => {
            tracing::warn!(
                resource_type = resource_type,
                slug = slug,
                error = %e,
                "Detail page data unavailable"
            );
            Err(not_found())
        }
        Err(e) => Err(e),
    }
}

/// Render a detail page, or the error page for a failed lookup
pub(crate) fn detail_page(state: &AppState, page: Result<(PageHead, String)>) -> Response {
    match page {
        Ok((head, body)) => Html(render::layout(&state.config.site, &head, &body)).into_response(),
        Err(e) => render::error_page(&state.config.site, &e),
    }
}

/// Download response with a suggested filename
pub(crate) fn attachment(content_type: &'static str, filename: &str, body: String) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", filename)),
        ],
        body,
    )
        .into_response()
}

/// Fallback for unknown paths
pub async fn not_found(State(state): State<AppState>, uri: Uri) -> Response {
    let error = AppError::NotFound {
        resource_type: "page".to_string(),
        slug: uri.path().to_string(),
    };
    render::error_page(&state.config.site, &error)
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::{create_router, AppState};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use labsite_cms::{ContentApi, StaticContentSource};
    use labsite_common::config::AppConfig;
    use std::sync::Arc;
    use tower::ServiceExt;
    use url::Url;

    pub fn base_url() -> Url {
        Url::parse("http://cms.test:1337").unwrap()
    }

    pub fn app(source: StaticContentSource) -> Router {
        let state = AppState::new(
            Arc::new(AppConfig::default()),
            ContentApi::new(source.into_shared()),
        );
        create_router(state)
    }

    pub fn offline_app() -> Router {
        app(StaticContentSource::unreachable(base_url()))
    }

    /// Status and body of a GET request
    pub async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_unknown_path_is_404_with_chrome() {
        let (status, body) = get(offline_app(), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("<nav>"));
        assert!(body.contains("Page not found"));
    }

    #[test]
    fn test_essential_maps_unavailable_to_not_found() {
        let result: labsite_common::Result<Option<u32>> = Err(labsite_common::AppError::Network {
            message: "refused".to_string(),
        });
        let err = super::essential(result, "news", "x").unwrap_err();
        assert!(matches!(err, labsite_common::AppError::NotFound { .. }));
    }
}
