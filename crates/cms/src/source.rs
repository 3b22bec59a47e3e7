//! Content source abstraction
//!
//! Accessors talk to a `ContentSource` rather than to HTTP directly:
//! - `CmsClient` (see `client`) for the real backend
//! - `StaticContentSource` for tests and offline rendering

use crate::query::QueryConfig;
use async_trait::async_trait;
use labsite_common::errors::{AppError, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use url::Url;

/// Trait for fetching raw backend response bodies
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// `GET /api/<resource>?<query>`, returning the parsed JSON body
    async fn fetch(&self, resource: &str, query: &QueryConfig) -> Result<Value>;

    /// Check that the backend answers at all
    async fn ping(&self) -> Result<()>;

    /// Origin that relative media paths are joined with
    fn base_url(&self) -> &Url;
}

/// In-memory content source
///
/// Responses are looked up by `resource?query` first, then by `resource`.
/// Unknown resources answer like a backend 404.
pub struct StaticContentSource {
    base_url: Url,
    responses: HashMap<String, Value>,
    unreachable: bool,
    requests: Mutex<Vec<(String, QueryConfig)>>,
}

impl StaticContentSource {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            responses: HashMap::new(),
            unreachable: false,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// A source whose every call fails like a refused connection
    pub fn unreachable(base_url: Url) -> Self {
        Self {
            unreachable: true,
            ..Self::new(base_url)
        }
    }

    /// Answer `body` for any query on `resource`
    pub fn with_response(mut self, resource: &str, body: Value) -> Self {
        self.responses.insert(resource.to_string(), body);
        self
    }

    /// Answer `body` only for this exact query
    pub fn with_query_response(mut self, resource: &str, query: &QueryConfig, body: Value) -> Self {
        self.responses.insert(request_key(resource, query), body);
        self
    }

    /// Requests received so far, in order
    pub fn requests(&self) -> Vec<(String, QueryConfig)> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn into_shared(self) -> Arc<dyn ContentSource> {
        Arc::new(self)
    }
}

fn request_key(resource: &str, query: &QueryConfig) -> String {
    format!("{}?{}", resource, query.to_query_string())
}

#[async_trait]
impl ContentSource for StaticContentSource {
    async fn fetch(&self, resource: &str, query: &QueryConfig) -> Result<Value> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push((resource.to_string(), query.clone()));

        if self.unreachable {
            return Err(AppError::Network {
                message: format!("connection refused fetching {}", resource),
            });
        }

        self.responses
            .get(&request_key(resource, query))
            .or_else(|| self.responses.get(resource))
            .cloned()
            .ok_or_else(|| AppError::Backend {
                status: 404,
                body: r#"{"data":null,"error":{"status":404,"name":"NotFoundError","message":"Not Found"}}"#.to_string(),
            })
    }

    async fn ping(&self) -> Result<()> {
        if self.unreachable {
            return Err(AppError::Network {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> Url {
        Url::parse("http://localhost:1337").unwrap()
    }

    #[tokio::test]
    async fn test_static_source_lookup_order() {
        let exact = QueryConfig::new().filter_eq("slug", "a");
        let source = StaticContentSource::new(base())
            .with_response("publications", json!({ "data": [] }))
            .with_query_response("publications", &exact, json!({ "data": [{ "id": 1, "attributes": {} }] }));

        let general = source.fetch("publications", &QueryConfig::new()).await.unwrap();
        let specific = source.fetch("publications", &exact).await.unwrap();

        assert_eq!(general, json!({ "data": [] }));
        assert_eq!(specific["data"][0]["id"], 1);
        assert_eq!(source.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_resource_is_backend_404() {
        let source = StaticContentSource::new(base());
        let err = source.fetch("nothing", &QueryConfig::new()).await.unwrap_err();
        assert!(matches!(err, AppError::Backend { status: 404, .. }));
    }

    #[test]
    fn test_unreachable_source() {
        let source = StaticContentSource::unreachable(base());
        let err = tokio_test::block_on(source.fetch("news-items", &QueryConfig::new())).unwrap_err();
        assert!(matches!(err, AppError::Network { .. }));
        tokio_test::assert_err!(tokio_test::block_on(source.ping()));
    }
}
