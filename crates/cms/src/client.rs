//! HTTP client for the headless CMS REST API

use crate::query::QueryConfig;
use crate::source::ContentSource;
use async_trait::async_trait;
use labsite_common::config::CmsConfig;
use labsite_common::errors::{AppError, Result};
use labsite_common::metrics::record_cms_request;
use labsite_common::CMS_API_PREFIX;
use reqwest::header::ACCEPT;
use serde_json::Value;
use std::time::Instant;
use url::Url;

/// Content backend client
///
/// One `GET` per call, no retries and no caching. Every request is bounded
/// by the configured timeout.
pub struct CmsClient {
    client: reqwest::Client,
    base_url: Url,
    api_token: Option<String>,
}

impl CmsClient {
    /// Create a new client from configuration
    pub fn new(config: &CmsConfig) -> Result<Self> {
        let base_url = config.base_url()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AppError::Configuration {
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url,
            api_token: config.api_token.clone().filter(|t| !t.is_empty()),
        })
    }

    /// `<base>/api/<resource>[?<query>]`
    pub fn endpoint(&self, resource: &str, query: &QueryConfig) -> String {
        let mut url = format!(
            "{}/{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            CMS_API_PREFIX,
            resource.trim_start_matches('/')
        );

        let qs = query.to_query_string();
        if !qs.is_empty() {
            url.push('?');
            url.push_str(&qs);
        }
        url
    }

    async fn get(&self, url: &str) -> std::result::Result<reqwest::Response, reqwest::Error> {
        let mut request = self.client.get(url).header(ACCEPT, "application/json");
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }
        request.send().await
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn fetch(&self, resource: &str, query: &QueryConfig) -> Result<Value> {
        let url = self.endpoint(resource, query);
        let start = Instant::now();

        let response = match self.get(&url).await {
            Ok(response) => response,
            Err(e) => {
                record_cms_request(start.elapsed().as_secs_f64(), resource, None);
                tracing::warn!(resource = resource, error = %e, "Content backend unreachable");
                return Err(AppError::Network {
                    message: format!("Request to {} failed: {}", resource, e),
                });
            }
        };

        let status = response.status();
        record_cms_request(start.elapsed().as_secs_f64(), resource, Some(status.as_u16()));

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(
                resource = resource,
                status = status.as_u16(),
                "Content backend returned an error status"
            );
            return Err(AppError::Backend {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await.map_err(|e| AppError::Network {
            message: format!("Failed to read response body: {}", e),
        })?;

        tracing::debug!(resource = resource, bytes = body.len(), "Content fetched");

        serde_json::from_str(&body)
            .map_err(|e| AppError::malformed(format!("{} did not return JSON: {}", resource, e)))
    }

    async fn ping(&self) -> Result<()> {
        let url = format!("{}/_health", self.base_url.as_str().trim_end_matches('/'));

        let response = self.get(&url).await.map_err(|e| AppError::Network {
            message: format!("Health check failed: {}", e),
        })?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AppError::Backend {
                status: response.status().as_u16(),
                body: String::new(),
            })
        }
    }

    fn base_url(&self) -> &Url {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::RawQuery;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    async fn echo(headers: HeaderMap, RawQuery(query): RawQuery) -> Json<Value> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        Json(json!({ "data": [], "meta": { "query": query, "auth": auth } }))
    }

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/api/publications", get(echo))
            .route("/api/broken", get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }))
            .route("/api/html", get(|| async { "<html>not json</html>" }))
            .route("/_health", get(|| async { StatusCode::NO_CONTENT }));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base_url: String, token: Option<&str>) -> CmsClient {
        CmsClient::new(&CmsConfig {
            base_url,
            api_token: token.map(str::to_string),
            ..CmsConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_layout() {
        let client = client_for("http://localhost:1337/".to_string(), None);
        assert_eq!(
            client.endpoint("projects", &QueryConfig::new()),
            "http://localhost:1337/api/projects"
        );

        let query = QueryConfig::new().sort(&["startDate:desc"]);
        assert_eq!(
            client.endpoint("projects", &query),
            "http://localhost:1337/api/projects?sort%5B0%5D=startDate%3Adesc"
        );
    }

    #[tokio::test]
    async fn test_fetch_sends_query_and_token() {
        let client = client_for(spawn_stub().await, Some("secret"));
        let query = QueryConfig::new().filter_eq("slug", "deep-learning");

        let body = client.fetch("publications", &query).await.unwrap();

        assert_eq!(body["meta"]["query"], json!(query.to_query_string()));
        assert_eq!(body["meta"]["auth"], json!("Bearer secret"));
    }

    #[tokio::test]
    async fn test_fetch_without_token_sends_no_auth() {
        let client = client_for(spawn_stub().await, None);
        let body = client.fetch("publications", &QueryConfig::new()).await.unwrap();
        assert_eq!(body["meta"]["auth"], Value::Null);
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let client = client_for(spawn_stub().await, None);
        let err = client.fetch("broken", &QueryConfig::new()).await.unwrap_err();

        match err {
            AppError::Backend { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let client = client_for(spawn_stub().await, None);
        let err = client.fetch("html", &QueryConfig::new()).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = client_for(format!("http://{}", addr), None);
        let err = client.fetch("publications", &QueryConfig::new()).await.unwrap_err();

        assert!(matches!(err, AppError::Network { .. }));
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_ping() {
        let client = client_for(spawn_stub().await, None);
        assert!(client.ping().await.is_ok());
    }
}
