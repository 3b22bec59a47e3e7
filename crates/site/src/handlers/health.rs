//! Health check handlers

use crate::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub status: String,
    pub checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    pub cms: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Liveness probe - always returns healthy if server is running
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: labsite_common::VERSION.to_string(),
    })
}

/// Readiness probe - checks the content backend
///
/// Pages render without the backend, so a failed check reports
/// `degraded` rather than failing the probe.
pub async fn ready(State(state): State<AppState>) -> Json<ReadyResponse> {
    let start = std::time::Instant::now();

    let cms_check = match state.content.ping().await {
        Ok(_) => CheckResult {
            status: "up".to_string(),
            latency_ms: Some(start.elapsed().as_millis() as u64),
            error: None,
        },
        Err(e) => CheckResult {
            status: "down".to_string(),
            latency_ms: None,
            error: Some(e.to_string()),
        },
    };

    let all_healthy = cms_check.status == "up";

    Json(ReadyResponse {
        status: if all_healthy { "ready" } else { "degraded" }.to_string(),
        checks: HealthChecks { cms: cms_check },
    })
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use axum::http::StatusCode;
    use labsite_cms::StaticContentSource;

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(offline_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"status\":\"healthy\""));
    }

    #[tokio::test]
    async fn test_ready_reports_backend_state() {
        let (_, body) = get(offline_app(), "/ready").await;
        assert!(body.contains("\"status\":\"degraded\""));

        let (_, body) = get(app(StaticContentSource::new(base_url())), "/ready").await;
        assert!(body.contains("\"status\":\"ready\""));
    }
}
