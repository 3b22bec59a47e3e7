//! Metrics and observability utilities
//!
//! Provides Prometheus metric descriptions and recording helpers
//! with standardized naming conventions.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all LabSite metrics
pub const METRICS_PREFIX: &str = "labsite";

/// Histogram buckets for backend fetch latency (in seconds)
pub const FETCH_BUCKETS: &[f64] = &[
    0.010,  // 10ms
    0.025,  // 25ms
    0.050,  // 50ms
    0.100,  // 100ms
    0.250,  // 250ms
    0.500,  // 500ms
    1.000,  // 1s
    2.500,  // 2.5s
    5.000,  // 5s
    10.00,  // 10s
    30.00,  // 30s
];

/// Register all metric descriptions
pub fn register_metrics() {
    // Page request metrics
    describe_counter!(
        format!("{}_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total number of page requests"
    );

    describe_histogram!(
        format!("{}_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Page render latency in seconds"
    );

    // Content backend metrics
    describe_counter!(
        format!("{}_cms_requests_total", METRICS_PREFIX),
        Unit::Count,
        "Total requests sent to the content backend"
    );

    describe_histogram!(
        format!("{}_cms_request_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Content backend request latency in seconds"
    );

    // Degradation metrics
    describe_counter!(
        format!("{}_section_fallbacks_total", METRICS_PREFIX),
        Unit::Count,
        "Page sections rendered with fallback content"
    );

    tracing::info!("Metrics registered");
}

/// Helper to record page request metrics
pub struct RequestMetrics {
    start: Instant,
    route: String,
}

impl RequestMetrics {
    /// Start tracking a request
    pub fn start(route: &str) -> Self {
        Self {
            start: Instant::now(),
            route: route.to_string(),
        }
    }

    /// Record request completion
    pub fn finish(self, status: u16) {
        let duration = self.start.elapsed().as_secs_f64();

        counter!(
            format!("{}_requests_total", METRICS_PREFIX),
            "route" => self.route.clone(),
            "status" => status.to_string()
        )
        .increment(1);

        histogram!(
            format!("{}_request_duration_seconds", METRICS_PREFIX),
            "route" => self.route
        )
        .record(duration);
    }
}

/// Outcome label for a backend request
pub fn fetch_outcome(status: Option<u16>) -> &'static str {
    match status {
        Some(code) if (200..300).contains(&code) => "success",
        Some(code) if (400..500).contains(&code) => "client_error",
        Some(_) => "server_error",
        None => "network_error",
    }
}

/// Helper to record content backend metrics
pub fn record_cms_request(duration_secs: f64, resource: &str, status: Option<u16>) {
    counter!(
        format!("{}_cms_requests_total", METRICS_PREFIX),
        "resource" => resource.to_string(),
        "outcome" => fetch_outcome(status)
    )
    .increment(1);

    histogram!(
        format!("{}_cms_request_duration_seconds", METRICS_PREFIX),
        "resource" => resource.to_string()
    )
    .record(duration_secs);
}

/// Helper to record a section rendered from fallback content
pub fn record_fallback(section: &str) {
    counter!(
        format!("{}_section_fallbacks_total", METRICS_PREFIX),
        "section" => section.to_string()
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_buckets_sorted() {
        let mut prev = 0.0;
        for &bucket in FETCH_BUCKETS {
            assert!(bucket > prev);
            prev = bucket;
        }
    }

    #[test]
    fn test_fetch_outcome_labels() {
        assert_eq!(fetch_outcome(Some(200)), "success");
        assert_eq!(fetch_outcome(Some(404)), "client_error");
        assert_eq!(fetch_outcome(Some(503)), "server_error");
        assert_eq!(fetch_outcome(None), "network_error");
    }

    #[test]
    fn test_request_metrics() {
        let metrics = RequestMetrics::start("/publications");
        metrics.finish(200);
        record_cms_request(0.01, "publications", Some(200));
        record_fallback("news");
        // Just verify it runs without panic
    }
}
