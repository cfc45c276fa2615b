//! Prometheus metrics for vr-image-service.
//!
//! Provides HTTP and provider-level metrics for observability.

use super::providers::ProviderError;
use prometheus::{Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::future::Future;
use std::sync::OnceLock;
use std::time::Instant;

/// All collectors, registered in one registry.
pub struct Metrics {
    pub registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub genai_provider_latency_seconds: HistogramVec,
    pub genai_provider_errors_total: IntCounterVec,
    pub genai_image_requests_total: IntCounterVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Initialize all metrics. Only the first call registers; later calls are no-ops.
pub fn init_metrics() {
    METRICS.get_or_init(|| {
        let metrics = build_metrics();
        tracing::info!("Prometheus metrics initialized");
        metrics
    });
}

fn build_metrics() -> Metrics {
    let registry = Registry::new();

    // HTTP request counter
    let http_requests_total = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total metric");

    // HTTP request duration histogram
    let http_request_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_request_duration_seconds metric");

    // Provider latency histogram
    let provider_latency = HistogramVec::new(
        HistogramOpts::new(
            "genai_provider_latency_seconds",
            "AI provider API latency in seconds",
        )
        .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["provider", "model"],
    )
    .expect("Failed to create genai_provider_latency_seconds metric");

    // Provider error counter
    let provider_errors = IntCounterVec::new(
        Opts::new("genai_provider_errors_total", "Total AI provider errors"),
        &["provider", "error_type"],
    )
    .expect("Failed to create genai_provider_errors_total metric");

    // Image request counter (outcome: success, empty, fallback, failed)
    let image_requests = IntCounterVec::new(
        Opts::new(
            "genai_image_requests_total",
            "Image generation requests by outcome",
        ),
        &["outcome"],
    )
    .expect("Failed to create genai_image_requests_total metric");

    // Register all metrics
    registry
        .register(Box::new(http_requests_total.clone()))
        .expect("Failed to register http_requests_total");
    registry
        .register(Box::new(http_request_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");
    registry
        .register(Box::new(provider_latency.clone()))
        .expect("Failed to register genai_provider_latency_seconds");
    registry
        .register(Box::new(provider_errors.clone()))
        .expect("Failed to register genai_provider_errors_total");
    registry
        .register(Box::new(image_requests.clone()))
        .expect("Failed to register genai_image_requests_total");

    Metrics {
        registry,
        http_requests_total,
        http_request_duration_seconds: http_request_duration,
        genai_provider_latency_seconds: provider_latency,
        genai_provider_errors_total: provider_errors,
        genai_image_requests_total: image_requests,
    }
}

/// Get metrics in Prometheus text format.
pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();

    let registry = match METRICS.get() {
        Some(m) => &m.registry,
        None => {
            tracing::error!("Metrics registry not initialized");
            return "# Metrics registry not initialized\n".to_string();
        }
    };

    let metric_families = registry.gather();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return format!("# Failed to encode metrics: {}\n", e);
    }

    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Failed to convert metrics to UTF-8");
            format!("# Failed to convert metrics to UTF-8: {}\n", e)
        }
    }
}

// Helper functions for recording metrics

/// Record a completed HTTP request.
pub fn record_http_request(method: &str, path: &str, status: &str, duration_secs: f64) {
    if let Some(m) = METRICS.get() {
        m.http_requests_total
            .with_label_values(&[method, path, status])
            .inc();
        m.http_request_duration_seconds
            .with_label_values(&[method, path, status])
            .observe(duration_secs);
    }
}

/// Record provider latency.
pub fn record_provider_latency(provider: &str, model: &str, duration_secs: f64) {
    if let Some(m) = METRICS.get() {
        m.genai_provider_latency_seconds
            .with_label_values(&[provider, model])
            .observe(duration_secs);
    }
}

/// Record a provider error.
pub fn record_provider_error(provider: &str, error_type: &str) {
    if let Some(m) = METRICS.get() {
        m.genai_provider_errors_total
            .with_label_values(&[provider, error_type])
            .inc();
    }
}

/// Record how an image request ended.
pub fn record_image_outcome(outcome: &str) {
    if let Some(m) = METRICS.get() {
        m.genai_image_requests_total
            .with_label_values(&[outcome])
            .inc();
    }
}

/// Await a provider call, recording its latency and any error kind.
pub async fn observe_provider_call<T, F>(
    provider: &str,
    model: &str,
    call: F,
) -> Result<T, ProviderError>
where
    F: Future<Output = Result<T, ProviderError>>,
{
    let start = Instant::now();
    let result = call.await;
    record_provider_latency(provider, model, start.elapsed().as_secs_f64());

    if let Err(e) = &result {
        record_provider_error(provider, e.kind());
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_metrics_are_exported() {
        init_metrics();
        init_metrics();

        record_image_outcome("fallback");
        record_provider_error("imagen", "api_error");

        let text = get_metrics();
        assert!(text.contains("genai_image_requests_total"));
        assert!(text.contains("outcome=\"fallback\""));
        assert!(text.contains("error_type=\"api_error\""));
    }
}
