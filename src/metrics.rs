use axum::{extract::Request, middleware::Next, response::Response};
use lazy_static::lazy_static;
use std::time::Instant;
use prometheus::{
    Encoder, Histogram, IntCounter, IntCounterVec, IntGauge, TextEncoder, register_histogram,
    register_int_counter, register_int_counter_vec, register_int_gauge,
};

lazy_static! {
    pub static ref REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "site_api_requests_total",
        "Total number of API requests by route",
        &["route"]
    )
    .unwrap();
    pub static ref RATE_LIMITED_TOTAL: IntCounter = register_int_counter!(
        "site_api_rate_limited_total",
        "Requests rejected by the rate limiter"
    )
    .unwrap();
    pub static ref VALIDATION_FAILURES: IntCounterVec = register_int_counter_vec!(
        "site_api_validation_failures_total",
        "Requests rejected as malformed, by route",
        &["route"]
    )
    .unwrap();
    pub static ref RATE_LIMIT_KEYS: IntGauge = register_int_gauge!(
        "site_api_rate_limit_keys",
        "Client keys currently tracked by the rate limiter"
    )
    .unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "site_api_request_latency_seconds",
        "Request handling latency in seconds"
    )
    .unwrap();
}

// Renders every registered metric in the Prometheus text format
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

// Times every request, including rejected and failed ones
pub async fn track_latency(request: Request, next: Next) -> Response {
    let start_time = Instant::now();
    let response = next.run(request).await;
    REQUEST_LATENCY.observe(start_time.elapsed().as_secs_f64());
    response
}
